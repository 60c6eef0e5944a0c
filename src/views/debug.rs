use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(theme.dim_style());

    let mut lines = Vec::new();

    // Running tasks
    let task_count = app.debug.running_tasks.len();
    let mut header = vec![
        Span::styled("Tasks: ", theme.dim_style()),
        Span::styled(
            task_count.to_string(),
            if task_count > 0 {
                theme.warning_style()
            } else {
                theme.text_style()
            },
        ),
    ];
    if let Some(thread) = &app.thread {
        let session = &thread.session;
        header.push(Span::styled(
            format!(
                "  session {} story {} {:?} | parents {}/{} | stored {} | visible {}",
                session.id(),
                session.story_id(),
                session.phase(),
                session.cursor().loaded_count(),
                session.cursor().total(),
                session.store().len(),
                session.visible_ids().len()
            ),
            theme.dim_style(),
        ));
    }
    lines.push(Line::from(header));

    for task in &app.debug.running_tasks {
        let elapsed = task.started_at.elapsed();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("[{}] ", task.id), theme.dim_style()),
            Span::styled(&task.description, theme.text_style()),
            Span::styled(format!(" ({:.1?})", elapsed), theme.secondary_style()),
        ]));
    }

    // Separator
    if !app.debug.running_tasks.is_empty() {
        lines.push(Line::from(""));
    }

    // Recent log entries (newest first, limit to fit area)
    let available_lines = area.height.saturating_sub(3) as usize; // 3 for border + tasks header
    let log_lines = available_lines.saturating_sub(app.debug.running_tasks.len() + 1);

    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::styled(
            format!("  {}", entry.message),
            theme.dim_style(),
        ));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
