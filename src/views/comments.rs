use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::api::{CommentRecord, Story};
use crate::app::{App, ThreadView};
use crate::comments::Replies;
use crate::comments::viewport::{INDENT_PER_LEVEL, body_lines, story_text_lines};
use crate::help::comments_help;
use crate::keys::{comments_keymap, global_keymap};
use crate::theme::ResolvedTheme;
use crate::time::format_relative;
use crate::views::common::{render_error, status_help};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

/// Render the comments view
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(thread) = &app.thread else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Min(0),    // Story header + comments
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_thread(frame, app, thread, chunks[0]);
    render_status_bar(frame, app, thread, chunks[1]);
}

fn render_thread(frame: &mut Frame, app: &App, thread: &ThreadView, area: Rect) {
    let theme = &app.theme;

    if let Some(err) = thread.session.error().filter(|e| e.is_blocking()) {
        let message = format!("{}\n\nPress r to retry", err.message());
        render_error(frame, &message, theme, area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(2));
    let mut lines = header_lines(&thread.story, app, width);

    if thread.session.visible_ids().is_empty() {
        let placeholder = if thread.session.is_loading() || thread.session.is_loading_more() {
            "Loading comments..."
        } else {
            "No comments yet"
        };
        lines.push(Line::styled(placeholder, theme.dim_style()));
    }

    for record in thread.session.visible_records() {
        let selected = thread.selected_id == Some(record.id);
        lines.extend(comment_lines(record, thread, app, width, selected));
    }
    if !thread.session.visible_ids().is_empty() && !thread.session.has_more() {
        lines.push(end_of_thread_line(theme));
    }

    let cursor = thread.session.cursor();
    let title = format!(
        "Comments ({}/{} threads)",
        cursor.loaded_count(),
        cursor.total()
    );
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .scroll((u16::try_from(thread.cursor.scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

/// Must produce exactly `viewport::END_OF_THREAD_ROWS` rows.
fn end_of_thread_line(theme: &ResolvedTheme) -> Line<'static> {
    Line::styled("── end of thread ──", theme.dim_style())
}

/// Story header. Must produce exactly `viewport::header_height` rows.
fn header_lines(story: &Story, app: &App, width: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = vec![
        Line::styled(story.title.clone(), theme.title_style()),
        Line::from(vec![
            Span::styled(format!("▲ {}", story.score), theme.accent_style()),
            Span::styled(" | ", theme.dim_style()),
            Span::styled(story.by.clone(), theme.secondary_style()),
            Span::styled(" | ", theme.dim_style()),
            Span::styled(
                format!("{} comments", story.descendants),
                theme.secondary_style(),
            ),
            Span::styled(" | ", theme.dim_style()),
            Span::styled(
                format_relative(story.time, app.clock.now()),
                theme.dim_style(),
            ),
        ]),
    ];
    if let Some(url) = &story.url {
        lines.push(Line::styled(url.clone(), theme.link_style()));
    }
    lines.extend(
        story_text_lines(story, width)
            .into_iter()
            .map(|line| Line::styled(line, theme.text_style())),
    );
    lines.push(Line::styled("─".repeat(width), theme.dim_style()));
    lines
}

fn reply_label(replies: Replies) -> Option<String> {
    let plural = |n: usize| if n == 1 { "reply" } else { "replies" };
    match replies {
        Replies::None => None,
        Replies::Loading => Some("Loading replies...".to_string()),
        Replies::AllRemoved(1) => Some("Reply deleted".to_string()),
        Replies::AllRemoved(n) => Some(format!("{n} replies deleted")),
        Replies::Collapsed(n) => Some(format!("[expand {n} {}]", plural(n))),
        Replies::Expanded(n) => Some(format!("[collapse {n} {}]", plural(n))),
    }
}

/// Meta line, wrapped body, blank spacer. Row count matches
/// `viewport::estimate_height`.
fn comment_lines(
    record: &CommentRecord,
    thread: &ThreadView,
    app: &App,
    width: usize,
    selected: bool,
) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let color = theme.depth_color(record.depth);
    let indent = " ".repeat(record.depth * INDENT_PER_LEVEL);

    let mut meta = vec![
        Span::raw(indent.clone()),
        Span::styled(
            record.author_label().to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · ", theme.dim_style()),
        Span::styled(
            format_relative(record.created_at, app.clock.now()),
            theme.dim_style(),
        ),
    ];
    let replies = thread.session.replies(record.id);
    if let Some(label) = reply_label(replies) {
        let style = match replies {
            Replies::Loading => theme.spinner_style(),
            Replies::AllRemoved(_) => theme.dim_style(),
            _ => theme.accent_style(),
        };
        meta.push(Span::raw("  "));
        if replies == Replies::Loading {
            let frame = spinner_frame(Some(thread.opened_at));
            meta.push(Span::styled(format!("{frame} "), style));
        }
        meta.push(Span::styled(label, style));
    }

    let mut lines = vec![Line::from(meta)];
    for body in body_lines(record, width) {
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled("│ ", Style::default().fg(color)),
            Span::styled(body, theme.text_style()),
        ]));
    }
    lines.push(Line::from(""));

    if selected {
        let style = theme.selection_style();
        lines = lines.into_iter().map(|line| line.patch_style(style)).collect();
    }
    lines
}

fn render_status_bar(frame: &mut Frame, app: &App, thread: &ThreadView, area: Rect) {
    let session = &thread.session;
    let loading = if session.is_loading() {
        Some("Loading comments...")
    } else if session.is_loading_more() {
        Some("Loading more...")
    } else if session.has_pending_children() {
        Some("Loading replies...")
    } else {
        None
    };
    let loading_text =
        loading.map(|text| format!("{} {}", spinner_frame(Some(thread.opened_at)), text));

    let keymap = global_keymap().extend(comments_keymap());
    let help = status_help(
        app,
        &comments_help(),
        &keymap,
        usize::from(area.width.saturating_sub(40)),
    );
    let transient = session
        .error()
        .filter(|e| !e.is_blocking())
        .map(|e| e.message());

    let visible = session.visible_ids().len();
    let mut bar = StatusBar::new(&app.theme)
        .label("Comments")
        .notice(app.notice_text())
        .error(transient)
        .help(&help);
    if let Some(text) = loading_text.as_deref() {
        bar = bar.loading(text);
    }
    if visible > 0 {
        bar = bar.position(thread.cursor.selected + 1, visible);
    }
    bar.render(frame, area);
}
