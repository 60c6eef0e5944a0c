use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::api::{Feed, Story};
use crate::app::App;
use crate::help::stories_help;
use crate::keys::{global_keymap, stories_keymap};
use crate::theme::ResolvedTheme;
use crate::time::{Clock, format_relative};
use crate::views::common::{render_error, status_help};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Feed tabs
        Constraint::Min(0),    // Story list
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_feed_tabs(frame, app, chunks[0]);
    render_story_list(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_feed_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Feed::all()
        .iter()
        .enumerate()
        .flat_map(|(i, feed)| {
            let style = if *feed == app.feed {
                theme.active_tab_style()
            } else {
                theme.dim_style()
            };
            vec![
                Span::styled(format!("[{}]", i + 1), theme.dim_style()),
                Span::styled(feed.label(), style),
                Span::raw("  "),
            ]
        })
        .collect();

    if app.load.should_show_spinner() {
        spans.push(Span::styled(
            spinner_frame(app.load.loading_start),
            theme.spinner_style(),
        ));
    }

    let tabs_line = Line::from(spans);
    frame.render_widget(Paragraph::new(tabs_line), area);
}

fn render_story_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(err) = &app.load.error {
        render_error(frame, err, theme, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!("{} Stories", app.feed.label()));

    if app.stories.is_empty() && !app.load.loading {
        let empty = if app.feed == Feed::Saved {
            "No saved stories. Press Space then s on a story to save it."
        } else {
            "No stories"
        };
        frame.render_widget(
            Paragraph::new(Line::styled(empty, theme.dim_style())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .stories
        .iter()
        .enumerate()
        .map(|(i, story)| story_to_list_item(story, i + 1, theme, app.clock.as_ref()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selection_style().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_offset(app.scroll_offset);
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn story_to_list_item(
    story: &Story,
    rank: usize,
    theme: &ResolvedTheme,
    clock: &dyn Clock,
) -> ListItem<'static> {
    let mut title_spans = vec![
        Span::styled(format!("{:>3}. ", rank), theme.dim_style()),
        Span::styled(story.title.clone(), theme.title_style()),
    ];
    if story.url.is_some() {
        title_spans.push(Span::styled(
            format!(" ({})", story.domain()),
            theme.link_style(),
        ));
    }

    let mut meta = vec![
        Span::raw("     "),
        Span::styled(format!("▲ {}", story.score), theme.accent_style()),
        Span::raw(" | "),
        Span::styled(story.by.clone(), theme.secondary_style()),
    ];
    if !story.is_job() {
        meta.push(Span::raw(" | "));
        meta.push(Span::styled(
            format!("{} comments", story.descendants),
            theme.secondary_style(),
        ));
    }
    meta.push(Span::raw(" | "));
    meta.push(Span::styled(
        format_relative(story.time, clock.now()),
        theme.dim_style(),
    ));

    ListItem::new(vec![Line::from(title_spans), Line::from(meta)])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = global_keymap().extend(stories_keymap());
    let help = status_help(
        app,
        &stories_help(),
        &keymap,
        usize::from(area.width.saturating_sub(30)),
    );

    let mut bar = StatusBar::new(&app.theme)
        .label(app.feed.label())
        .notice(app.notice_text())
        .help(&help);
    if app.load.loading_more {
        bar = bar.loading("Loading more...");
    }
    if !app.stories.is_empty() {
        bar = bar.position(app.selected_index + 1, app.story_ids.len().max(app.stories.len()));
    }
    bar.render(frame, area);
}
