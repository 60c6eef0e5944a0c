//! Keybinding overlay. Direct bindings are listed first; actions behind the
//! leader key get their own section keyed by the second keystroke.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Message, View};
use crate::help::{HelpItem, comments_overlay_items, stories_overlay_items};
use crate::keys::{Keymap, comments_keymap, format_key, global_keymap, stories_keymap};
use crate::theme::ResolvedTheme;

struct Section {
    heading: String,
    rows: Vec<(String, &'static str)>,
}

fn sections(items: &[HelpItem], keymap: &Keymap) -> Vec<Section> {
    let rows = |leader: bool| -> Vec<(String, &'static str)> {
        items
            .iter()
            .filter(|item| item.is_modal() == leader)
            .filter_map(|item| item.second_keys(keymap).map(|keys| (keys, item.label())))
            .collect()
    };

    let mut sections = vec![Section {
        heading: "Keys".to_string(),
        rows: rows(false),
    }];
    if let Some((code, mods)) = keymap.find_key(&Message::EnterModal) {
        sections.push(Section {
            heading: format!("{} then", format_key(code, mods)),
            rows: rows(true),
        });
    }
    sections.retain(|section| !section.rows.is_empty());
    sections
}

fn section_lines<'a>(section: &'a Section, theme: &ResolvedTheme) -> Vec<Line<'a>> {
    let key_width = section
        .rows
        .iter()
        .map(|(keys, _)| keys.width())
        .max()
        .unwrap_or(0);
    let heading = Line::styled(
        section.heading.as_str(),
        theme.accent_style().add_modifier(Modifier::BOLD),
    );
    let rows = section.rows.iter().map(move |(keys, label)| {
        let pad = " ".repeat(key_width - keys.width());
        Line::from(vec![
            Span::styled(format!(" {keys}{pad}  "), theme.dim_style()),
            Span::styled(*label, theme.title_style()),
        ])
    });
    std::iter::once(heading).chain(rows).collect()
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.show_help {
        return;
    }
    frame
        .buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));

    let theme = &app.theme;
    let (items, keymap) = match app.view {
        View::Stories => (
            stories_overlay_items(),
            global_keymap().extend(stories_keymap()),
        ),
        View::Comments => (
            comments_overlay_items(),
            global_keymap().extend(comments_keymap()),
        ),
    };
    let sections = sections(&items, &keymap);

    let mut lines = Vec::new();
    for section in &sections {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(section_lines(section, theme));
    }

    // borders plus one column of padding each side
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(popup);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .border_style(theme.border_style())
                .title("Help")
                .title_style(theme.active_tab_style())
                .padding(Padding::horizontal(1)),
        ),
        popup,
    );
}
