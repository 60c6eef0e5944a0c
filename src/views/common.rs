use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::help::{HelpConfig, modal_help};
use crate::keys::{Keymap, modal_keymap};
use crate::theme::ResolvedTheme;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Status bar help: the full list when it fits in `width` columns, the
/// compact one otherwise.
pub fn help_text(config: &HelpConfig, keymap: &Keymap, width: usize) -> String {
    let expanded = config.format(keymap, true);
    if unicode_width::UnicodeWidthStr::width(expanded.as_str()) <= width {
        expanded
    } else {
        config.format(keymap, false)
    }
}

/// Help for a view's status bar. A pending leader key replaces it with the
/// second-key prompt.
pub fn status_help(app: &App, config: &HelpConfig, keymap: &Keymap, width: usize) -> String {
    if app.modal_active() {
        return modal_help().format(&modal_keymap(), true);
    }
    if !app.settings.show_help_text {
        return String::new();
    }
    help_text(config, keymap, width)
}
