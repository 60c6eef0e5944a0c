use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::Feed;
use crate::app::{App, Message, View};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else if mods.contains(KeyModifiers::ALT) {
        format!("M-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Global keybindings that work in all views.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Char(' '), Message::EnterModal)
}

/// Second key after `Space`. Anything else cancels the modal.
pub fn modal_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('o'), Message::OpenLinks)
        .bind(KeyCode::Char('s'), Message::SaveStory)
        .bind(KeyCode::Char('d'), Message::RemoveSaved)
        .bind(KeyCode::Esc, Message::CancelModal)
}

/// Keybindings for the help overlay popup.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

/// Navigation keybindings shared between stories and comments views.
fn navigation_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
        .bind(KeyCode::Char('O'), Message::OpenHnPage)
        .bind(KeyCode::Char('r'), Message::Refresh)
        .bind(KeyCode::Char('R'), Message::Refresh)
}

/// Stories view keybindings.
pub fn stories_keymap() -> Keymap {
    navigation_keymap()
        .bind(KeyCode::Char('l'), Message::OpenComments)
        .bind(KeyCode::Enter, Message::OpenComments)
        .bind(KeyCode::Char('H'), Message::PrevFeed)
        .bind(KeyCode::Char('L'), Message::NextFeed)
        .bind(KeyCode::Char('1'), Message::SwitchFeed(Feed::Top))
        .bind(KeyCode::Char('2'), Message::SwitchFeed(Feed::New))
        .bind(KeyCode::Char('3'), Message::SwitchFeed(Feed::Show))
        .bind(KeyCode::Char('4'), Message::SwitchFeed(Feed::Ask))
        .bind(KeyCode::Char('5'), Message::SwitchFeed(Feed::Jobs))
        .bind(KeyCode::Char('6'), Message::SwitchFeed(Feed::Saved))
}

/// Comments view keybindings.
pub fn comments_keymap() -> Keymap {
    navigation_keymap()
        .bind(KeyCode::Char('l'), Message::ExpandComment)
        .bind(KeyCode::Right, Message::ExpandComment)
        .bind(KeyCode::Enter, Message::ExpandComment)
        .bind(KeyCode::Char('h'), Message::CollapseComment)
        .bind(KeyCode::Left, Message::CollapseComment)
        .bind(KeyCode::Esc, Message::Back)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // Help overlay takes priority when open
    if app.show_help {
        return help_overlay_keymap().get(&key);
    }

    if app.modal_active() {
        return Some(modal_keymap().get(&key).unwrap_or(Message::CancelModal));
    }

    // Global keys first
    if let Some(msg) = global_keymap().get(&key) {
        return Some(msg);
    }

    // View-specific keys
    match app.view {
        View::Stories => stories_keymap().get(&key),
        View::Comments => comments_keymap().get(&key),
    }
}
