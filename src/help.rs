//! Dynamic help text generation from keymaps.

use crate::app::Message;
use crate::keys::{Keymap, format_key, modal_keymap};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    /// The label to show (e.g., "nav", "expand", "quit").
    label: &'static str,
    /// Bound in the modal keymap, reached through the leader key.
    modal: bool,
}

impl HelpItem {
    /// Create a help item for a single action.
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
            modal: false,
        }
    }

    /// Create a help item for paired actions (e.g., j/k for next/prev).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
            modal: false,
        }
    }

    /// Create a help item for an action behind the leader key, shown as
    /// e.g. "Space+o".
    pub fn modal(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
            modal: true,
        }
    }

    pub const fn label(&self) -> &'static str {
        self.label
    }

    pub const fn is_modal(&self) -> bool {
        self.modal
    }

    fn lookup(&self, keymap: &Keymap, prefix: &str) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format!("{prefix}{}", format_key(code, mods)))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(keys.join("/"))
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        if self.modal {
            let (code, mods) = keymap.find_key(&Message::EnterModal)?;
            self.lookup(&modal_keymap(), &format!("{}+", format_key(code, mods)))
        } else {
            self.lookup(keymap, "")
        }
    }

    /// Keys without the leader prefix. Leader items resolve against the
    /// modal keymap, so "Space+o" comes back as "o".
    pub fn second_keys(&self, keymap: &Keymap) -> Option<String> {
        if self.modal {
            self.lookup(&modal_keymap(), "")
        } else {
            self.lookup(keymap, "")
        }
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap)
            .map(|keys| format!("{}:{}", keys, self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    /// Items to show in expanded (full help) mode.
    pub expanded: Vec<HelpItem>,
    /// Items to show in compact (minimal) mode.
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    /// Format help text for the given mode.
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Help configuration for the stories view.
pub fn stories_help() -> HelpConfig {
    use Message::{
        NextFeed, OpenComments, OpenHnPage, OpenLinks, PrevFeed, Quit, Refresh, RemoveSaved,
        SaveStory, SelectFirst, SelectLast, SelectNext, SelectPrev, ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
            HelpItem::pair(PrevFeed, NextFeed, "feeds"),
            HelpItem::new(OpenComments, "comments"),
            HelpItem::modal(OpenLinks, "open"),
            HelpItem::new(OpenHnPage, "open on hn"),
            HelpItem::modal(SaveStory, "save"),
            HelpItem::modal(RemoveSaved, "unsave"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "help"),
        ],
        compact: vec![
            HelpItem::pair(PrevFeed, NextFeed, "feeds"),
            HelpItem::new(OpenComments, "comments"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Help configuration for the comments view.
pub fn comments_help() -> HelpConfig {
    use Message::{
        Back, CollapseComment, ExpandComment, OpenHnPage, OpenLinks, Quit, Refresh, SaveStory,
        SelectFirst, SelectLast, SelectNext, SelectPrev, ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
            HelpItem::pair(ExpandComment, CollapseComment, "expand"),
            HelpItem::modal(OpenLinks, "links"),
            HelpItem::new(OpenHnPage, "open on hn"),
            HelpItem::modal(SaveStory, "save"),
            HelpItem::new(Back, "back"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "help"),
        ],
        compact: vec![
            HelpItem::pair(ExpandComment, CollapseComment, "expand"),
            HelpItem::modal(OpenLinks, "links"),
            HelpItem::new(Back, "back"),
            HelpItem::new(ToggleHelp, "help"),
        ],
    }
}

/// Prompt shown while the leader key waits for its second key.
pub fn modal_help() -> HelpConfig {
    use Message::{CancelModal, OpenLinks, RemoveSaved, SaveStory};
    let items = || {
        vec![
            HelpItem::new(OpenLinks, "links"),
            HelpItem::new(SaveStory, "save"),
            HelpItem::new(RemoveSaved, "unsave"),
            HelpItem::new(CancelModal, "cancel"),
        ]
    };
    HelpConfig {
        expanded: items(),
        compact: items(),
    }
}

/// Help items for the stories view overlay.
pub fn stories_overlay_items() -> Vec<HelpItem> {
    use Message::{
        NextFeed, OpenComments, OpenHnPage, OpenLinks, PageDown, PageUp, PrevFeed, Quit, Refresh,
        RemoveSaved, SaveStory, SelectFirst, SelectLast, SelectNext, SelectPrev, ToggleDebug,
        ToggleHelp,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::pair(PrevFeed, NextFeed, "switch feeds"),
        HelpItem::new(OpenComments, "open comments"),
        HelpItem::modal(OpenLinks, "open link"),
        HelpItem::new(OpenHnPage, "open on hn"),
        HelpItem::modal(SaveStory, "save story"),
        HelpItem::modal(RemoveSaved, "remove from saved"),
        HelpItem::new(Refresh, "refresh"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}

/// Help items for the comments view overlay.
pub fn comments_overlay_items() -> Vec<HelpItem> {
    use Message::{
        Back, CollapseComment, ExpandComment, OpenHnPage, OpenLinks, PageDown, PageUp, Quit,
        Refresh, RemoveSaved, SaveStory, SelectFirst, SelectLast, SelectNext, SelectPrev,
        ToggleDebug, ToggleHelp,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::pair(ExpandComment, CollapseComment, "expand/collapse"),
        HelpItem::modal(OpenLinks, "open comment links"),
        HelpItem::new(OpenHnPage, "open on hn"),
        HelpItem::modal(SaveStory, "save story"),
        HelpItem::modal(RemoveSaved, "remove from saved"),
        HelpItem::new(Back, "back to stories"),
        HelpItem::new(Refresh, "reload thread"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
