//! Scroll planning and cursor stepping for the comment list.
//!
//! Heights come from the same wrapping the comment view renders with, so the
//! estimate only drifts where the terminal shapes text differently from
//! `textwrap` (wide glyphs and the like).

use crate::api::{CommentRecord, Story};
use crate::text;

pub const INDENT_PER_LEVEL: usize = 3;
pub const MIN_BODY_WIDTH: usize = 20;
pub const DEFAULT_LOAD_MORE_THRESHOLD: usize = 10;
/// Marker rows under the last comment once no parent batches remain.
pub const END_OF_THREAD_ROWS: usize = 1;

/// Width left for a comment body at `depth` inside `width` columns.
pub fn body_width(depth: usize, width: usize) -> usize {
    width
        .saturating_sub(depth * INDENT_PER_LEVEL + 2)
        .max(MIN_BODY_WIDTH)
}

pub fn body_lines(record: &CommentRecord, width: usize) -> Vec<String> {
    let Some(html) = record.body_html.as_deref() else {
        return Vec::new();
    };
    text::wrap(&text::strip_html(html), body_width(record.depth, width))
}

/// Meta line, wrapped body, one blank spacer line.
pub fn estimate_height(record: &CommentRecord, width: usize) -> usize {
    1 + body_lines(record, width).len() + 1
}

pub fn story_text_lines(story: &Story, width: usize) -> Vec<String> {
    let Some(html) = story.text.as_deref() else {
        return Vec::new();
    };
    text::wrap(&text::strip_html(html), width.max(MIN_BODY_WIDTH))
}

/// Rows the story header occupies above the first comment: title, meta
/// line, optional URL, wrapped self-text, separator.
pub fn header_height(story: &Story, width: usize) -> usize {
    2 + usize::from(story.url.is_some()) + story_text_lines(story, width).len() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Rows above the first comment (story header).
    pub header_height: usize,
    /// Rows below the last comment (end-of-thread marker).
    pub footer_height: usize,
    pub height: usize,
    pub scroll: usize,
}

/// Scroll offset that keeps `selected` framed. Rules, first match wins:
///
/// 1. Entry taller than the viewport: its top goes to the viewport top.
/// 2. Entry starts above the viewport: scroll up to its top.
/// 3. Entry ends below the viewport: scroll just far enough down; for the
///    very last entry with nothing left to load, snap to the end of the
///    content so the footer comes into view.
/// 4. Otherwise keep the current offset.
pub fn plan_scroll(heights: &[usize], selected: usize, viewport: Viewport, more_remaining: bool) -> usize {
    let Some(&height) = heights.get(selected) else {
        return viewport.scroll;
    };
    let top = viewport.header_height + heights[..selected].iter().sum::<usize>();
    let bottom = top + height;

    if height > viewport.height {
        return top;
    }
    if top < viewport.scroll {
        return top;
    }
    if bottom > viewport.scroll + viewport.height {
        let is_last = selected + 1 == heights.len();
        if is_last && !more_remaining {
            let total =
                viewport.header_height + heights.iter().sum::<usize>() + viewport.footer_height;
            return total.saturating_sub(viewport.height).min(top);
        }
        return bottom.saturating_sub(viewport.height);
    }
    viewport.scroll
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Selection moved. `near_end` asks the caller to load more proactively.
    Moved { near_end: bool },
    /// Already at the last entry and more may exist; selection unchanged.
    NeedsMore,
    AtBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub selected: usize,
    pub scroll: usize,
}

impl Cursor {
    pub fn up(&mut self) -> MoveResult {
        if self.selected == 0 {
            return MoveResult::AtBoundary;
        }
        self.selected -= 1;
        MoveResult::Moved { near_end: false }
    }

    pub fn down(&mut self, len: usize, threshold: usize, has_more: bool) -> MoveResult {
        if self.selected + 1 >= len {
            return if has_more {
                MoveResult::NeedsMore
            } else {
                MoveResult::AtBoundary
            };
        }
        self.selected += 1;
        MoveResult::Moved {
            near_end: has_more && self.selected.saturating_add(threshold) >= len,
        }
    }

    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
