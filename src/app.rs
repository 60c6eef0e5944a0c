use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{CommentRecord, Feed, HnClient, Story};
use crate::comments::viewport::{END_OF_THREAD_ROWS, estimate_height, header_height, plan_scroll};
use crate::comments::{
    self, BatchOutcome, BatchRequest, ChildOutcome, ChildRequest, CommentSession, Cursor,
    ExpandStep, MoveResult, SessionId, Viewport,
};
use crate::settings::Settings;
use crate::storage::Storage;
use crate::text;
use crate::theme::ResolvedTheme;
use crate::time::Clock;

pub const DEBUG_PANE_HEIGHT: u16 = 10;
const NOTICE_DURATION: Duration = Duration::from_secs(3);
const PAGE_SIZE: usize = 10;

/// First page of a feed: every id, plus the stories fetched for the
/// leading `attempted` ids.
#[derive(Debug)]
pub struct StoryPage {
    pub ids: Vec<u64>,
    pub stories: Vec<Story>,
    pub attempted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Save,
    Remove,
}

pub enum AsyncResult {
    Stories {
        generation: u64,
        task_id: u64,
        result: Result<StoryPage, String>,
    },
    MoreStories {
        generation: u64,
        task_id: u64,
        stories: Vec<Story>,
        attempted: usize,
    },
    ParentBatch {
        session: SessionId,
        task_id: u64,
        initial: bool,
        result: Result<BatchOutcome, String>,
    },
    Children {
        session: SessionId,
        task_id: u64,
        parent_id: u64,
        result: Result<ChildOutcome, String>,
    },
    SavedChanged {
        task_id: u64,
        story_id: u64,
        action: SaveAction,
        result: Result<bool, String>,
    },
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push_back(LogEntry {
            message: msg.into(),
        });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        debug!(task = id, "{desc}");
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            debug!(task = id, ?elapsed, "{} {}", task.description, outcome);
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Story list loading and pagination state.
#[derive(Debug, Default)]
pub struct LoadState {
    pub loading: bool,
    pub loading_start: Option<Instant>,
    pub loading_more: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

impl LoadState {
    pub fn new() -> Self {
        Self {
            has_more: true,
            ..Default::default()
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.loading_start = Some(Instant::now());
        }
        // loading_start stays set so the spinner shows for a minimum duration
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        if let Some(start) = self.loading_start {
            self.loading || start.elapsed() < MIN_SPINNER_DURATION
        } else {
            false
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Stories,
    Comments,
}

/// An open story: its comment session plus where the cursor sits.
#[derive(Debug)]
pub struct ThreadView {
    pub story: Story,
    pub session: CommentSession,
    pub cursor: Cursor,
    /// Selection is tracked by id so it survives splices above it.
    pub selected_id: Option<u64>,
    pub story_index: usize,
    pub story_scroll: usize,
    pub opened_at: Instant,
}

impl ThreadView {
    pub fn new(story: Story, session: CommentSession, story_index: usize, story_scroll: usize) -> Self {
        let mut thread = Self {
            story,
            session,
            cursor: Cursor::default(),
            selected_id: None,
            story_index,
            story_scroll,
            opened_at: Instant::now(),
        };
        thread.sync_selection();
        thread
    }

    pub fn selected_comment(&self) -> Option<&CommentRecord> {
        self.selected_id.and_then(|id| self.session.store().get(id))
    }

    fn select_cursor(&mut self) {
        self.selected_id = self
            .session
            .visible_ids()
            .get(self.cursor.selected)
            .copied();
    }

    /// Re-derive the cursor index from the selected id after the visible
    /// sequence changed.
    pub(crate) fn sync_selection(&mut self) {
        let visible = self.session.visible_ids();
        match self
            .selected_id
            .and_then(|id| visible.iter().position(|v| *v == id))
        {
            Some(pos) => self.cursor.selected = pos,
            None => self.cursor.clamp(visible.len()),
        }
        self.select_cursor();
    }

    fn replan_scroll(&mut self, width: usize, height: usize) {
        let heights: Vec<usize> = self
            .session
            .visible_records()
            .map(|record| estimate_height(record, width))
            .collect();
        if heights.is_empty() {
            self.cursor.scroll = 0;
            return;
        }
        let more_remaining = self.session.has_more();
        let viewport = Viewport {
            header_height: header_height(&self.story, width),
            footer_height: if more_remaining { 0 } else { END_OF_THREAD_ROWS },
            height,
            scroll: self.cursor.scroll,
        };
        self.cursor.scroll = plan_scroll(&heights, self.cursor.selected, viewport, more_remaining);
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    OpenComments,
    OpenHnPage,
    ExpandComment,
    CollapseComment,
    Back,
    Quit,
    Refresh,
    ToggleHelp,
    ToggleDebug,
    SwitchFeed(Feed),
    NextFeed,
    PrevFeed,
    // Modal (leader) actions
    EnterModal,
    CancelModal,
    OpenLinks,
    SaveStory,
    RemoveSaved,
    Tick,
    UpdateViewport(u16, u16),
}

pub struct App {
    pub view: View,
    pub feed: Feed,
    pub stories: Vec<Story>,
    /// Every id in the current feed; `story_cursor` of them have been fetched.
    pub story_ids: Vec<u64>,
    pub story_cursor: usize,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub thread: Option<ThreadView>,
    pub load: LoadState,
    pub should_quit: bool,
    pub show_help: bool,
    pub settings: Settings,
    pub client: HnClient,
    pub storage: Option<Storage>,
    pub theme: ResolvedTheme,
    pub clock: Arc<dyn Clock>,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    pub generation: u64,
    pub next_session: u64,
    pub debug: DebugState,
    /// Terminal size as last reported by the event loop.
    pub viewport: Option<(u16, u16)>,
    pub modal_started: Option<Instant>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(settings: Settings, storage: Option<Storage>) -> Self {
        let (result_tx, result_rx) = mpsc::channel(32);
        let theme = ResolvedTheme::default().with_overrides(&settings.theme);
        Self {
            view: View::default(),
            feed: Feed::default(),
            stories: Vec::new(),
            story_ids: Vec::new(),
            story_cursor: 0,
            selected_index: 0,
            scroll_offset: 0,
            thread: None,
            load: LoadState::new(),
            should_quit: false,
            show_help: false,
            settings,
            client: HnClient::new(),
            storage,
            theme,
            clock: crate::time::system_clock(),
            result_tx,
            result_rx,
            generation: 0,
            next_session: 0,
            debug: DebugState::new(),
            viewport: None,
            modal_started: None,
            notice: None,
        }
    }

    pub fn modal_active(&self) -> bool {
        let timeout = Duration::from_millis(self.settings.keys.modal_timeout_ms);
        self.modal_started.is_some_and(|t| t.elapsed() < timeout)
    }

    pub fn notice_text(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.shown_at.elapsed() < NOTICE_DURATION)
            .map(|n| n.text.as_str())
    }

    fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.debug.log(text.clone());
        self.notice = Some(Notice {
            text,
            shown_at: Instant::now(),
        });
    }

    /// Width and height of the comment list's inner area: the terminal
    /// minus the block borders, the status bar and the debug pane.
    pub fn comment_viewport(&self) -> (usize, usize) {
        let (width, height) = self.viewport.unwrap_or((80, 24));
        let debug = if self.debug.visible {
            DEBUG_PANE_HEIGHT
        } else {
            0
        };
        (
            usize::from(width.saturating_sub(2)),
            usize::from(height.saturating_sub(3 + debug)),
        )
    }

    pub fn selected_story(&self) -> Option<&Story> {
        match self.view {
            View::Stories => self.stories.get(self.selected_index),
            View::Comments => self.thread.as_ref().map(|t| &t.story),
        }
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Stories {
                generation,
                task_id,
                result,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug.end_task(
                    task_id,
                    if result.is_ok() {
                        "completed"
                    } else {
                        "failed"
                    },
                );
                self.load.set_loading(false);
                match result {
                    Ok(page) => {
                        self.story_cursor = page.attempted;
                        self.load.has_more = page.attempted < page.ids.len();
                        self.story_ids = page.ids;
                        self.stories = page.stories;
                        self.selected_index = 0;
                        self.scroll_offset = 0;
                        info!(
                            feed = self.feed.label(),
                            stories = self.stories.len(),
                            total = self.story_ids.len(),
                            "stories loaded"
                        );
                        if self.should_fill_viewport() {
                            self.load_more();
                        }
                    }
                    Err(e) => {
                        warn!(feed = self.feed.label(), error = %e, "story load failed");
                        self.load.set_error(e);
                    }
                }
            }
            AsyncResult::MoreStories {
                generation,
                task_id,
                stories,
                attempted,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug.end_task(task_id, "completed");
                self.story_cursor = (self.story_cursor + attempted).min(self.story_ids.len());
                self.load.has_more = self.story_cursor < self.story_ids.len();
                self.load.loading_more = false;
                let known: std::collections::HashSet<u64> =
                    self.stories.iter().map(|s| s.id).collect();
                self.stories
                    .extend(stories.into_iter().filter(|s| !known.contains(&s.id)));
                if self.should_fill_viewport() {
                    self.load_more();
                }
            }
            AsyncResult::ParentBatch {
                session,
                task_id,
                initial,
                result,
            } => {
                let failed = result.is_err();
                let applied = match self.thread.as_mut() {
                    Some(thread) if initial => thread.session.finish_initial_load(session, result),
                    Some(thread) => thread.session.finish_load_more(session, result),
                    None => false,
                };
                if !applied {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug
                    .end_task(task_id, if failed { "failed" } else { "completed" });
                self.after_thread_change();
                // Everything in the batch was pruned: keep going so there is
                // something to navigate.
                if self
                    .thread
                    .as_ref()
                    .is_some_and(|t| t.session.visible_ids().is_empty() && !failed)
                {
                    self.load_more_comments();
                }
            }
            AsyncResult::Children {
                session,
                task_id,
                parent_id,
                result,
            } => {
                let failed = result.is_err();
                let applied = self
                    .thread
                    .as_mut()
                    .is_some_and(|t| t.session.finish_expand(session, parent_id, result));
                if !applied {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug
                    .end_task(task_id, if failed { "failed" } else { "completed" });
                self.after_thread_change();
            }
            AsyncResult::SavedChanged {
                task_id,
                story_id,
                action,
                result,
            } => {
                self.debug.end_task(
                    task_id,
                    if result.is_ok() {
                        "completed"
                    } else {
                        "failed"
                    },
                );
                match (action, result) {
                    (SaveAction::Save, Ok(true)) => self.notify("Story saved"),
                    (SaveAction::Save, Ok(false)) => self.notify("Already saved"),
                    (SaveAction::Remove, Ok(true)) => {
                        self.notify("Removed from saved");
                        if self.feed == Feed::Saved {
                            self.stories.retain(|s| s.id != story_id);
                            self.story_ids.retain(|id| *id != story_id);
                            self.story_cursor = self.story_ids.len();
                            self.selected_index = self
                                .selected_index
                                .min(self.stories.len().saturating_sub(1));
                        }
                    }
                    (SaveAction::Remove, Ok(false)) => self.notify("Story was not saved"),
                    (_, Err(e)) => {
                        warn!(story_id, error = %e, "saved stories update failed");
                        self.notify(format!("Storage error: {e}"));
                    }
                }
            }
        }
    }

    pub fn update(&mut self, msg: Message) {
        if !matches!(msg, Message::Tick | Message::UpdateViewport(..)) {
            self.load.clear_error();
        }

        match msg {
            Message::SelectNext => match self.view {
                View::Stories => {
                    self.select_next();
                    if self.should_load_more() {
                        self.load_more();
                    }
                }
                View::Comments => self.comment_step_down(1),
            },
            Message::SelectPrev => match self.view {
                View::Stories => self.select_prev(),
                View::Comments => self.comment_step_up(1),
            },
            Message::SelectFirst => match self.view {
                View::Stories => self.select_first(),
                View::Comments => self.comment_step_up(usize::MAX),
            },
            Message::SelectLast => match self.view {
                View::Stories => {
                    self.select_last();
                    if self.should_load_more() {
                        self.load_more();
                    }
                }
                View::Comments => self.comment_select_last(),
            },
            Message::PageDown => match self.view {
                View::Stories => {
                    self.page_down();
                    if self.should_load_more() {
                        self.load_more();
                    }
                }
                View::Comments => self.comment_step_down(PAGE_SIZE),
            },
            Message::PageUp => match self.view {
                View::Stories => self.page_up(),
                View::Comments => self.comment_step_up(PAGE_SIZE),
            },
            Message::OpenComments => self.open_comments(),
            Message::OpenHnPage => self.open_hn_page(),
            Message::ExpandComment => self.expand_comment(),
            Message::CollapseComment => self.collapse_comment(),
            Message::Back => self.go_back(),
            Message::Quit => self.should_quit = true,
            Message::Refresh => self.refresh(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => {
                self.debug.toggle();
                self.replan_comment_scroll();
            }
            Message::SwitchFeed(feed) => self.switch_feed(feed),
            Message::NextFeed => self.cycle_feed(1),
            Message::PrevFeed => self.cycle_feed(-1),
            Message::EnterModal => self.modal_started = Some(Instant::now()),
            Message::CancelModal => self.modal_started = None,
            Message::OpenLinks => {
                self.modal_started = None;
                self.open_links();
            }
            Message::SaveStory => {
                self.modal_started = None;
                self.change_saved(SaveAction::Save);
            }
            Message::RemoveSaved => {
                self.modal_started = None;
                self.change_saved(SaveAction::Remove);
            }
            Message::Tick => {
                if self.modal_started.is_some() && !self.modal_active() {
                    self.modal_started = None;
                }
                if self.notice.is_some() && self.notice_text().is_none() {
                    self.notice = None;
                }
            }
            Message::UpdateViewport(width, height) => {
                let old_height = self.viewport.map(|(_, h)| h);
                self.viewport = Some((width, height));
                self.replan_comment_scroll();
                if old_height.is_none_or(|h| height > h) && self.should_fill_viewport() {
                    self.load_more();
                }
            }
        }
    }

    // Comment view

    fn after_thread_change(&mut self) {
        if let Some(thread) = self.thread.as_mut() {
            thread.sync_selection();
        }
        self.replan_comment_scroll();
    }

    fn replan_comment_scroll(&mut self) {
        let (width, height) = self.comment_viewport();
        if let Some(thread) = self.thread.as_mut() {
            thread.replan_scroll(width, height);
        }
    }

    fn comment_step_down(&mut self, steps: usize) {
        let threshold = self.settings.comments.load_more_threshold;
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        let mut wants_more = false;
        for _ in 0..steps {
            let len = thread.session.visible_ids().len();
            match thread.cursor.down(len, threshold, thread.session.has_more()) {
                MoveResult::Moved { near_end } => wants_more |= near_end,
                MoveResult::NeedsMore => {
                    wants_more = true;
                    break;
                }
                MoveResult::AtBoundary => break,
            }
        }
        thread.select_cursor();
        if wants_more {
            self.load_more_comments();
        }
        self.replan_comment_scroll();
    }

    fn comment_step_up(&mut self, steps: usize) {
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        for _ in 0..steps {
            if thread.cursor.up() == MoveResult::AtBoundary {
                break;
            }
        }
        thread.select_cursor();
        self.replan_comment_scroll();
    }

    fn comment_select_last(&mut self) {
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        let len = thread.session.visible_ids().len();
        thread.cursor.selected = len.saturating_sub(1);
        thread.select_cursor();
        let wants_more = thread.session.has_more();
        if wants_more {
            self.load_more_comments();
        }
        self.replan_comment_scroll();
    }

    fn load_more_comments(&mut self) {
        let Some(request) = self
            .thread
            .as_mut()
            .and_then(|t| t.session.begin_load_more())
        else {
            return;
        };
        self.spawn_parent_batch(request, false);
    }

    fn expand_comment(&mut self) {
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        let Some(id) = thread.selected_id else {
            return;
        };
        match thread.session.begin_expand(id) {
            ExpandStep::Ignored => {}
            ExpandStep::AlreadyExpanded => {
                let first_child = thread.session.store().valid_child_ids(id).first().copied();
                if first_child.is_some_and(|c| thread.session.visible_ids().contains(&c)) {
                    thread.selected_id = first_child;
                }
                self.after_thread_change();
            }
            ExpandStep::Restored => self.after_thread_change(),
            ExpandStep::Fetch(request) => self.spawn_children_fetch(request),
        }
    }

    fn collapse_comment(&mut self) {
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        let Some(record) = thread.selected_comment() else {
            return;
        };
        let (id, depth, parent_id) = (record.id, record.depth, record.parent_id);
        if !thread.session.collapse(id) {
            if depth == 0 {
                return;
            }
            thread.session.collapse(parent_id);
            thread.selected_id = Some(parent_id);
        }
        self.after_thread_change();
    }

    fn next_session_id(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    fn open_comments(&mut self) {
        if self.view != View::Stories {
            return;
        }
        let Some(story) = self.stories.get(self.selected_index).cloned() else {
            return;
        };
        if story.is_job() && story.url.is_some() {
            open_in_browser(&story.content_url());
            return;
        }
        let session_id = self.next_session_id();
        info!(story = story.id, session = %session_id, "opening comments");
        let session = CommentSession::new(
            session_id,
            story.id,
            story.kids.clone(),
            self.settings.comments.batch_size,
        );
        self.thread = Some(ThreadView::new(
            story,
            session,
            self.selected_index,
            self.scroll_offset,
        ));
        self.view = View::Comments;
        self.start_comment_load();
    }

    fn start_comment_load(&mut self) {
        let Some(request) = self
            .thread
            .as_mut()
            .and_then(|t| t.session.begin_initial_load())
        else {
            self.after_thread_change();
            return;
        };
        self.spawn_parent_batch(request, true);
    }

    fn refresh_comments(&mut self) {
        let session_id = self.next_session_id();
        let batch_size = self.settings.comments.batch_size;
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        info!(story = thread.story.id, session = %session_id, "refreshing comments");
        thread.session = CommentSession::new(
            session_id,
            thread.story.id,
            thread.story.kids.clone(),
            batch_size,
        );
        thread.cursor = Cursor::default();
        thread.selected_id = None;
        self.start_comment_load();
    }

    fn go_back(&mut self) {
        if let Some(thread) = self.thread.take() {
            debug!(session = %thread.session.id(), "closing comments");
            self.view = View::Stories;
            self.selected_index = thread.story_index;
            self.scroll_offset = thread.story_scroll;
        }
    }

    // Story list

    fn item_count(&self) -> usize {
        self.stories.len()
    }

    fn select_next(&mut self) {
        let count = self.item_count();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    fn select_last(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.selected_index = count - 1;
        }
    }

    fn page_down(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.selected_index = (self.selected_index + PAGE_SIZE).min(count - 1);
        }
    }

    fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(PAGE_SIZE);
    }

    fn open_hn_page(&self) {
        match self.view {
            View::Stories => {
                if let Some(story) = self.stories.get(self.selected_index) {
                    open_in_browser(&story.hn_url());
                }
            }
            View::Comments => {
                if let Some(thread) = &self.thread {
                    match thread.selected_comment() {
                        Some(comment) => open_in_browser(&comment.hn_url()),
                        None => open_in_browser(&thread.story.hn_url()),
                    }
                }
            }
        }
    }

    /// Links for the modal `o` action: the story URL from the list, the
    /// selected comment's links in a thread, or the story URL when no
    /// comment is selected.
    pub fn link_targets(&self) -> Vec<String> {
        match self.view {
            View::Stories => self
                .stories
                .get(self.selected_index)
                .map(|s| vec![s.content_url()])
                .unwrap_or_default(),
            View::Comments => {
                let Some(thread) = &self.thread else {
                    return Vec::new();
                };
                match thread.selected_comment() {
                    Some(comment) => comment
                        .body_html
                        .as_deref()
                        .map(text::extract_links)
                        .unwrap_or_default(),
                    None => vec![thread.story.content_url()],
                }
            }
        }
    }

    fn open_links(&mut self) {
        let links = self.link_targets();
        if links.is_empty() {
            self.notify("No links in comment");
            return;
        }
        for link in &links {
            open_in_browser(link);
        }
        if links.len() > 1 {
            self.notify(format!("Opened {} links", links.len()));
        }
    }

    fn change_saved(&mut self, action: SaveAction) {
        let Some(story) = self.selected_story().cloned() else {
            return;
        };
        let Some(storage) = self.storage.clone() else {
            self.notify("Saved stories are unavailable: storage is disabled");
            return;
        };
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(match action {
            SaveAction::Save => format!("Save story {}", story.id),
            SaveAction::Remove => format!("Remove saved story {}", story.id),
        });

        tokio::spawn(async move {
            let result = match action {
                SaveAction::Save => storage.save_story(&story).await,
                SaveAction::Remove => storage.remove_story(story.id).await,
            };
            let _ = tx
                .send(AsyncResult::SavedChanged {
                    task_id,
                    story_id: story.id,
                    action,
                    result: result.map_err(|e| e.to_string()),
                })
                .await;
        });
    }

    fn refresh(&mut self) {
        match self.view {
            View::Stories => self.load_stories(),
            View::Comments => self.refresh_comments(),
        }
    }

    fn switch_feed(&mut self, feed: Feed) {
        if self.feed != feed {
            self.feed = feed;
            self.thread = None;
            self.view = View::Stories;
            self.load_stories();
        }
    }

    fn cycle_feed(&mut self, direction: i32) {
        let feeds = Feed::all();
        let current_idx = feeds.iter().position(|&f| f == self.feed).unwrap_or(0);
        let new_idx = (current_idx as i32 + direction).rem_euclid(feeds.len() as i32) as usize;
        self.switch_feed(feeds[new_idx]);
    }

    pub fn load_stories(&mut self) {
        self.generation += 1;
        self.load.set_loading(true);
        self.load.clear_error();
        self.load.loading_more = false;
        self.load.has_more = true;
        self.stories.clear();
        self.story_ids.clear();
        self.story_cursor = 0;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.spawn_stories_fetch();
    }

    fn should_load_more(&self) -> bool {
        let threshold = self.settings.comments.load_more_threshold;
        self.view == View::Stories
            && !self.load.loading
            && !self.load.loading_more
            && self.load.has_more
            && !self.stories.is_empty()
            && self.selected_index.saturating_add(threshold) >= self.stories.len()
    }

    pub fn visible_story_capacity(&self) -> usize {
        const LAYOUT_OVERHEAD: u16 = 4; // 1 tabs + 1 status bar + 2 borders
        const STORY_HEIGHT: u16 = 2; // title + metadata

        self.viewport
            .map(|(_, h)| (h.saturating_sub(LAYOUT_OVERHEAD) / STORY_HEIGHT) as usize)
            .unwrap_or(0)
    }

    fn should_fill_viewport(&self) -> bool {
        self.view == View::Stories
            && !self.load.loading
            && !self.load.loading_more
            && self.load.has_more
            && !self.stories.is_empty()
            && self.stories.len() < self.visible_story_capacity()
    }

    fn load_more(&mut self) {
        if self.load.loading_more || !self.load.has_more {
            return;
        }
        let end = (self.story_cursor + self.settings.stories.batch_size).min(self.story_ids.len());
        let ids = self.story_ids[self.story_cursor.min(end)..end].to_vec();
        if ids.is_empty() {
            self.load.has_more = false;
            return;
        }

        self.load.loading_more = true;
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let generation = self.generation;
        let task_id = self.debug.start_task(format!(
            "Load {} stories {}..{}",
            self.feed.label(),
            self.story_cursor,
            end
        ));

        tokio::spawn(async move {
            let stories = client.fetch_stories_by_ids(&ids).await;
            let _ = tx
                .send(AsyncResult::MoreStories {
                    generation,
                    task_id,
                    stories,
                    attempted: ids.len(),
                })
                .await;
        });
    }

    fn spawn_stories_fetch(&mut self) {
        let client = self.client.clone();
        let storage = self.storage.clone();
        let feed = self.feed;
        let count = self.settings.stories.initial_count;
        let tx = self.result_tx.clone();
        let generation = self.generation;
        let task_id = self
            .debug
            .start_task(format!("Load {} stories", feed.label()));

        tokio::spawn(async move {
            let result = fetch_story_page(&client, storage.as_ref(), feed, count).await;
            let _ = tx
                .send(AsyncResult::Stories {
                    generation,
                    task_id,
                    result,
                })
                .await;
        });
    }

    fn spawn_parent_batch(&mut self, request: BatchRequest, initial: bool) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(if initial {
            format!("Load comments {} ({} parents)", request.session, request.ids.len())
        } else {
            format!("Load more comments {} ({} parents)", request.session, request.ids.len())
        });

        tokio::spawn(async move {
            let result = AssertUnwindSafe(comments::fetch_parent_batch(&client, &request.ids))
                .catch_unwind()
                .await
                .map_err(|_| "Loading comments failed unexpectedly.".to_string());
            let _ = tx
                .send(AsyncResult::ParentBatch {
                    session: request.session,
                    task_id,
                    initial,
                    result,
                })
                .await;
        });
    }

    fn spawn_children_fetch(&mut self, request: ChildRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!(
            "Load replies to {} ({} children)",
            request.parent_id,
            request.ids.len()
        ));

        tokio::spawn(async move {
            let result =
                AssertUnwindSafe(comments::fetch_children(&client, &request.ids, request.depth))
                    .catch_unwind()
                    .await
                    .map_err(|_| "Loading replies failed unexpectedly.".to_string());
            let _ = tx
                .send(AsyncResult::Children {
                    session: request.session,
                    task_id,
                    parent_id: request.parent_id,
                    result,
                })
                .await;
        });
    }
}

async fn fetch_story_page(
    client: &HnClient,
    storage: Option<&Storage>,
    feed: Feed,
    count: usize,
) -> Result<StoryPage, String> {
    if feed == Feed::Saved {
        let storage =
            storage.ok_or_else(|| "Saved stories are unavailable: storage is disabled".to_string())?;
        let stories: Vec<Story> = storage
            .list_saved()
            .await
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(Story::from)
            .collect();
        let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
        return Ok(StoryPage {
            attempted: ids.len(),
            ids,
            stories,
        });
    }

    let ids = client
        .fetch_feed_ids(feed)
        .await
        .map_err(|e| e.user_message())?;
    let first = &ids[..count.min(ids.len())];
    let stories = client.fetch_stories_by_ids(first).await;
    Ok(StoryPage {
        attempted: first.len(),
        stories,
        ids,
    })
}

fn open_in_browser(url: &str) {
    match open::that(url) {
        Ok(()) => debug!(url, "opened in browser"),
        Err(e) => warn!(url, error = %e, "failed to open browser"),
    }
}
