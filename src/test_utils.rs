//! Test data builders for app and view tests.

use std::time::Instant;

use crate::api::{CommentRecord, Feed, HnClient, Story};
use crate::app::{App, Notice, ThreadView, View};
use crate::comments::{BatchOutcome, ChildOutcome, CommentSession, ExpandStep, SessionId};
use crate::settings::Settings;
use crate::storage::Storage;
use crate::theme::ResolvedTheme;
use crate::time::fixed_clock;

/// Fixed timestamp for deterministic tests: 2023-11-16 00:00:00 UTC.
/// Sample data is stamped around 1700000000, so it renders as "1d ago".
pub const TEST_NOW: i64 = 1700092800;

pub struct StoryBuilder {
    id: u64,
    title: String,
    url: Option<String>,
    text: Option<String>,
    score: u32,
    by: String,
    time: u64,
    descendants: u32,
    kids: Vec<u64>,
    item_type: String,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StoryBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            title: "Test Story".to_string(),
            url: Some("https://example.com".to_string()),
            text: None,
            score: 100,
            by: "testuser".to_string(),
            time: 1700000000,
            descendants: 10,
            kids: vec![],
            item_type: "story".to_string(),
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn no_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn text(mut self, html: &str) -> Self {
        self.text = Some(html.to_string());
        self
    }

    pub fn score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.by = author.to_string();
        self
    }

    pub fn comments(mut self, count: u32) -> Self {
        self.descendants = count;
        self
    }

    pub fn time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn kids(mut self, kids: Vec<u64>) -> Self {
        self.kids = kids;
        self
    }

    pub fn job(mut self) -> Self {
        self.item_type = "job".to_string();
        self
    }

    pub fn build(self) -> Story {
        Story {
            id: self.id,
            title: self.title,
            url: self.url,
            text: self.text,
            score: self.score,
            by: self.by,
            time: self.time,
            descendants: self.descendants,
            kids: self.kids,
            item_type: self.item_type,
        }
    }
}

pub struct CommentBuilder {
    id: u64,
    parent_id: u64,
    text: Option<String>,
    by: Option<String>,
    time: u64,
    depth: usize,
    kids: Vec<u64>,
    deleted: bool,
    dead: bool,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            parent_id: 0,
            text: Some("Test comment".to_string()),
            by: Some("commenter".to_string()),
            time: 1700000000,
            depth: 0,
            kids: vec![],
            deleted: false,
            dead: false,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn parent(mut self, parent_id: u64) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn text(mut self, html: &str) -> Self {
        self.text = Some(html.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.by = Some(author.to_string());
        self
    }

    pub fn time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn kids(mut self, kids: Vec<u64>) -> Self {
        self.kids = kids;
        self
    }

    /// Deleted items come back without author or text.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self.by = None;
        self.text = None;
        self
    }

    pub fn dead(mut self) -> Self {
        self.dead = true;
        self
    }

    pub fn build(self) -> CommentRecord {
        CommentRecord {
            id: self.id,
            parent_id: self.parent_id,
            author: self.by,
            created_at: self.time,
            body_html: self.text,
            child_ids: self.kids,
            is_deleted: self.deleted,
            is_dead: self.dead,
            depth: self.depth,
        }
    }
}

/// Build a session that already holds `records`. Depth-0 records form the
/// first parent batch; deeper ones are spliced in by expanding their
/// parents in the order they appear.
pub fn loaded_session(story: &Story, records: Vec<CommentRecord>, batch_size: usize) -> CommentSession {
    let (roots, replies): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.depth == 0);
    let parent_ids = if story.kids.is_empty() {
        roots.iter().map(|r| r.id).collect()
    } else {
        story.kids.clone()
    };
    let mut session = CommentSession::new(SessionId(1), story.id, parent_ids, batch_size);

    if let Some(request) = session.begin_initial_load() {
        let outcome = BatchOutcome {
            records: roots
                .into_iter()
                .filter(|r| request.ids.contains(&r.id))
                .collect(),
            attempted: request.ids.len(),
        };
        session.finish_initial_load(request.session, Ok(outcome));
    }

    let mut parents: Vec<u64> = Vec::new();
    for reply in &replies {
        if !parents.contains(&reply.parent_id) {
            parents.push(reply.parent_id);
        }
    }
    for parent in parents {
        if let ExpandStep::Fetch(request) = session.begin_expand(parent) {
            let outcome = ChildOutcome {
                records: replies
                    .iter()
                    .filter(|r| r.parent_id == parent)
                    .cloned()
                    .collect(),
                ..Default::default()
            };
            session.finish_expand(request.session, parent, Ok(outcome));
        }
    }
    session
}

#[allow(dead_code)]
pub struct TestAppBuilder {
    view: Option<View>,
    feed: Feed,
    stories: Vec<Story>,
    story_ids: Option<Vec<u64>>,
    thread: Option<(Story, Vec<CommentRecord>)>,
    selected_index: usize,
    scroll_offset: usize,
    loading: bool,
    loading_more: bool,
    has_more: bool,
    error: Option<String>,
    show_help: bool,
    debug_visible: bool,
    modal: bool,
    notice: Option<String>,
    settings: Settings,
    theme: ResolvedTheme,
    client: Option<HnClient>,
    storage: Option<Storage>,
    viewport: Option<(u16, u16)>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            view: None,
            feed: Feed::Top,
            stories: Vec::new(),
            story_ids: None,
            thread: None,
            selected_index: 0,
            scroll_offset: 0,
            loading: false,
            loading_more: false,
            has_more: true,
            error: None,
            show_help: false,
            debug_visible: false,
            modal: false,
            notice: None,
            settings: Settings::default(),
            theme: ResolvedTheme::default(),
            client: None,
            storage: None,
            viewport: None,
        }
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    pub fn feed(mut self, feed: Feed) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_stories(mut self, stories: Vec<Story>) -> Self {
        self.stories = stories;
        self
    }

    /// Full id list of the feed; defaults to the ids of the loaded stories.
    pub fn story_ids(mut self, ids: Vec<u64>) -> Self {
        self.story_ids = Some(ids);
        self
    }

    /// Open `story` in the comment view with `records` already loaded.
    pub fn thread(mut self, story: Story, records: Vec<CommentRecord>) -> Self {
        self.thread = Some((story, records));
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn loading_more(mut self, loading: bool) -> Self {
        self.loading_more = loading;
        self
    }

    pub fn has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn debug_visible(mut self) -> Self {
        self.debug_visible = true;
        self
    }

    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    pub fn notice(mut self, text: &str) -> Self {
        self.notice = Some(text.to_string());
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn comment_batch_size(mut self, size: usize) -> Self {
        self.settings.comments.batch_size = size;
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn client(mut self, client: HnClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn viewport(mut self, width: u16, height: u16) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn build(self) -> App {
        let mut app = App::new(self.settings, self.storage);
        app.theme = self.theme;
        app.clock = fixed_clock(TEST_NOW);
        if let Some(client) = self.client {
            app.client = client;
        }

        app.feed = self.feed;
        app.story_ids = self
            .story_ids
            .unwrap_or_else(|| self.stories.iter().map(|s| s.id).collect());
        app.story_cursor = self.stories.len().min(app.story_ids.len());
        app.stories = self.stories;
        app.selected_index = self.selected_index;
        app.scroll_offset = self.scroll_offset;

        app.load.loading = self.loading;
        app.load.loading_start = self.loading.then(Instant::now);
        app.load.loading_more = self.loading_more;
        app.load.has_more = self.has_more;
        app.load.error = self.error;

        app.show_help = self.show_help;
        app.debug.visible = self.debug_visible;
        app.modal_started = self.modal.then(Instant::now);
        app.notice = self.notice.map(|text| Notice {
            text,
            shown_at: Instant::now(),
        });
        app.viewport = self.viewport;

        if let Some((story, records)) = self.thread {
            let session = loaded_session(&story, records, app.settings.comments.batch_size);
            app.next_session = 1;
            app.thread = Some(ThreadView::new(
                story,
                session,
                app.selected_index,
                app.scroll_offset,
            ));
            app.view = View::Comments;
        }
        if let Some(view) = self.view {
            app.view = view;
        }
        app
    }
}

pub fn sample_stories() -> Vec<Story> {
    vec![
        StoryBuilder::new()
            .id(1)
            .title("Show HN: A terminal reader for Hacker News")
            .url("https://github.com/user/hn-term")
            .score(142)
            .author("alice")
            .comments(47)
            .time(1700000000)
            .build(),
        StoryBuilder::new()
            .id(2)
            .title("Why Rust is the Future of Systems Programming")
            .url("https://example.com/rust-future")
            .score(89)
            .author("bob")
            .comments(23)
            .time(1699990000)
            .build(),
        StoryBuilder::new()
            .id(3)
            .title("Ask HN: What are you working on?")
            .no_url()
            .text("Share your side projects.")
            .score(56)
            .author("carol")
            .comments(128)
            .time(1699980000)
            .build(),
        StoryBuilder::new()
            .id(4)
            .title("The unreasonable effectiveness of simple HTML")
            .url("https://blog.example.com/simple-html")
            .score(234)
            .author("dave")
            .comments(89)
            .time(1699970000)
            .build(),
        StoryBuilder::new()
            .id(5)
            .title("A Deep Dive into Linux Kernel Networking")
            .url("https://lwn.net/kernel-networking")
            .score(167)
            .author("erin")
            .comments(34)
            .time(1699960000)
            .build(),
    ]
}

/// A small thread under story 1: two roots, the first expanded with one
/// reply of its own, plus a root whose only reply was deleted.
pub fn sample_comments() -> Vec<CommentRecord> {
    vec![
        CommentBuilder::new()
            .id(100)
            .parent(1)
            .text("This is a great project! I love the <i>vim</i> keybindings.")
            .author("commenter1")
            .kids(vec![101])
            .build(),
        CommentBuilder::new()
            .id(102)
            .parent(1)
            .text("How does it compare to other HN readers?")
            .author("commenter3")
            .time(1699995000)
            .kids(vec![103])
            .build(),
        CommentBuilder::new()
            .id(101)
            .parent(100)
            .text(r#"Agreed, see <a href="https://example.com/keys">the docs</a>."#)
            .author("commenter2")
            .time(1700001000)
            .depth(1)
            .build(),
    ]
}

pub fn sample_story_with_comments() -> Story {
    StoryBuilder::new()
        .id(1)
        .title("Show HN: A terminal reader for Hacker News")
        .url("https://github.com/user/hn-term")
        .author("alice")
        .kids(vec![100, 102])
        .build()
}
