use serde::Deserialize;

/// Raw item as served by `/item/{id}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub by: Option<String>,
    pub time: Option<u64>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: Option<u32>,
    pub title: Option<String>,
    pub descendants: Option<u32>,
    #[serde(default)]
    pub kids: Vec<u64>,
    pub parent: Option<u64>,
    pub deleted: Option<bool>,
    pub dead: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub text: Option<String>,
    pub score: u32,
    pub by: String,
    pub time: u64,
    pub descendants: u32,
    pub kids: Vec<u64>,
    pub item_type: String,
}

impl Story {
    pub fn from_item(item: HnItem) -> Option<Self> {
        if item.deleted.unwrap_or(false) || item.dead.unwrap_or(false) {
            return None;
        }
        Some(Story {
            id: item.id,
            title: item.title?,
            url: item.url,
            text: item.text,
            score: item.score.unwrap_or(0),
            by: item.by.unwrap_or_else(|| "[deleted]".to_string()),
            time: item.time.unwrap_or(0),
            descendants: item.descendants.unwrap_or(0),
            kids: item.kids,
            item_type: item.item_type.unwrap_or_else(|| "story".to_string()),
        })
    }

    pub fn domain(&self) -> &str {
        self.url
            .as_ref()
            .and_then(|u| {
                u.split("://")
                    .nth(1)
                    .and_then(|s| s.split('/').next())
                    .map(|s| s.strip_prefix("www.").unwrap_or(s))
            })
            .unwrap_or("self")
    }

    pub fn is_job(&self) -> bool {
        self.item_type == "job"
    }

    /// URL to the HN discussion page for this story.
    pub fn hn_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }

    /// URL to the story content (article URL, or HN page for self-posts).
    pub fn content_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.hn_url())
    }
}

/// A comment as held by the tree store.
///
/// `depth` is assigned when the record is fetched (root-level parents are 0,
/// children are `parent.depth + 1`) and is never recomputed. Records are
/// replaced wholesale on re-fetch, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: u64,
    pub parent_id: u64,
    pub author: Option<String>,
    pub created_at: u64,
    pub body_html: Option<String>,
    pub child_ids: Vec<u64>,
    pub is_deleted: bool,
    pub is_dead: bool,
    pub depth: usize,
}

impl CommentRecord {
    pub fn from_item(item: HnItem, depth: usize) -> Self {
        CommentRecord {
            id: item.id,
            parent_id: item.parent.unwrap_or(0),
            author: item.by,
            created_at: item.time.unwrap_or(0),
            body_html: item.text,
            child_ids: item.kids,
            is_deleted: item.deleted.unwrap_or(false),
            is_dead: item.dead.unwrap_or(false),
            depth,
        }
    }

    /// Deleted or dead records never show up in navigation or counts.
    pub const fn is_moderated(&self) -> bool {
        self.is_deleted || self.is_dead
    }

    pub fn author_label(&self) -> &str {
        self.author.as_deref().unwrap_or("[deleted]")
    }

    /// URL to the HN permalink for this comment.
    pub fn hn_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feed {
    #[default]
    Top,
    New,
    Show,
    Ask,
    Jobs,
    Saved,
}

impl Feed {
    /// Path segment of the remote id list, `None` for locally stored feeds.
    pub const fn endpoint(&self) -> Option<&'static str> {
        match self {
            Feed::Top => Some("topstories"),
            Feed::New => Some("newstories"),
            Feed::Show => Some("showstories"),
            Feed::Ask => Some("askstories"),
            Feed::Jobs => Some("jobstories"),
            Feed::Saved => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Feed::Top => "Top",
            Feed::New => "New",
            Feed::Show => "Show",
            Feed::Ask => "Ask",
            Feed::Jobs => "Jobs",
            Feed::Saved => "Saved",
        }
    }

    pub const fn all() -> &'static [Feed] {
        &[
            Feed::Top,
            Feed::New,
            Feed::Show,
            Feed::Ask,
            Feed::Jobs,
            Feed::Saved,
        ]
    }
}

impl std::str::FromStr for Feed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feed::all()
            .iter()
            .copied()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown feed: {s}. Use top, new, show, ask, jobs or saved"))
    }
}
