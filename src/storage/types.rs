use crate::api::Story;

/// A story row in the saved list. Keeps enough of the item to render it
/// and open its comments without going back to the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedStory {
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
    pub saved_at: i64,
}

impl SavedStory {
    pub fn from_story(story: &Story, saved_at: i64) -> Self {
        SavedStory {
            id: story.id,
            title: story.title.clone(),
            url: story.url.clone(),
            text: story.text.clone(),
            score: story.score,
            by: story.by.clone(),
            time: story.time,
            descendants: story.descendants,
            kids: story.kids.clone(),
            item_type: story.item_type.clone(),
            saved_at,
        }
    }
}

impl From<SavedStory> for Story {
    fn from(saved: SavedStory) -> Self {
        Story {
            id: saved.id,
            title: saved.title,
            url: saved.url,
            text: saved.text,
            score: saved.score,
            by: saved.by,
            time: saved.time,
            descendants: saved.descendants,
            kids: saved.kids,
            item_type: saved.item_type,
        }
    }
}
