use rusqlite::{Connection, Row, params};

use super::StorageError;
use super::types::SavedStory;

fn kids_to_json(kids: &[u64]) -> String {
    serde_json::to_string(kids).unwrap_or_else(|_| "[]".to_string())
}

fn json_to_kids(json: &str) -> Vec<u64> {
    serde_json::from_str(json).unwrap_or_default()
}

const COLUMNS: &str =
    "id, title, url, text, score, by, time, descendants, kids, item_type, saved_at";

fn row_to_saved(row: &Row<'_>) -> rusqlite::Result<SavedStory> {
    let kids_json: String = row.get(8)?;
    Ok(SavedStory {
        id: row.get::<_, i64>(0)? as u64,
        title: row.get(1)?,
        url: row.get(2)?,
        text: row.get(3)?,
        score: row.get::<_, i64>(4)? as u32,
        by: row.get(5)?,
        time: row.get::<_, i64>(6)? as u64,
        descendants: row.get::<_, i64>(7)? as u32,
        kids: json_to_kids(&kids_json),
        item_type: row.get(9)?,
        saved_at: row.get(10)?,
    })
}

/// Insert unless already saved. Returns whether a row was added; the
/// original `saved_at` is kept for a story saved twice.
pub fn save_story(conn: &Connection, story: &SavedStory) -> Result<bool, StorageError> {
    let inserted = conn.execute(
        "INSERT INTO saved_stories (id, title, url, text, score, by, time, descendants, kids, item_type, saved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(id) DO NOTHING",
        params![
            story.id as i64,
            story.title,
            story.url,
            story.text,
            i64::from(story.score),
            story.by,
            story.time as i64,
            i64::from(story.descendants),
            kids_to_json(&story.kids),
            story.item_type,
            story.saved_at,
        ],
    )?;
    Ok(inserted > 0)
}

pub fn remove_story(conn: &Connection, id: u64) -> Result<bool, StorageError> {
    let removed = conn.execute(
        "DELETE FROM saved_stories WHERE id = ?1",
        params![id as i64],
    )?;
    Ok(removed > 0)
}

/// Newest first. Ties (same second) fall back to insertion order, newest first.
pub fn list_saved(conn: &Connection) -> Result<Vec<SavedStory>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM saved_stories ORDER BY saved_at DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map([], row_to_saved)?;
    let mut stories = Vec::new();
    for row in rows {
        stories.push(row?);
    }
    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::migrate;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn find(conn: &Connection, id: u64) -> Option<SavedStory> {
        list_saved(conn).unwrap().into_iter().find(|s| s.id == id)
    }

    fn saved(id: u64, saved_at: i64) -> SavedStory {
        SavedStory {
            id,
            title: format!("Story {id}"),
            url: None,
            text: Some("<p>body".to_string()),
            score: 3,
            by: "user".to_string(),
            time: 1700000000,
            descendants: 2,
            kids: vec![10, 11],
            item_type: "story".to_string(),
            saved_at,
        }
    }

    #[test]
    fn test_save_twice_keeps_first_timestamp() {
        let conn = conn();
        assert!(save_story(&conn, &saved(1, 100)).unwrap());
        assert!(!save_story(&conn, &saved(1, 200)).unwrap());

        let loaded = find(&conn, 1).unwrap();
        assert_eq!(loaded.saved_at, 100);
        assert_eq!(loaded.kids, vec![10, 11]);
        assert_eq!(loaded.text.as_deref(), Some("<p>body"));
    }

    #[test]
    fn test_list_newest_first() {
        let conn = conn();
        save_story(&conn, &saved(1, 100)).unwrap();
        save_story(&conn, &saved(2, 300)).unwrap();
        save_story(&conn, &saved(3, 300)).unwrap();
        save_story(&conn, &saved(4, 200)).unwrap();

        let ids: Vec<u64> = list_saved(&conn).unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_remove() {
        let conn = conn();
        save_story(&conn, &saved(1, 100)).unwrap();
        assert!(remove_story(&conn, 1).unwrap());
        assert!(!remove_story(&conn, 1).unwrap());
        assert!(find(&conn, 1).is_none());
    }
}
