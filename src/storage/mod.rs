mod db;
mod migrations;
mod queries;
mod types;

use std::io;
use std::path::PathBuf;

use rusqlite::Connection;
use tokio::sync::{mpsc, oneshot};

pub use types::SavedStory;

use crate::api::Story;
use crate::time::now_unix;

pub enum StorageLocation {
    Path(PathBuf),
    #[cfg(test)]
    InMemory,
}

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    Channel(String),
    Migration { version: i64, error: String },
    NoDbPathParent,
    IO(io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Sqlite(e) => write!(f, "Database error: {}", e),
            StorageError::Channel(msg) => write!(f, "Channel error: {}", msg),
            StorageError::Migration { version, error } => {
                write!(f, "Migration {} failed: {}", version, error)
            }
            StorageError::NoDbPathParent => write!(f, "db path did not have a parent dir"),
            StorageError::IO(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Sqlite(e)
    }
}

impl<T> From<mpsc::error::SendError<T>> for StorageError {
    fn from(e: mpsc::error::SendError<T>) -> Self {
        StorageError::Channel(e.to_string())
    }
}

impl From<oneshot::error::RecvError> for StorageError {
    fn from(e: oneshot::error::RecvError) -> Self {
        StorageError::Channel(e.to_string())
    }
}

pub(crate) enum StorageCommand {
    SaveStory {
        story: SavedStory,
        reply: oneshot::Sender<Result<bool, StorageError>>,
    },
    RemoveStory {
        id: u64,
        reply: oneshot::Sender<Result<bool, StorageError>>,
    },
    ListSaved {
        reply: oneshot::Sender<Result<Vec<SavedStory>, StorageError>>,
    },
}

/// Handle to the saved-stories database. The connection lives on its own
/// thread; handles are cheap to clone and talk to it over a channel.
#[derive(Clone)]
pub struct Storage {
    cmd_tx: mpsc::Sender<StorageCommand>,
}

impl Storage {
    pub fn open(location: StorageLocation) -> Result<Self, StorageError> {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);

        let conn = match location {
            StorageLocation::Path(path) => {
                let parent = path.parent().ok_or(StorageError::NoDbPathParent)?;
                if !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(StorageError::IO)?;
                }
                tracing::debug!(path = %path.display(), "opening storage");
                Connection::open(&path)?
            }
            #[cfg(test)]
            StorageLocation::InMemory => Connection::open_in_memory()?,
        };

        migrations::migrate(&conn)?;
        std::thread::spawn(move || {
            db::run_worker(conn, cmd_rx);
        });

        Ok(Self { cmd_tx })
    }

    /// Returns false if the story was already saved.
    pub async fn save_story(&self, story: &Story) -> Result<bool, StorageError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(StorageCommand::SaveStory {
                story: SavedStory::from_story(story, now_unix()),
                reply: tx,
            })
            .await?;
        rx.await?
    }

    /// Returns false if the story was not saved.
    pub async fn remove_story(&self, id: u64) -> Result<bool, StorageError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(StorageCommand::RemoveStory { id, reply: tx })
            .await?;
        rx.await?
    }

    pub async fn list_saved(&self) -> Result<Vec<SavedStory>, StorageError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(StorageCommand::ListSaved { reply: tx })
            .await?;
        rx.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StoryBuilder;

    fn storage() -> Storage {
        Storage::open(StorageLocation::InMemory).unwrap()
    }

    async fn saved(storage: &Storage, id: u64) -> Option<SavedStory> {
        storage
            .list_saved()
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.id == id)
    }

    #[tokio::test]
    async fn test_save_and_list_round_trip() {
        let storage = storage();
        let story = StoryBuilder::new()
            .id(123)
            .title("Saved Story")
            .kids(vec![1, 2, 3])
            .build();

        assert!(storage.save_story(&story).await.unwrap());

        let loaded = saved(&storage, 123).await.unwrap();
        assert_eq!(loaded.title, "Saved Story");
        assert_eq!(loaded.kids, vec![1, 2, 3]);
        assert_eq!(Story::from(loaded), story);
    }

    #[tokio::test]
    async fn test_save_existing_is_noop() {
        let storage = storage();
        let story = StoryBuilder::new().id(1).build();

        assert!(storage.save_story(&story).await.unwrap());
        assert!(!storage.save_story(&story).await.unwrap());
        assert_eq!(storage.list_saved().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_returns_false() {
        let storage = storage();
        assert!(!storage.remove_story(42).await.unwrap());

        storage
            .save_story(&StoryBuilder::new().id(42).build())
            .await
            .unwrap();
        assert!(storage.remove_story(42).await.unwrap());
        assert!(saved(&storage, 42).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let storage = storage();
        assert!(storage.list_saved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_creates_parent_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data.db");
        let storage = Storage::open(StorageLocation::Path(path.clone())).unwrap();

        storage
            .save_story(&StoryBuilder::new().id(7).build())
            .await
            .unwrap();
        assert!(path.exists());
    }
}
