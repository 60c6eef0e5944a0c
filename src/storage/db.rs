use rusqlite::Connection;
use tokio::sync::mpsc;

use super::StorageCommand;
use super::queries;

pub(super) fn run_worker(conn: Connection, mut cmd_rx: mpsc::Receiver<StorageCommand>) {
    while let Some(cmd) = cmd_rx.blocking_recv() {
        match cmd {
            StorageCommand::SaveStory { story, reply } => {
                let result = queries::save_story(&conn, &story);
                let _ = reply.send(result);
            }
            StorageCommand::RemoveStory { id, reply } => {
                let result = queries::remove_story(&conn, id);
                let _ = reply.send(result);
            }
            StorageCommand::ListSaved { reply } => {
                let result = queries::list_saved(&conn);
                let _ = reply.send(result);
            }
        }
    }
    tracing::debug!("storage worker stopped");
}
