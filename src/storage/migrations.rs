//! Schema upgrades tracked in SQLite's `user_version` header field.
//!
//! Step `n` in [`STEPS`] moves a database from version `n` to `n + 1`. Each
//! step commits together with its version bump, so a failed upgrade leaves
//! the file at the last good version.

use rusqlite::Connection;

use super::StorageError;

/// (label, sql) pairs in upgrade order.
const STEPS: &[(&str, &str)] = &[("saved stories", include_str!("sql/001_saved_stories.sql"))];

pub fn latest_version() -> i64 {
    STEPS.len() as i64
}

pub fn schema_version(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`] and returns how many steps ran.
pub fn migrate(conn: &Connection) -> Result<usize, StorageError> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StorageError::Migration {
            version: found,
            error: format!("saved stories were written by a newer build (schema {latest} known)"),
        });
    }

    let pending = STEPS.iter().enumerate().skip(found.max(0) as usize);
    let mut applied = 0;
    for (index, (label, sql)) in pending {
        let version = index as i64 + 1;
        let step = |conn: &Connection| -> rusqlite::Result<()> {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()
        };
        step(conn).map_err(|e| StorageError::Migration {
            version,
            error: e.to_string(),
        })?;
        tracing::info!(version, label, "upgraded saved stories schema");
        applied += 1;
    }
    Ok(applied)
}
