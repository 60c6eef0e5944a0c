//! Async batch executors. Both run their fetches one after another so drop
//! counts stay predictable and the upstream API sees a steady trickle.
//!
//! Neither can fail: an item that cannot be fetched or decoded is dropped
//! and the batch carries on.

use tracing::debug;

use crate::api::{CommentRecord, DropReason, HnClient};

/// Result of a parent batch. `attempted` counts every id tried, including
/// the ones that were dropped, so pagination always moves forward.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<CommentRecord>,
    pub attempted: usize,
}

/// Result of fetching one node's missing children.
///
/// `records` includes moderated children so the store knows them;
/// `unavailable` lists the ids that could not be had at all.
#[derive(Debug, Default)]
pub struct ChildOutcome {
    pub records: Vec<CommentRecord>,
    pub unavailable: Vec<u64>,
}

/// Fetch root-level parents in order, dropping unavailable and moderated
/// ones.
pub async fn fetch_parent_batch(client: &HnClient, ids: &[u64]) -> BatchOutcome {
    let mut records = Vec::with_capacity(ids.len());
    for &id in ids {
        match client.fetch_comment(id, 0).await {
            Ok(record) if record.is_moderated() => {
                debug!(id, reason = %DropReason::Moderated, "dropping parent");
            }
            Ok(record) => records.push(record),
            Err(reason) => debug!(id, %reason, "dropping parent"),
        }
    }
    debug!(
        attempted = ids.len(),
        kept = records.len(),
        "parent batch fetched"
    );
    BatchOutcome {
        records,
        attempted: ids.len(),
    }
}

/// Fetch children of one node in `child_ids` order.
pub async fn fetch_children(client: &HnClient, ids: &[u64], depth: usize) -> ChildOutcome {
    let mut outcome = ChildOutcome::default();
    for &id in ids {
        match client.fetch_comment(id, depth).await {
            Ok(record) => {
                if record.is_moderated() {
                    debug!(id, reason = %DropReason::Moderated, "child not navigable");
                }
                outcome.records.push(record);
            }
            Err(_) => outcome.unavailable.push(id),
        }
    }
    outcome
}
