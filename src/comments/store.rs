//! In-memory comment store for one story session.

use std::collections::{HashMap, HashSet};

use crate::api::CommentRecord;

/// Source of truth for every comment loaded in the current session, keyed by
/// id. Moderated records are stored too so their ids are known.
#[derive(Debug, Default)]
pub struct TreeStore {
    records: HashMap<u64, CommentRecord>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace records by id. Other entries are untouched.
    pub fn upsert(&mut self, records: impl IntoIterator<Item = CommentRecord>) {
        for record in records {
            self.records.insert(record.id, record);
        }
    }

    pub fn get(&self, id: u64) -> Option<&CommentRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every transitive descendant of `id` in depth-first preorder, `id`
    /// excluded. Child ids missing from the store are skipped. Uses an
    /// explicit stack and a visited set, so malformed back-references cannot
    /// loop or blow the call stack.
    pub fn collect_descendant_ids(&self, id: u64) -> Vec<u64> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);
        let Some(root) = self.records.get(&id) else {
            return out;
        };

        let mut stack: Vec<u64> = root.child_ids.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let Some(record) = self.records.get(&next) else {
                continue;
            };
            out.push(next);
            stack.extend(record.child_ids.iter().rev().copied());
        }
        out
    }

    /// Direct children of `id` that are loaded and not moderated.
    pub fn count_valid_children(&self, id: u64) -> usize {
        self.valid_child_ids(id).len()
    }

    /// Loaded, non-moderated direct children of `id` in `child_ids` order.
    pub fn valid_child_ids(&self, id: u64) -> Vec<u64> {
        let Some(record) = self.records.get(&id) else {
            return Vec::new();
        };
        record
            .child_ids
            .iter()
            .copied()
            .filter(|child| {
                self.records
                    .get(child)
                    .is_some_and(|r| !r.is_moderated())
            })
            .collect()
    }
}
