//! Flattened, order-preserving navigation sequence over the comment tree.
//!
//! Entries are kept in depth-first display order. Hidden entries stay in
//! place so collapse and re-expand never reorder anything.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    pub comment_id: u64,
    pub depth: usize,
    pub is_visible: bool,
}

impl NavigationEntry {
    pub const fn visible(comment_id: u64, depth: usize) -> Self {
        Self {
            comment_id,
            depth,
            is_visible: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct NavigationSequence {
    entries: Vec<NavigationEntry>,
}

impl NavigationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, comment_id: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.comment_id == comment_id)
    }

    #[cfg(test)]
    pub fn get(&self, comment_id: u64) -> Option<&NavigationEntry> {
        self.entries.iter().find(|e| e.comment_id == comment_id)
    }

    /// Root-level parents go to the end, in fetch order.
    pub fn append(&mut self, entries: impl IntoIterator<Item = NavigationEntry>) {
        self.entries.extend(entries);
    }

    /// Mark the given ids hidden. Entries are never removed.
    pub fn hide(&mut self, ids: &[u64]) {
        let ids: HashSet<u64> = ids.iter().copied().collect();
        for entry in &mut self.entries {
            if ids.contains(&entry.comment_id) {
                entry.is_visible = false;
            }
        }
    }

    /// Ids of the visible entries, in display order.
    pub fn visible_ids(&self) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|e| e.is_visible)
            .map(|e| e.comment_id)
            .collect()
    }

    /// Whether `parent_id` has at least one direct child entry that is
    /// currently hidden.
    pub fn has_hidden_children(&self, parent_id: u64) -> bool {
        let Some(pos) = self.position(parent_id) else {
            return false;
        };
        let depth = self.entries[pos].depth;
        self.entries[pos + 1..]
            .iter()
            .take_while(|e| e.depth > depth)
            .any(|e| e.depth == depth + 1 && !e.is_visible)
    }

    /// Rebuild the block of entries directly below `parent_id` so that it
    /// holds one group per id in `child_ids`, in that order. A group is a
    /// direct child entry followed by its own subtree entries. Existing
    /// groups are moved as a whole (nested state intact); missing children
    /// get fresh entries. Groups for ids not in `child_ids` are kept at the
    /// end of the block.
    ///
    /// Visibility inside the block is then recomputed from `expanded`: direct
    /// children follow the parent's visibility, deeper entries are visible
    /// iff their own parent is visible and expanded.
    ///
    /// Returns the number of entries created.
    pub fn expand_block(
        &mut self,
        parent_id: u64,
        child_ids: &[u64],
        expanded: &HashSet<u64>,
    ) -> usize {
        let Some(pos) = self.position(parent_id) else {
            return 0;
        };
        let parent = self.entries[pos];
        let child_depth = parent.depth + 1;
        let start = pos + 1;
        let end = self.entries[start..]
            .iter()
            .position(|e| e.depth <= parent.depth)
            .map_or(self.entries.len(), |offset| start + offset);

        let mut groups: Vec<Vec<NavigationEntry>> = Vec::new();
        for entry in self.entries.drain(start..end) {
            match groups.last_mut() {
                Some(group) if entry.depth != child_depth => group.push(entry),
                _ => groups.push(vec![entry]),
            }
        }

        let mut rebuilt = Vec::new();
        let mut created = 0;
        for &child_id in child_ids {
            let existing = groups.iter().position(|g| {
                g.first()
                    .is_some_and(|e| e.comment_id == child_id && e.depth == child_depth)
            });
            match existing {
                Some(idx) => rebuilt.extend(groups.remove(idx)),
                None => {
                    rebuilt.push(NavigationEntry::visible(child_id, child_depth));
                    created += 1;
                }
            }
        }
        rebuilt.extend(groups.into_iter().flatten());

        let mut visible_at_depth = vec![parent.is_visible];
        for entry in &mut rebuilt {
            let rel = entry.depth.saturating_sub(child_depth);
            visible_at_depth.truncate(rel + 1);
            visible_at_depth.resize(rel + 1, false);
            entry.is_visible = visible_at_depth[rel];
            visible_at_depth.push(entry.is_visible && expanded.contains(&entry.comment_id));
        }

        self.entries.splice(start..start, rebuilt);
        created
    }
}
