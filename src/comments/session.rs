//! Per-story comment session: owns the tree store, the navigation sequence
//! and the loading state machine.
//!
//! The session never performs I/O itself. Each `begin_*` call validates the
//! request against the current state and hands back what needs fetching;
//! the matching `finish_*` applies the result. Every request carries the
//! session id so results that arrive after a story switch or refresh are
//! rejected.
//!
//! Individual items never fail a request; they are dropped by the loaders.
//! An `Err` handed to `finish_*` means the fetch task itself died.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, warn};

use super::loader::{BatchOutcome, ChildOutcome};
use super::sequence::{NavigationEntry, NavigationSequence};
use super::store::TreeStore;
use crate::api::CommentRecord;

pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Initial load failed; replaces the comment list until refresh.
    Blocking(String),
    /// Load-more or expand failed; retrying the action may succeed.
    Transient(String),
}

impl SessionError {
    pub fn message(&self) -> &str {
        match self {
            Self::Blocking(msg) | Self::Transient(msg) => msg,
        }
    }

    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocking(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SessionError {}

/// Progress through the story's root-level comment ids.
#[derive(Debug, Default)]
pub struct ParentCursor {
    total_parent_ids: Vec<u64>,
    loaded_count: usize,
}

impl ParentCursor {
    pub fn new(total_parent_ids: Vec<u64>) -> Self {
        Self {
            total_parent_ids,
            loaded_count: 0,
        }
    }

    pub fn next_batch(&self, size: usize) -> &[u64] {
        let end = (self.loaded_count + size).min(self.total_parent_ids.len());
        &self.total_parent_ids[self.loaded_count..end]
    }

    fn advance(&mut self, attempted: usize) {
        self.loaded_count = (self.loaded_count + attempted).min(self.total_parent_ids.len());
    }

    pub const fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn total(&self) -> usize {
        self.total_parent_ids.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.loaded_count >= self.total_parent_ids.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub session: SessionId,
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRequest {
    pub session: SessionId,
    pub parent_id: u64,
    pub ids: Vec<u64>,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandStep {
    /// Not expandable, unknown, or already loading.
    Ignored,
    /// Expanded with its children showing; nothing to do.
    AlreadyExpanded,
    /// All children were already known; applied synchronously.
    Restored,
    /// Some children must be fetched first.
    Fetch(ChildRequest),
}

/// How a node's replies should be described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replies {
    None,
    Loading,
    /// Every child turned out moderated or unavailable.
    AllRemoved(usize),
    Collapsed(usize),
    Expanded(usize),
}

#[derive(Debug)]
pub struct CommentSession {
    id: SessionId,
    story_id: u64,
    store: TreeStore,
    sequence: NavigationSequence,
    expanded: HashSet<u64>,
    unavailable: HashSet<u64>,
    cursor: ParentCursor,
    phase: Phase,
    loading_more: bool,
    loading_ids: HashSet<u64>,
    error: Option<SessionError>,
    batch_size: usize,
    visible: Vec<u64>,
}

impl CommentSession {
    pub fn new(id: SessionId, story_id: u64, parent_ids: Vec<u64>, batch_size: usize) -> Self {
        Self {
            id,
            story_id,
            store: TreeStore::new(),
            sequence: NavigationSequence::new(),
            expanded: HashSet::new(),
            unavailable: HashSet::new(),
            cursor: ParentCursor::new(parent_ids),
            phase: Phase::Idle,
            loading_more: false,
            loading_ids: HashSet::new(),
            error: None,
            batch_size: batch_size.max(1),
            visible: Vec::new(),
        }
    }

    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub const fn story_id(&self) -> u64 {
        self.story_id
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Loading)
    }

    pub const fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn is_loading_children(&self, id: u64) -> bool {
        self.loading_ids.contains(&id)
    }

    pub fn has_pending_children(&self) -> bool {
        !self.loading_ids.is_empty()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn clear_transient_error(&mut self) {
        if matches!(self.error, Some(SessionError::Transient(_))) {
            self.error = None;
        }
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_exhausted()
    }

    pub const fn cursor(&self) -> &ParentCursor {
        &self.cursor
    }

    pub const fn store(&self) -> &TreeStore {
        &self.store
    }

    #[cfg(test)]
    pub const fn sequence(&self) -> &NavigationSequence {
        &self.sequence
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded.contains(&id)
    }

    /// Visible comment ids in display order.
    pub fn visible_ids(&self) -> &[u64] {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &CommentRecord> {
        self.visible.iter().filter_map(|id| self.store.get(*id))
    }

    /// Reset everything and request the first parent batch. Returns `None`
    /// if a load is already running or the story has no comments.
    pub fn begin_initial_load(&mut self) -> Option<BatchRequest> {
        if self.phase == Phase::Loading {
            return None;
        }
        let parent_ids = std::mem::take(&mut self.cursor.total_parent_ids);
        *self = Self::new(self.id, self.story_id, parent_ids, self.batch_size);

        if self.cursor.is_exhausted() {
            self.phase = Phase::Ready;
            debug!(session = %self.id, story = self.story_id, "story has no comments");
            return None;
        }
        self.phase = Phase::Loading;
        let ids = self.cursor.next_batch(self.batch_size).to_vec();
        info!(session = %self.id, story = self.story_id, count = ids.len(), "loading comments");
        Some(BatchRequest {
            session: self.id,
            ids,
        })
    }

    pub fn finish_initial_load(
        &mut self,
        session: SessionId,
        result: Result<BatchOutcome, String>,
    ) -> bool {
        if session != self.id || self.phase != Phase::Loading {
            debug!(session = %session, current = %self.id, "discarding stale initial batch");
            return false;
        }
        self.phase = Phase::Ready;
        match result {
            Ok(outcome) => self.apply_parent_batch(outcome),
            Err(err) => {
                warn!(session = %self.id, error = %err, "initial comment load failed");
                self.error = Some(SessionError::Blocking(err));
            }
        }
        true
    }

    /// Request the next parent batch. Safe to call redundantly: returns
    /// `None` while a load is running, after the last parent, or after a
    /// blocking failure.
    pub fn begin_load_more(&mut self) -> Option<BatchRequest> {
        if self.phase != Phase::Ready
            || self.loading_more
            || self.cursor.is_exhausted()
            || self.error.as_ref().is_some_and(SessionError::is_blocking)
        {
            return None;
        }
        self.clear_transient_error();
        self.loading_more = true;
        let ids = self.cursor.next_batch(self.batch_size).to_vec();
        debug!(
            session = %self.id,
            loaded = self.cursor.loaded_count(),
            total = self.cursor.total(),
            count = ids.len(),
            "loading more comments"
        );
        Some(BatchRequest {
            session: self.id,
            ids,
        })
    }

    pub fn finish_load_more(
        &mut self,
        session: SessionId,
        result: Result<BatchOutcome, String>,
    ) -> bool {
        if session != self.id || !self.loading_more {
            debug!(session = %session, current = %self.id, "discarding stale parent batch");
            return false;
        }
        self.loading_more = false;
        match result {
            Ok(outcome) => self.apply_parent_batch(outcome),
            Err(err) => {
                warn!(session = %self.id, error = %err, "load more failed");
                self.error = Some(SessionError::Transient(err));
            }
        }
        true
    }

    fn apply_parent_batch(&mut self, outcome: BatchOutcome) {
        self.cursor.advance(outcome.attempted);
        let entries: Vec<NavigationEntry> = outcome
            .records
            .iter()
            .filter(|r| !r.is_moderated() && self.sequence.position(r.id).is_none())
            .map(|r| NavigationEntry::visible(r.id, 0))
            .collect();
        self.store.upsert(outcome.records);
        self.sequence.append(entries);
        self.refresh_visible();
        debug!(
            session = %self.id,
            loaded = self.cursor.loaded_count(),
            total = self.cursor.total(),
            visible = self.visible.len(),
            "parent batch applied"
        );
    }

    /// Children of `id` that have never been fetched this session.
    fn missing_children(&self, record: &CommentRecord) -> Vec<u64> {
        record
            .child_ids
            .iter()
            .copied()
            .filter(|c| !self.store.contains(*c) && !self.unavailable.contains(c))
            .collect()
    }

    pub fn begin_expand(&mut self, id: u64) -> ExpandStep {
        if self.phase != Phase::Ready || self.loading_ids.contains(&id) {
            return ExpandStep::Ignored;
        }
        let Some(record) = self.store.get(id) else {
            return ExpandStep::Ignored;
        };
        if record.is_moderated() {
            return ExpandStep::Ignored;
        }
        let missing = self.missing_children(record);
        let depth = record.depth + 1;
        if missing.is_empty() && self.store.count_valid_children(id) == 0 {
            return ExpandStep::Ignored;
        }
        if self.is_expanded(id) && !self.sequence.has_hidden_children(id) {
            return ExpandStep::AlreadyExpanded;
        }
        self.clear_transient_error();

        if missing.is_empty() {
            self.splice_children(id);
            debug!(session = %self.id, id, "expanded from store");
            return ExpandStep::Restored;
        }

        self.loading_ids.insert(id);
        debug!(session = %self.id, id, missing = missing.len(), "fetching children");
        ExpandStep::Fetch(ChildRequest {
            session: self.id,
            parent_id: id,
            ids: missing,
            depth,
        })
    }

    pub fn finish_expand(
        &mut self,
        session: SessionId,
        parent_id: u64,
        result: Result<ChildOutcome, String>,
    ) -> bool {
        if session != self.id || !self.loading_ids.remove(&parent_id) {
            debug!(session = %session, current = %self.id, parent_id, "discarding stale children");
            return false;
        }
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(session = %self.id, parent_id, error = %err, "expand failed");
                self.error = Some(SessionError::Transient(err));
                return true;
            }
        };
        self.store.upsert(outcome.records);
        self.unavailable.extend(outcome.unavailable);

        if self.store.count_valid_children(parent_id) == 0 {
            debug!(session = %self.id, parent_id, "no navigable children");
            return true;
        }
        self.splice_children(parent_id);
        true
    }

    fn splice_children(&mut self, parent_id: u64) {
        let children = self.store.valid_child_ids(parent_id);
        self.expanded.insert(parent_id);
        let created = self
            .sequence
            .expand_block(parent_id, &children, &self.expanded);
        self.refresh_visible();
        debug!(session = %self.id, parent_id, children = children.len(), created, "children spliced");
    }

    /// Hide every descendant of `id`. Returns false if `id` was not expanded.
    pub fn collapse(&mut self, id: u64) -> bool {
        if !self.expanded.remove(&id) {
            return false;
        }
        self.clear_transient_error();
        let descendants = self.store.collect_descendant_ids(id);
        self.sequence.hide(&descendants);
        self.refresh_visible();
        debug!(session = %self.id, id, hidden = descendants.len(), "collapsed");
        true
    }

    pub fn replies(&self, id: u64) -> Replies {
        let Some(record) = self.store.get(id) else {
            return Replies::None;
        };
        if record.child_ids.is_empty() {
            return Replies::None;
        }
        if self.is_loading_children(id) {
            return Replies::Loading;
        }
        let missing = self.missing_children(record).len();
        let valid = self.store.count_valid_children(id);
        if missing == 0 && valid == 0 {
            return Replies::AllRemoved(record.child_ids.len());
        }
        let count = if missing == record.child_ids.len() {
            record.child_ids.len()
        } else {
            valid + missing
        };
        if self.is_expanded(id) && !self.sequence.has_hidden_children(id) {
            Replies::Expanded(count)
        } else {
            Replies::Collapsed(count)
        }
    }

    fn refresh_visible(&mut self) {
        self.visible = self.sequence.visible_ids();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CommentBuilder;

    const SID: SessionId = SessionId(7);

    fn parent(id: u64, kids: Vec<u64>) -> CommentRecord {
        CommentBuilder::new().id(id).parent(100).kids(kids).build()
    }

    fn child(id: u64, parent_id: u64, depth: usize) -> CommentRecord {
        CommentBuilder::new().id(id).parent(parent_id).depth(depth).build()
    }

    fn batch(records: Vec<CommentRecord>, attempted: usize) -> Result<BatchOutcome, String> {
        Ok(BatchOutcome { records, attempted })
    }

    fn ready_session(parent_ids: Vec<u64>, records: Vec<CommentRecord>) -> CommentSession {
        let mut session = CommentSession::new(SID, 100, parent_ids, DEFAULT_BATCH_SIZE);
        let request = session.begin_initial_load().unwrap();
        let attempted = request.ids.len();
        assert!(session.finish_initial_load(SID, batch(records, attempted)));
        session
    }

    fn expand_with(session: &mut CommentSession, id: u64, records: Vec<CommentRecord>) {
        let ExpandStep::Fetch(req) = session.begin_expand(id) else {
            panic!("expected fetch for {id}");
        };
        let outcome = ChildOutcome {
            records,
            ..Default::default()
        };
        assert!(session.finish_expand(req.session, req.parent_id, Ok(outcome)));
    }

    #[test]
    fn test_initial_load_three_parents() {
        let mut session = CommentSession::new(SID, 100, vec![1, 2, 3], 10);
        let request = session.begin_initial_load().unwrap();
        assert_eq!(request.ids, vec![1, 2, 3]);
        assert!(session.is_loading());

        let records = vec![parent(1, vec![]), parent(2, vec![]), parent(3, vec![])];
        assert!(session.finish_initial_load(SID, batch(records, 3)));

        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.cursor().loaded_count(), 3);
        assert_eq!(session.visible_ids(), &[1, 2, 3]);
        assert!(!session.has_more());
    }

    #[test]
    fn test_empty_story_is_ready_immediately() {
        let mut session = CommentSession::new(SID, 100, vec![], 10);
        assert!(session.begin_initial_load().is_none());
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.visible_ids().is_empty());
    }

    #[test]
    fn test_cursor_advances_by_attempted() {
        let ids: Vec<u64> = (1..=25).collect();
        let mut session = CommentSession::new(SID, 100, ids, 10);
        let request = session.begin_initial_load().unwrap();
        assert_eq!(request.ids.len(), 10);
        // only two of the ten survive
        let kept = vec![parent(1, vec![]), parent(7, vec![])];
        session.finish_initial_load(SID, batch(kept, 10));
        assert_eq!(session.cursor().loaded_count(), 10);
        assert_eq!(session.visible_ids(), &[1, 7]);

        let more = session.begin_load_more().unwrap();
        assert_eq!(more.ids, (11..=20).collect::<Vec<_>>());
        assert!(session.begin_load_more().is_none());
        session.finish_load_more(SID, batch(vec![parent(12, vec![])], 10));

        let last = session.begin_load_more().unwrap();
        assert_eq!(last.ids, (21..=25).collect::<Vec<_>>());
        session.finish_load_more(SID, batch(vec![], 5));
        assert_eq!(session.cursor().loaded_count(), 25);
        assert_eq!(session.visible_ids(), &[1, 7, 12]);
    }

    #[test]
    fn test_load_more_when_exhausted_changes_nothing() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![])]);
        assert!(session.begin_load_more().is_none());
        assert!(!session.is_loading_more());
        assert_eq!(session.cursor().loaded_count(), 1);
    }

    #[test]
    fn test_initial_failure_is_blocking() {
        let mut session = CommentSession::new(SID, 100, vec![1, 2], 10);
        session.begin_initial_load();
        session.finish_initial_load(SID, Err("fetch task panicked".into()));

        assert!(session.error().unwrap().is_blocking());
        assert!(session.visible_ids().is_empty());
        assert!(session.store().is_empty());
        assert!(session.begin_load_more().is_none());
    }

    #[test]
    fn test_failed_load_more_applies_nothing() {
        let ids: Vec<u64> = (1..=15).collect();
        let mut session = CommentSession::new(SID, 100, ids, 10);
        session.begin_initial_load();
        session.finish_initial_load(SID, batch(vec![parent(1, vec![])], 10));

        session.begin_load_more();
        session.finish_load_more(SID, Err("fetch task panicked".into()));

        assert_eq!(session.cursor().loaded_count(), 10);
        assert!(!session.error().unwrap().is_blocking());
        // retry is allowed and clears the transient error
        let retry = session.begin_load_more().unwrap();
        assert_eq!(retry.ids, (11..=15).collect::<Vec<_>>());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_stale_results_discarded() {
        let mut session = CommentSession::new(SID, 100, vec![1], 10);
        session.begin_initial_load();
        assert!(!session.finish_initial_load(SessionId(6), batch(vec![parent(1, vec![])], 1)));
        assert!(session.store().is_empty());
        assert!(session.is_loading());

        session.finish_initial_load(SID, batch(vec![parent(1, vec![2])], 1));
        let outcome = ChildOutcome {
            records: vec![child(2, 1, 1)],
            ..Default::default()
        };
        assert!(!session.finish_expand(SessionId(6), 1, Ok(outcome)));
        assert!(!session.store().contains(2));
    }

    #[test]
    fn test_expand_skips_moderated_child() {
        let mut session = ready_session(vec![5], vec![parent(5, vec![6, 7])]);
        let deleted = CommentBuilder::new().id(6).parent(5).depth(1).deleted().build();
        expand_with(&mut session, 5, vec![deleted, child(7, 5, 1)]);

        assert!(session.store().contains(6));
        assert!(session.store().contains(7));
        assert_eq!(session.visible_ids(), &[5, 7]);
        assert_eq!(session.store().count_valid_children(5), 1);
        assert!(session.is_expanded(5));
        assert_eq!(session.replies(5), Replies::Expanded(1));
    }

    #[test]
    fn test_expand_twice_fetches_once() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![2])]);
        let first = session.begin_expand(1);
        assert!(matches!(first, ExpandStep::Fetch(_)));
        assert_eq!(session.begin_expand(1), ExpandStep::Ignored);
        assert_eq!(session.replies(1), Replies::Loading);

        let outcome = ChildOutcome {
            records: vec![child(2, 1, 1)],
            ..Default::default()
        };
        session.finish_expand(SID, 1, Ok(outcome));
        assert_eq!(session.begin_expand(1), ExpandStep::AlreadyExpanded);
        assert_eq!(session.sequence().len(), 2);
    }

    #[test]
    fn test_collapse_hides_but_keeps_records() {
        let mut session = ready_session(vec![1, 9], vec![parent(1, vec![2, 3]), parent(9, vec![])]);
        expand_with(
            &mut session,
            1,
            vec![
                CommentBuilder::new().id(2).parent(1).depth(1).kids(vec![4]).build(),
                child(3, 1, 1),
            ],
        );
        expand_with(&mut session, 2, vec![child(4, 2, 2)]);
        assert_eq!(session.visible_ids(), &[1, 2, 4, 3, 9]);

        assert!(session.collapse(1));

        assert_eq!(session.visible_ids(), &[1, 9]);
        assert!(!session.is_expanded(1));
        assert!(session.is_expanded(2));
        for id in [2, 3, 4] {
            assert!(session.store().contains(id));
        }
        assert_eq!(session.replies(1), Replies::Collapsed(2));
        assert!(!session.collapse(1));
    }

    #[test]
    fn test_reexpand_restores_visible_set() {
        let mut session = ready_session(vec![1, 9], vec![parent(1, vec![2, 3]), parent(9, vec![])]);
        expand_with(
            &mut session,
            1,
            vec![
                CommentBuilder::new().id(2).parent(1).depth(1).kids(vec![4]).build(),
                child(3, 1, 1),
            ],
        );
        expand_with(&mut session, 2, vec![child(4, 2, 2)]);
        let before = session.visible_ids().to_vec();

        session.collapse(1);
        assert_eq!(session.begin_expand(1), ExpandStep::Restored);

        assert_eq!(session.visible_ids(), before.as_slice());
        assert_eq!(session.sequence().len(), 5);
    }

    #[test]
    fn test_unavailable_children_not_refetched() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![2, 3])]);
        let ExpandStep::Fetch(req) = session.begin_expand(1) else {
            panic!("expected fetch");
        };
        assert_eq!(req.ids, vec![2, 3]);
        assert_eq!(req.depth, 1);
        let outcome = ChildOutcome {
            records: vec![child(2, 1, 1)],
            unavailable: vec![3],
        };
        session.finish_expand(SID, 1, Ok(outcome));
        assert_eq!(session.visible_ids(), &[1, 2]);

        session.collapse(1);
        assert_eq!(session.begin_expand(1), ExpandStep::Restored);
    }

    #[test]
    fn test_all_children_removed_is_not_expandable() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![2])]);
        let gone = CommentBuilder::new().id(2).parent(1).depth(1).dead().build();
        expand_with(&mut session, 1, vec![gone]);

        assert_eq!(session.visible_ids(), &[1]);
        assert!(!session.is_expanded(1));
        assert_eq!(session.replies(1), Replies::AllRemoved(1));
        assert_eq!(session.begin_expand(1), ExpandStep::Ignored);
    }

    #[test]
    fn test_failed_expand_task_can_be_retried() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![2, 3])]);
        let ExpandStep::Fetch(req) = session.begin_expand(1) else {
            panic!("expected fetch");
        };
        session.finish_expand(req.session, 1, Err("fetch task panicked".into()));

        assert_eq!(session.visible_ids(), &[1]);
        assert!(!session.is_expanded(1));
        assert!(!session.is_loading_children(1));
        assert!(matches!(session.error(), Some(SessionError::Transient(_))));

        let ExpandStep::Fetch(retry) = session.begin_expand(1) else {
            panic!("expected retry fetch");
        };
        assert_eq!(retry.ids, vec![2, 3]);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_expand_leaf_is_ignored() {
        let mut session = ready_session(vec![1], vec![parent(1, vec![])]);
        assert_eq!(session.begin_expand(1), ExpandStep::Ignored);
        assert_eq!(session.begin_expand(42), ExpandStep::Ignored);
        assert_eq!(session.replies(1), Replies::None);
    }

    #[test]
    fn test_order_preserved_across_expand_collapse() {
        let mut session = ready_session(
            vec![1, 2, 3],
            vec![parent(1, vec![10]), parent(2, vec![20]), parent(3, vec![])],
        );
        expand_with(&mut session, 2, vec![child(20, 2, 1)]);
        expand_with(&mut session, 1, vec![child(10, 1, 1)]);
        session.collapse(2);
        assert_eq!(session.visible_ids(), &[1, 10, 2, 3]);
    }
}
