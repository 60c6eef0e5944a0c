//! Incremental comment tree: lazy loading, flattened navigation and scroll
//! planning for one story at a time.

pub mod loader;
pub mod sequence;
pub mod session;
pub mod store;
pub mod viewport;

pub use loader::{BatchOutcome, ChildOutcome, fetch_children, fetch_parent_batch};
pub use session::{
    BatchRequest, ChildRequest, CommentSession, ExpandStep, Replies, SessionId,
};
pub use viewport::{Cursor, MoveResult, Viewport};
