mod client;
mod error;
mod types;

pub use client::HnClient;
pub use error::{ApiError, DropReason};
pub use types::{CommentRecord, Feed, Story};
