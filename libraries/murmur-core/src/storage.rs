//! Storage trait for comments

use crate::error::Result;
use crate::types::{Comment, CommentId};
use async_trait::async_trait;

/// Storage context providing access to comment persistence
///
/// Every read and write of comment state goes through this trait; the
/// implementation relies on the database for atomicity of each call.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment with zero likes, stamped with the current UTC time
    ///
    /// `text` must already have passed validation.
    async fn create_comment(&self, text: &str) -> Result<Comment>;

    /// All comments, newest first (ties: later insertion first)
    async fn list_comments(&self) -> Result<Vec<Comment>>;

    /// Get comment by ID
    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Atomically add one like and return the updated comment
    ///
    /// Fails with `MurmurError::CommentNotFound` if no comment has this id.
    async fn increment_like(&self, id: CommentId) -> Result<Comment>;

    /// Number of stored comments
    async fn count_comments(&self) -> Result<i64>;
}
