use crate::comments;
use async_trait::async_trait;
use murmur_core::{error::Result, storage::CommentStore, Comment, CommentId};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CommentStore for LocalStorageContext {
    async fn create_comment(&self, text: &str) -> Result<Comment> {
        comments::create(&self.pool, text).await
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        comments::get_all(&self.pool).await
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        comments::get_by_id(&self.pool, id).await
    }

    async fn increment_like(&self, id: CommentId) -> Result<Comment> {
        comments::increment_like(&self.pool, id).await
    }

    async fn count_comments(&self) -> Result<i64> {
        comments::count(&self.pool).await
    }
}
