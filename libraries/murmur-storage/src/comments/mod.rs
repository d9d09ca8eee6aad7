//! Comment queries
//!
//! Every function is one SQL statement. Likes are incremented in place
//! (`likes = likes + 1`), never read-modified-written from Rust, so concurrent
//! likes on the same comment are all counted.

use chrono::{DateTime, Utc};
use murmur_core::{error::Result, Comment, CommentId, MurmurError};
use sqlx::SqlitePool;

/// Raw row as stored
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    text: String,
    created_at: i64,
    likes: i64,
}

impl TryFrom<CommentRow> for Comment {
    type Error = MurmurError;

    fn try_from(row: CommentRow) -> Result<Self> {
        let created_at = DateTime::from_timestamp_micros(row.created_at)
            .ok_or_else(|| MurmurError::storage("Invalid timestamp"))?;

        Ok(Comment {
            id: CommentId::new(row.id),
            text: row.text,
            created_at,
            likes: row.likes,
        })
    }
}

/// Microseconds since the epoch, rounded up
///
/// Rounding up keeps a stored timestamp from reading earlier than the moment
/// it was taken.
fn micros_rounded_up(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros() + i64::from(at.timestamp_subsec_nanos() % 1_000 != 0)
}

/// Insert a new comment with zero likes
///
/// `text` must already be validated; the table's CHECK constraint rejects
/// empty or overlong text as a storage error.
pub async fn create(pool: &SqlitePool, text: &str) -> Result<Comment> {
    let created_at = micros_rounded_up(Utc::now());

    let row = sqlx::query_as::<_, CommentRow>(
        "INSERT INTO comments (text, created_at, likes)
         VALUES (?, ?, 0)
         RETURNING id, text, created_at, likes",
    )
    .bind(text)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

/// Get all comments, newest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Comment>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT id, text, created_at, likes
         FROM comments
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Comment::try_from).collect()
}

/// Get a comment by ID
pub async fn get_by_id(pool: &SqlitePool, id: CommentId) -> Result<Option<Comment>> {
    let row = sqlx::query_as::<_, CommentRow>(
        "SELECT id, text, created_at, likes FROM comments WHERE id = ?",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    row.map(Comment::try_from).transpose()
}

/// Add one like and return the updated comment
pub async fn increment_like(pool: &SqlitePool, id: CommentId) -> Result<Comment> {
    let row = sqlx::query_as::<_, CommentRow>(
        "UPDATE comments SET likes = likes + 1
         WHERE id = ?
         RETURNING id, text, created_at, likes",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?
    .ok_or(MurmurError::CommentNotFound(id))?;

    row.try_into()
}

/// Count stored comments
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_round_up_partial_microseconds() {
        let exact = DateTime::from_timestamp(1_700_000_000, 5_000).unwrap();
        assert_eq!(micros_rounded_up(exact), 1_700_000_000_000_005);

        let partial = DateTime::from_timestamp(1_700_000_000, 5_001).unwrap();
        assert_eq!(micros_rounded_up(partial), 1_700_000_000_000_006);
        assert!(DateTime::from_timestamp_micros(micros_rounded_up(partial)).unwrap() >= partial);
    }
}
