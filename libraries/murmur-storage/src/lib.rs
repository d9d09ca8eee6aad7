//! Murmur Storage
//!
//! `SQLite` persistence for comments.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `comments` module owns its queries and row mapping
//! - **Atomic Statements**: each store operation is a single SQL statement, so
//!   the database's own transaction guarantees cover it
//! - **Embedded Migrations**: the schema ships inside the binary
//!
//! # Example
//!
//! ```rust,no_run
//! use murmur_storage::{LocalStorageContext, create_pool, run_migrations};
//! use murmur_core::storage::CommentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database connection
//! let pool = create_pool("sqlite://murmur.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let comment = storage.create_comment("first!").await?;
//! storage.increment_like(comment.id).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod comments;

pub use context::LocalStorageContext;
pub use error::StorageError;

// Type alias used by the server
pub type Database = LocalStorageContext;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date. Existing data is kept.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Drop every table and rebuild the schema from scratch
///
/// Ephemeral/demo mode only: all comments are discarded and ids restart at 1.
///
/// # Errors
///
/// Returns an error if a drop statement or the migrations fail
pub async fn reset_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    tracing::warn!("Resetting database schema, all comments will be discarded");

    let mut tx = pool.begin().await?;
    sqlx::query("DROP TABLE IF EXISTS comments")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    run_migrations(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://murmur.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true) // Create database file if it doesn't exist
        .journal_mode(SqliteJournalMode::Wal) // Use WAL mode for better concurrency
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
