//! Core error types for Murmur

use crate::types::CommentId;
use crate::validation::ValidationErrors;
use thiserror::Error;

/// Result type alias using `MurmurError`
pub type Result<T> = std::result::Result<T, MurmurError>;

/// Core error type for Murmur
#[derive(Error, Debug)]
pub enum MurmurError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Input rejected by the validation rules
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl MurmurError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<ValidationErrors> for MurmurError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for MurmurError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
