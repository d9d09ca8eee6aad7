//! Core domain types for Murmur

mod comment;
mod ids;

pub use comment::Comment;
pub use ids::CommentId;
