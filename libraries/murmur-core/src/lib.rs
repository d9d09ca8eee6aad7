//! Murmur Core
//!
//! Platform-agnostic domain types, the storage seam, validation rules and error
//! handling for Murmur.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Comment`, `CommentId`
//! - **Core Traits**: `CommentStore`
//! - **Validation**: the comment form rule table and its descriptor
//! - **Error Handling**: Unified `MurmurError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use murmur_core::validation::{validate_comment_input, CommentInput};
//!
//! let text = validate_comment_input(&CommentInput::new("  hello  ")).unwrap();
//! assert_eq!(text, "hello");
//!
//! let errors = validate_comment_input(&CommentInput::default()).unwrap_err();
//! assert!(errors.contains_field("text"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{MurmurError, Result};
pub use storage::CommentStore;
pub use types::{Comment, CommentId};
pub use validation::{validate_comment_input, CommentInput, ValidationErrors};
