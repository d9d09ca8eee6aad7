//! Murmur Server Library
//!
//! Minimal commenting service: short text comments, a newest-first listing and
//! a like counter, guarded by CSRF tokens and per-client rate limits.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;
pub mod views;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{csrf::CsrfService, rate_limit::RateLimiter, session::SessionId};
pub use state::{AppState, RateLimits};
