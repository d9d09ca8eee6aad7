/// Shared application state
use crate::config::RateLimitSettings;
use crate::services::{CsrfService, RateLimiter};
use murmur_storage::Database;
use std::sync::Arc;

/// Per-endpoint rate limiters
#[derive(Clone)]
pub struct RateLimits {
    pub submit: Arc<RateLimiter>,
    pub like: Arc<RateLimiter>,
}

impl RateLimits {
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        if !settings.enabled {
            return Self {
                submit: Arc::new(RateLimiter::disabled("submit")),
                like: Arc::new(RateLimiter::disabled("like")),
            };
        }

        Self {
            submit: Arc::new(RateLimiter::per_minute("submit", settings.submit_per_minute)),
            like: Arc::new(RateLimiter::per_minute("like", settings.like_per_minute)),
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub csrf: Arc<CsrfService>,
    pub limits: RateLimits,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        csrf: Arc<CsrfService>,
        limits: RateLimits,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            db,
            csrf,
            limits,
            max_body_bytes,
        }
    }
}
