/// Server services
pub mod csrf;
pub mod rate_limit;
pub mod session;

pub use csrf::CsrfService;
pub use rate_limit::RateLimiter;
pub use session::SessionId;
