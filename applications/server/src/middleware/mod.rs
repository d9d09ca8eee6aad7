/// Request middleware
pub mod comment_id;
pub mod csrf;
pub mod rate_limit;

pub use comment_id::comment_id_middleware;
pub use csrf::csrf_middleware;
pub use rate_limit::rate_limit_middleware;
