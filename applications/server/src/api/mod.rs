/// API route modules
pub mod comments;
pub mod health;
