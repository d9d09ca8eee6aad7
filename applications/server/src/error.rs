/// Server error types
use crate::services::csrf::CsrfError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use murmur_core::{MurmurError, ValidationErrors};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Rate limit exceeded: {limit}")]
    RateLimited { limit: String, retry_after_secs: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<MurmurError> for ServerError {
    fn from(err: MurmurError) -> Self {
        match err {
            MurmurError::CommentNotFound(id) => {
                ServerError::NotFound(format!("Comment not found: {}", id))
            }
            MurmurError::Validation(errors) => ServerError::Validation(errors),
            other => ServerError::Storage(other.to_string()),
        }
    }
}

impl From<murmur_storage::StorageError> for ServerError {
    fn from(err: murmur_storage::StorageError) -> Self {
        ServerError::Storage(err.to_string())
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        ServerError::Validation(errors)
    }
}

impl From<CsrfError> for ServerError {
    fn from(err: CsrfError) -> Self {
        ServerError::Forbidden(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Validation(errors) => {
                let body = Json(json!({ "errors": errors }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ServerError::RateLimited {
                limit,
                retry_after_secs,
            } => {
                let body = Json(json!({
                    "error": format!("Rate limit exceeded: {}", limit),
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Forbidden(msg) => {
                tracing::warn!("CSRF check failed: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            ServerError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::error!("JWT error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::CommentId;

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found: ServerError = MurmurError::CommentNotFound(CommentId::new(7)).into();
        assert!(matches!(&not_found, ServerError::NotFound(msg) if msg == "Comment not found: 7"));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let database: ServerError = MurmurError::Database("disk I/O error".into()).into();
        assert!(matches!(database, ServerError::Storage(_)));
        assert_eq!(
            database.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ServerError::RateLimited {
            limit: "5 per 1 minute".to_string(),
            retry_after_secs: 12,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "12");
    }

    #[test]
    fn test_config_error_is_internal() {
        let response = ServerError::Config("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
