/// Comment id path parameter
use crate::error::ServerError;
use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use murmur_core::types::CommentId;

/// Resolve `:id` to a [`CommentId`] before anything else runs on the route
///
/// Ids that are not integers name no comment, so they get a 404 without
/// touching the rate limit or the CSRF check. The parsed id travels to the
/// handler as a request extension.
pub async fn comment_id_middleware(
    Path(id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let comment_id = id
        .parse::<i64>()
        .map(CommentId::new)
        .map_err(|_| ServerError::NotFound(format!("Comment not found: {}", id)))?;

    request.extensions_mut().insert(comment_id);
    Ok(next.run(request).await)
}
