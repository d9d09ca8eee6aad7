/// Comments API routes
use crate::{error::Result, forms::FormFields, state::AppState};
use axum::{extract::State, http::StatusCode, Extension, Json};
use murmur_core::{
    storage::CommentStore,
    types::{Comment, CommentId},
    validate_comment_input,
    validation::TEXT_FIELD,
    CommentInput,
};

/// GET /api/comments
pub async fn list_comments(State(app_state): State<AppState>) -> Result<Json<Vec<Comment>>> {
    let comments = app_state.db.list_comments().await?;
    Ok(Json(comments))
}

/// POST /api/comments
pub async fn create_comment(
    State(app_state): State<AppState>,
    fields: FormFields,
) -> Result<(StatusCode, Json<Comment>)> {
    let input = CommentInput {
        text: fields.get(TEXT_FIELD).map(str::to_owned),
    };
    let text = validate_comment_input(&input)?;

    let comment = app_state.db.create_comment(&text).await?;
    tracing::info!(comment_id = %comment.id, "Comment created");

    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /api/comments/:id/like
pub async fn like_comment(
    Extension(comment_id): Extension<CommentId>,
    State(app_state): State<AppState>,
) -> Result<Json<Comment>> {
    let comment = app_state.db.increment_like(comment_id).await?;
    tracing::debug!(comment_id = %comment.id, likes = comment.likes, "Comment liked");

    Ok(Json(comment))
}
