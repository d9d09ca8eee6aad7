/// Health check API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use murmur_core::storage::CommentStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub comments: i64,
}

/// GET /api/health - Health check endpoint
///
/// Touches the database, so a broken store reports as a 500.
pub async fn health(State(app_state): State<AppState>) -> Result<Json<HealthResponse>> {
    let comments = app_state.db.count_comments().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        comments,
    }))
}
