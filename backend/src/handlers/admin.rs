// src/handlers/admin.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, services::comment_store::CommentStore};

/// Lists every stored comment in insertion order.
/// Admin only.
pub async fn list_comments(
    State(comments): State<CommentStore>,
) -> Result<impl IntoResponse, AppError> {
    let all = comments.all().await?;
    Ok(Json(all))
}
