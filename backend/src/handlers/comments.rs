use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentRecord, CreateCommentRequest},
    services::comment_store::CommentStore,
    utils::{html::sanitize_comment, mask::mask_name},
};

/// Leave a private comment. Only admins can read them back.
pub async fn create_comment(
    State(comments): State<CommentStore>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }
    let comment = sanitize_comment(&payload.comment)
        .ok_or_else(|| AppError::BadRequest("Comment cannot be empty".to_string()))?;

    comments
        .append(CommentRecord {
            name: mask_name(&payload.name),
            comment,
            timestamp: Utc::now().to_rfc3339(),
        })
        .await?;
    tracing::info!("Stored a new comment");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Thank you for your feedback!" })),
    ))
}
