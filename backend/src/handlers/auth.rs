// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::auth::LoginRequest,
    utils::{
        jwt::{ROLE_ADMIN, ROLE_PLAYER, sign_jwt},
        rand::generate_player_id,
    },
};

/// Player gate.
///
/// Compares the submitted password with the shared app password and, on match,
/// issues a bearer token carrying a fresh player id.
pub async fn login(
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.password != config.app_password {
        tracing::warn!("Rejected player login");
        return Err(AppError::AuthError("Access denied".to_string()));
    }

    let player_id = generate_player_id();
    let token = sign_jwt(&player_id, ROLE_PLAYER, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": ROLE_PLAYER
    })))
}

/// Admin gate for the comment view.
pub async fn admin_login(
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.password != config.admin_password {
        tracing::warn!("Rejected admin login");
        return Err(AppError::AuthError("Access denied".to_string()));
    }

    tracing::info!("Admin logged in");
    let token = sign_jwt(
        &generate_player_id(),
        ROLE_ADMIN,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": ROLE_ADMIN
    })))
}
