// src/handlers/leaderboard.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    config::{LEADERBOARD_DEFAULT_LIMIT, LEADERBOARD_MAX_LIMIT},
    error::AppError,
    models::leaderboard::{LeaderboardQuery, LeaderboardStats},
    services::leaderboard_store::LeaderboardStore,
};

/// Retrieves the best games: highest score first, fastest first on ties.
pub async fn get_leaderboard(
    State(leaderboard): State<LeaderboardStore>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params
        .limit
        .unwrap_or(LEADERBOARD_DEFAULT_LIMIT)
        .min(LEADERBOARD_MAX_LIMIT);

    let top = leaderboard.top_n(limit).await?;
    Ok(Json(top))
}

pub async fn get_stats(
    State(leaderboard): State<LeaderboardStore>,
) -> Result<impl IntoResponse, AppError> {
    let total_players = leaderboard.total_players().await?;
    Ok(Json(LeaderboardStats { total_players }))
}
