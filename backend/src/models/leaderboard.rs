// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};

use crate::models::session::GameMode;

/// One finished game, as persisted in the leaderboard file.
/// Created once per completed session and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    /// Masked player name.
    pub name: String,
    pub mode: GameMode,
    pub category: String,
    pub score: u32,
    pub total: u32,
    pub percent: u32,
    /// Seconds.
    pub duration: u64,
    /// RFC 3339.
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardStats {
    pub total_players: usize,
}
