// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Default number of questions drawn for a Classic game.
pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MIN_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 30;

/// Allowed Time Attack durations, in seconds.
pub const TIME_ATTACK_LIMITS: [u64; 3] = [60, 120, 180];
pub const DEFAULT_TIME_LIMIT: u64 = 120;

/// Certificates at or above this percentage get the congratulatory line
/// instead of the review section.
pub const PASSING_SCORE_PERCENTAGE: u32 = 75;

/// Masked names keep this many characters followed by `NAME_MASK_SUFFIX`.
pub const NAME_MASK_PREFIX: usize = 5;
pub const NAME_MASK_SUFFIX: &str = "###";

pub const LEADERBOARD_DEFAULT_LIMIT: usize = 10;
pub const LEADERBOARD_MAX_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub app_password: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub question_bank_path: String,
    pub leaderboard_path: String,
    pub comments_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let app_password = env::var("APP_PASSWORD")
            .expect("APP_PASSWORD must be set");

        let admin_password = env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7200);

        let question_bank_path = env::var("QUESTION_BANK_PATH")
            .unwrap_or_else(|_| "aml_game_data.json".to_string());

        let leaderboard_path = env::var("LEADERBOARD_PATH")
            .unwrap_or_else(|_| "leaderboard.json".to_string());

        let comments_path = env::var("COMMENTS_PATH")
            .unwrap_or_else(|_| "comments.json".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            app_password,
            admin_password,
            jwt_secret,
            jwt_expiration,
            question_bank_path,
            leaderboard_path,
            comments_path,
            port,
            rust_log,
        }
    }
}
