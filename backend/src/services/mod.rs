// src/services/mod.rs

pub mod certificate;
pub mod comment_store;
pub mod json_store;
pub mod leaderboard_store;
pub mod question_bank;
pub mod quiz_engine;
pub mod quiz_session;
pub mod results;
pub mod session_registry;
