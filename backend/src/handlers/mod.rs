// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod comments;
pub mod leaderboard;
pub mod quiz;
