// src/models/mod.rs

pub mod auth;
pub mod comment;
pub mod leaderboard;
pub mod question;
pub mod session;
