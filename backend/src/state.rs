use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    comment_store::CommentStore, leaderboard_store::LeaderboardStore,
    question_bank::QuestionBank, session_registry::SessionRegistry,
};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub bank: Arc<QuestionBank>,
    pub sessions: SessionRegistry,
    pub leaderboard: LeaderboardStore,
    pub comments: CommentStore,
}

impl AppState {
    /// Wires the stores to the paths named in `config`.
    pub fn new(config: Config, bank: QuestionBank) -> Self {
        Self {
            leaderboard: LeaderboardStore::new(&config.leaderboard_path),
            comments: CommentStore::new(&config.comments_path),
            bank: Arc::new(bank),
            sessions: SessionRegistry::new(config.jwt_expiration),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.bank.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for LeaderboardStore {
    fn from_ref(state: &AppState) -> Self {
        state.leaderboard.clone()
    }
}

impl FromRef<AppState> for CommentStore {
    fn from_ref(state: &AppState) -> Self {
        state.comments.clone()
    }
}
