// src/models/session.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::QuestionView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Fixed question count, no time pressure.
    Classic,
    /// Whole category pool against a wall-clock limit.
    TimeAttack,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Classic => write!(f, "Classic"),
            GameMode::TimeAttack => write!(f, "Time Attack"),
        }
    }
}

/// Quiz state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum QuizPhase {
    AwaitingAnswer(usize),
    FeedbackShown(usize),
    SessionComplete,
}

/// DTO for starting a game.
#[derive(Debug, Deserialize, Validate)]
pub struct StartGameRequest {
    #[validate(custom(function = validate_player_name))]
    pub name: String,
    pub mode: GameMode,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// Classic only.
    #[validate(range(
        min = 5,
        max = 30,
        message = "Question count must be between 5 and 30"
    ))]
    pub question_count: Option<usize>,
    /// Time Attack only, in seconds.
    pub time_limit: Option<u64>,
}

fn validate_player_name(name: &str) -> Result<(), validator::ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(validator::ValidationError::new("name_cannot_be_empty"));
    }
    if trimmed.chars().count() > 50 {
        return Err(validator::ValidationError::new("name_too_long"));
    }
    Ok(())
}

/// DTO for answering the current question.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Index of the question being answered; a mismatch marks the request as stale.
    pub index: Option<usize>,
    pub answer: Option<String>,
}

/// What the player sees after submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub index: usize,
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub source: String,
}

/// Snapshot of the player's session returned by every quiz endpoint.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub phase: QuizPhase,
    pub mode: GameMode,
    pub category: String,
    pub player_name: String,
    pub answered: usize,
    pub score: usize,
    pub total_questions: usize,
    pub remaining_seconds: Option<u64>,
    pub question: Option<QuestionView>,
    pub feedback: Option<Feedback>,
}

/// One incorrectly answered question, as shown on the results page and certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub question: String,
    pub correct_answer: String,
    pub explanation: String,
    pub category: String,
}

/// DTO for the results page.
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub player_name: String,
    pub mode: GameMode,
    pub category: String,
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub duration: u64,
    pub passed: bool,
    pub incorrect_questions: Vec<ReviewItem>,
    pub review_topics: Vec<String>,
    /// Whether this game is on the leaderboard.
    pub saved: bool,
}
