// src/services/quiz_session.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};

use crate::{
    config::{
        DEFAULT_QUESTION_COUNT, DEFAULT_TIME_LIMIT, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
        TIME_ATTACK_LIMITS,
    },
    error::QuizError,
    models::{
        question::{Question, QuestionView},
        session::{GameMode, QuizPhase},
    },
};

/// Mode-specific setup for a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOptions {
    Classic { question_count: usize },
    TimeAttack { time_limit: u64 },
}

impl GameOptions {
    /// Builds options from the raw request fields, applying defaults and allowed ranges.
    pub fn from_request(
        mode: GameMode,
        question_count: Option<usize>,
        time_limit: Option<u64>,
    ) -> Result<Self, QuizError> {
        match mode {
            GameMode::Classic => {
                let question_count = question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
                if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&question_count) {
                    return Err(QuizError::Validation(format!(
                        "question count must be between {} and {}",
                        MIN_QUESTION_COUNT, MAX_QUESTION_COUNT
                    )));
                }
                Ok(GameOptions::Classic { question_count })
            }
            GameMode::TimeAttack => {
                let time_limit = time_limit.unwrap_or(DEFAULT_TIME_LIMIT);
                if !TIME_ATTACK_LIMITS.contains(&time_limit) {
                    return Err(QuizError::Validation(format!(
                        "time limit must be one of {:?} seconds",
                        TIME_ATTACK_LIMITS
                    )));
                }
                Ok(GameOptions::TimeAttack { time_limit })
            }
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            GameOptions::Classic { .. } => GameMode::Classic,
            GameOptions::TimeAttack { .. } => GameMode::TimeAttack,
        }
    }
}

/// Everything the player chose before the first question.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub player_name: String,
    pub category: String,
    pub options: GameOptions,
}

/// The in-progress quiz of one player.
///
/// Mutated only through the transition functions in `quiz_engine`; discarded on
/// "Play Again" or abandonment, never persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Random tag telling one game apart from the next game of the same player.
    pub(crate) game_id: u64,
    pub(crate) player_name: String,
    pub(crate) mode: GameMode,
    pub(crate) category: String,
    pub(crate) questions: Vec<Question>,
    pub(crate) current_index: usize,
    pub(crate) shuffled_options: HashMap<usize, Vec<String>>,
    pub(crate) answers: Vec<bool>,
    pub(crate) phase: QuizPhase,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) time_limit: Option<u64>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
    pub(crate) saved: bool,
}

/// Draws the session's questions from the category pool and starts the clock.
///
/// Classic draws `min(question_count, pool size)` distinct questions; Time Attack
/// takes the whole pool. Both come out in random order.
pub fn start_game<R: Rng + ?Sized>(
    setup: GameSetup,
    pool: &[Question],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<SessionState, QuizError> {
    let player_name = setup.player_name.trim().to_string();
    if player_name.is_empty() {
        return Err(QuizError::Validation("player name cannot be empty".to_string()));
    }

    let category = setup.category.trim().to_string();
    if pool.is_empty() {
        return Err(QuizError::EmptyPool(category));
    }

    let mut questions = pool.to_vec();
    questions.shuffle(rng);

    let time_limit = match setup.options {
        GameOptions::Classic { question_count } => {
            questions.truncate(question_count);
            None
        }
        GameOptions::TimeAttack { time_limit } => Some(time_limit),
    };

    tracing::info!(
        "Starting {} game in '{}' with {} questions",
        setup.options.mode(),
        category,
        questions.len()
    );

    Ok(SessionState {
        game_id: rng.r#gen(),
        player_name,
        mode: setup.options.mode(),
        category,
        questions,
        current_index: 0,
        shuffled_options: HashMap::new(),
        answers: Vec::new(),
        phase: QuizPhase::AwaitingAnswer(0),
        start_time: now,
        time_limit,
        finished_at: None,
        saved: false,
    })
}

impl SessionState {
    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn time_limit(&self) -> Option<u64> {
        self.time_limit
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::SessionComplete
    }

    /// Whether this game's leaderboard record has been written.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn score(&self) -> usize {
        self.answers.iter().filter(|&&correct| correct).count()
    }

    /// Seconds left on the Time Attack clock; `None` in Classic.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        let limit = self.time_limit?;
        if self.is_complete() {
            return Some(0);
        }
        let elapsed = (now - self.start_time).num_seconds().max(0) as u64;
        Some(limit.saturating_sub(elapsed))
    }

    /// Option order for the question at `index`, shuffled on first display and
    /// stable for every later display of the same question.
    pub fn displayed_options<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<&[String]> {
        let question = self.questions.get(index)?;
        let options = self.shuffled_options.entry(index).or_insert_with(|| {
            let mut options = question.options.clone();
            options.shuffle(rng);
            options
        });
        Some(options.as_slice())
    }

    /// The question awaiting an answer or showing feedback; `None` once complete.
    pub fn current_view<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<QuestionView> {
        let index = match self.phase {
            QuizPhase::AwaitingAnswer(i) | QuizPhase::FeedbackShown(i) => i,
            QuizPhase::SessionComplete => return None,
        };
        let total = self.questions.len();
        let options = self.displayed_options(index, rng)?.to_vec();
        let question = &self.questions[index];

        Some(QuestionView {
            index,
            number: index + 1,
            total,
            question: question.question.clone(),
            options,
            category: question.category.clone(),
        })
    }
}
