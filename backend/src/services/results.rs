// src/services/results.rs

use chrono::{DateTime, Utc};

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    models::{
        leaderboard::LeaderboardRecord,
        question::Question,
        session::{ResultsResponse, ReviewItem},
    },
    services::quiz_session::SessionState,
    utils::mask::mask_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    /// Whole seconds.
    pub duration: u64,
}

impl ScoreSummary {
    pub fn passed(&self) -> bool {
        self.percent >= PASSING_SCORE_PERCENTAGE
    }
}

/// Rounded percentage, half away from zero; 0 when nothing was answered.
pub fn percent(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 / total as f64 * 100.0).round() as u32
}

/// Score over the submitted answers only. Duration stops at completion.
pub fn summarize(session: &SessionState, now: DateTime<Utc>) -> ScoreSummary {
    let score = session.score();
    let total = session.answers.len();
    let end = session.finished_at.unwrap_or(now);

    ScoreSummary {
        score,
        total,
        percent: percent(score, total),
        duration: (end - session.start_time).num_seconds().max(0) as u64,
    }
}

/// Wrongly answered questions, in answer order.
pub fn incorrect_questions(session: &SessionState) -> Vec<&Question> {
    session
        .answers
        .iter()
        .zip(&session.questions)
        .filter(|(correct, _)| !**correct)
        .map(|(_, question)| question)
        .collect()
}

/// Distinct categories among `questions`, first occurrence first.
pub fn review_topics(questions: &[&Question]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for question in questions {
        if !topics.contains(&question.category) {
            topics.push(question.category.clone());
        }
    }
    topics
}

pub fn review_items(questions: &[&Question]) -> Vec<ReviewItem> {
    questions
        .iter()
        .map(|q| ReviewItem {
            question: q.question.clone(),
            correct_answer: q.correct_answer.clone(),
            explanation: q.explanation.clone(),
            category: q.category.clone(),
        })
        .collect()
}

/// Full results page for a completed session.
pub fn build_report(session: &SessionState, now: DateTime<Utc>) -> ResultsResponse {
    let summary = summarize(session, now);
    let incorrect = incorrect_questions(session);

    ResultsResponse {
        player_name: session.player_name.clone(),
        mode: session.mode,
        category: session.category.clone(),
        score: summary.score,
        total: summary.total,
        percent: summary.percent,
        duration: summary.duration,
        passed: summary.passed(),
        incorrect_questions: review_items(&incorrect),
        review_topics: review_topics(&incorrect),
        saved: session.is_saved(),
    }
}

/// Hands out the leaderboard record of a completed session exactly once.
///
/// A game that ended with no answers (Time Attack expiring on the first
/// question) has nothing to rank and never yields a record.
///
/// The session is flagged as saved before the write happens; callers must call
/// `release_leaderboard_write` if persisting the record fails.
pub fn claim_leaderboard_write(
    session: &mut SessionState,
    now: DateTime<Utc>,
) -> Option<LeaderboardRecord> {
    if !session.is_complete() || session.saved {
        return None;
    }
    let summary = summarize(session, now);
    if summary.total == 0 {
        return None;
    }
    session.saved = true;

    Some(LeaderboardRecord {
        name: mask_name(&session.player_name),
        mode: session.mode,
        category: session.category.clone(),
        score: summary.score as u32,
        total: summary.total as u32,
        percent: summary.percent,
        duration: summary.duration,
        timestamp: now.to_rfc3339(),
    })
}

/// Undoes a claim after a failed write, unless `session` is already a newer game.
pub fn release_leaderboard_write(session: &mut SessionState, game_id: u64) {
    if session.game_id == game_id {
        session.saved = false;
    }
}
