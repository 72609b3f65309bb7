// src/services/quiz_engine.rs
//
// Transitions of the quiz state machine:
//
//   AwaitingAnswer(i) --submit--> FeedbackShown(i) --advance--> AwaitingAnswer(i+1) | SessionComplete
//
// Time Attack sessions are additionally forced to SessionComplete once the clock
// runs out. The deadline is checked lazily on every transition and view.

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::QuizError,
    models::session::{Feedback, QuizPhase},
    services::quiz_session::SessionState,
};

/// Result of a `submit` call. Only `Recorded` mutates the answers.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Recorded(Feedback),
    /// The question already has an answer; its feedback is returned again.
    AlreadyAnswered(Feedback),
    /// No option selected; still awaiting an answer.
    NoSelection,
    /// The request targets a question other than the current one.
    Stale,
    /// The Time Attack clock ran out before this submit; nothing was recorded.
    TimeUp,
    /// Session was already complete.
    Finished,
}

/// Ends a Time Attack session whose limit has elapsed.
///
/// The in-flight question (shown but not submitted) is discarded and does not
/// count toward the total. Returns `true` only when this call ended the session.
pub fn enforce_deadline(session: &mut SessionState, now: DateTime<Utc>) -> bool {
    if session.is_complete() {
        return false;
    }
    let Some(limit) = session.time_limit else {
        return false;
    };

    let deadline = session.start_time + Duration::seconds(limit as i64);
    if now < deadline {
        return false;
    }

    session.current_index = session.answers.len();
    session.phase = QuizPhase::SessionComplete;
    session.finished_at = Some(deadline);
    tracing::info!(
        "Time Attack expired after {}s with {} answered",
        limit,
        session.answers.len()
    );
    true
}

/// Records the player's answer for the current question.
///
/// Duplicate submits (same question, already answered) are no-ops that return the
/// existing feedback, so a re-fired request cannot append a second answer.
pub fn submit(
    session: &mut SessionState,
    index: Option<usize>,
    selected: Option<&str>,
    now: DateTime<Utc>,
) -> SubmitOutcome {
    if enforce_deadline(session, now) {
        return SubmitOutcome::TimeUp;
    }

    match session.phase {
        QuizPhase::SessionComplete => SubmitOutcome::Finished,
        QuizPhase::FeedbackShown(current) => {
            if index.is_some_and(|i| i != current) {
                return SubmitOutcome::Stale;
            }
            match feedback_for(session, current) {
                Some(feedback) => SubmitOutcome::AlreadyAnswered(feedback),
                None => SubmitOutcome::Stale,
            }
        }
        QuizPhase::AwaitingAnswer(current) => {
            if index.is_some_and(|i| i != current) {
                return SubmitOutcome::Stale;
            }
            let selected = match selected.map(str::trim) {
                Some(s) if !s.is_empty() => s,
                _ => return SubmitOutcome::NoSelection,
            };

            let correct = session.questions[current].is_correct(selected);
            session.answers.push(correct);
            session.phase = QuizPhase::FeedbackShown(current);

            match feedback_for(session, current) {
                Some(feedback) => SubmitOutcome::Recorded(feedback),
                None => SubmitOutcome::Stale,
            }
        }
    }
}

/// Moves past the feedback of the current question.
///
/// Calling it while an answer is still awaited is rejected so that a doubled
/// "next" cannot skip a question. On a complete session it is a no-op.
pub fn advance(session: &mut SessionState, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
    if enforce_deadline(session, now) {
        return Ok(session.phase);
    }

    match session.phase {
        QuizPhase::FeedbackShown(current) => {
            let next = current + 1;
            session.current_index = next;
            if next >= session.questions.len() {
                session.phase = QuizPhase::SessionComplete;
                session.finished_at = Some(now);
            } else {
                session.phase = QuizPhase::AwaitingAnswer(next);
            }
            Ok(session.phase)
        }
        QuizPhase::AwaitingAnswer(current) => Err(QuizError::InvalidTransition(format!(
            "question {} has not been answered yet",
            current + 1
        ))),
        QuizPhase::SessionComplete => Ok(QuizPhase::SessionComplete),
    }
}

/// Feedback for an answered question; `None` if `index` has no answer yet.
pub fn feedback_for(session: &SessionState, index: usize) -> Option<Feedback> {
    let correct = *session.answers.get(index)?;
    let question = session.questions.get(index)?;
    Some(Feedback {
        index,
        correct,
        correct_answer: question.correct_answer.clone(),
        explanation: question.explanation.clone(),
        source: question.source.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_session::{
        GameOptions, start_game,
        tests::{pool, setup},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn classic(count: usize) -> (SessionState, DateTime<Utc>) {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        let session = start_game(
            setup(GameOptions::Classic { question_count: count }),
            &pool(count, "Crypto"),
            now,
            &mut rng,
        )
        .unwrap();
        (session, now)
    }

    fn time_attack(pool_size: usize, limit: u64) -> (SessionState, DateTime<Utc>) {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        let session = start_game(
            setup(GameOptions::TimeAttack { time_limit: limit }),
            &pool(pool_size, "Crypto"),
            now,
            &mut rng,
        )
        .unwrap();
        (session, now)
    }

    fn correct_answer(session: &SessionState, index: usize) -> String {
        session.questions()[index].correct_answer.clone()
    }

    #[test]
    fn submit_records_answer_and_shows_feedback() {
        let (mut session, now) = classic(5);
        let answer = correct_answer(&session, 0);

        let outcome = submit(&mut session, Some(0), Some(&answer.to_uppercase()), now);

        assert!(matches!(outcome, SubmitOutcome::Recorded(ref f) if f.correct && f.index == 0));
        assert_eq!(session.answers(), &[true]);
        assert_eq!(session.phase(), QuizPhase::FeedbackShown(0));
    }

    #[test]
    fn duplicate_submit_does_not_append() {
        let (mut session, now) = classic(5);

        submit(&mut session, None, Some("Wrong 1"), now);
        let again = submit(&mut session, None, Some("Wrong 1"), now);
        let with_index = submit(&mut session, Some(0), Some("Wrong 2"), now);

        assert!(matches!(again, SubmitOutcome::AlreadyAnswered(ref f) if !f.correct));
        assert!(matches!(with_index, SubmitOutcome::AlreadyAnswered(_)));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let (mut session, now) = classic(5);

        assert_eq!(submit(&mut session, Some(0), Some(""), now), SubmitOutcome::NoSelection);
        assert_eq!(submit(&mut session, Some(0), Some("   "), now), SubmitOutcome::NoSelection);
        assert_eq!(submit(&mut session, Some(0), None, now), SubmitOutcome::NoSelection);
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer(0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn stale_index_is_ignored() {
        let (mut session, now) = classic(5);

        assert_eq!(submit(&mut session, Some(3), Some("Wrong 1"), now), SubmitOutcome::Stale);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn advance_requires_feedback_first() {
        let (mut session, now) = classic(5);

        let err = advance(&mut session, now).unwrap_err();
        assert!(matches!(err, QuizError::InvalidTransition(_)));
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer(0));
    }

    #[test]
    fn classic_session_completes_with_every_question_answered() {
        let (mut session, now) = classic(5);

        for i in 0..5 {
            assert_eq!(session.phase(), QuizPhase::AwaitingAnswer(i));
            let answer = correct_answer(&session, i);
            submit(&mut session, Some(i), Some(&answer), now);
            assert!(session.answers().len() <= session.questions().len());
            advance(&mut session, now).unwrap();
            assert_eq!(session.answers().len(), session.current_index());
        }

        assert_eq!(session.phase(), QuizPhase::SessionComplete);
        assert_eq!(session.answers().len(), session.questions().len());
        assert_eq!(session.score(), 5);

        // Terminal: nothing changes anymore.
        assert_eq!(submit(&mut session, None, Some("x"), now), SubmitOutcome::Finished);
        assert_eq!(advance(&mut session, now).unwrap(), QuizPhase::SessionComplete);
        assert_eq!(session.answers().len(), 5);
    }

    #[test]
    fn time_attack_expiry_discards_in_flight_question() {
        let (mut session, start) = time_attack(10, 60);

        for i in 0..3 {
            let t = start + Duration::seconds(10 * (i as i64 + 1));
            submit(&mut session, Some(i), Some("Wrong 1"), t);
            advance(&mut session, t).unwrap();
        }
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer(3));

        let late = start + Duration::seconds(61);
        let outcome = submit(&mut session, Some(3), Some("Wrong 1"), late);

        assert_eq!(outcome, SubmitOutcome::TimeUp);
        assert_eq!(session.phase(), QuizPhase::SessionComplete);
        assert_eq!(session.answers().len(), 3);
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn time_attack_expiry_keeps_answer_already_submitted() {
        let (mut session, start) = time_attack(10, 60);

        submit(&mut session, Some(0), Some("Wrong 1"), start + Duration::seconds(30));
        let phase = advance(&mut session, start + Duration::seconds(60)).unwrap();

        assert_eq!(phase, QuizPhase::SessionComplete);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn enforce_deadline_is_lazy_and_ignores_classic() {
        let (mut ta, start) = time_attack(10, 60);
        assert!(!enforce_deadline(&mut ta, start + Duration::seconds(59)));
        assert!(enforce_deadline(&mut ta, start + Duration::seconds(60)));
        assert!(!enforce_deadline(&mut ta, start + Duration::seconds(90)));

        let (mut classic, start) = classic(5);
        assert!(!enforce_deadline(&mut classic, start + Duration::days(1)));
    }

    #[test]
    fn time_attack_ends_when_pool_is_exhausted() {
        let (mut session, start) = time_attack(2, 120);
        for i in 0..2 {
            submit(&mut session, Some(i), Some("Wrong 1"), start);
            advance(&mut session, start).unwrap();
        }
        assert_eq!(session.phase(), QuizPhase::SessionComplete);
        assert_eq!(session.answers().len(), 2);
    }
}
