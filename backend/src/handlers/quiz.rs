// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{MAX_QUESTION_COUNT, MIN_QUESTION_COUNT, TIME_ATTACK_LIMITS},
    error::{AppError, QuizError},
    models::session::{QuizPhase, SessionView, StartGameRequest, SubmitAnswerRequest},
    services::{
        certificate::{CertificateData, render_pdf},
        leaderboard_store::LeaderboardStore,
        question_bank::QuestionBank,
        quiz_engine::{self, SubmitOutcome},
        quiz_session::{GameOptions, GameSetup, SessionState, start_game},
        results,
        session_registry::SessionRegistry,
    },
    utils::jwt::Claims,
};

fn no_active_session() -> AppError {
    AppError::NotFound("No active quiz session. Start a game first.".to_string())
}

/// Snapshot of the session for the client. Enforces the Time Attack deadline first.
fn session_view<R: Rng + ?Sized>(
    session: &mut SessionState,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SessionView {
    quiz_engine::enforce_deadline(session, now);

    let feedback = match session.phase() {
        QuizPhase::FeedbackShown(i) => quiz_engine::feedback_for(session, i),
        _ => None,
    };

    SessionView {
        phase: session.phase(),
        mode: session.mode(),
        category: session.category().to_string(),
        player_name: session.player_name().to_string(),
        answered: session.answers().len(),
        score: session.score(),
        total_questions: session.questions().len(),
        remaining_seconds: session.remaining_seconds(now),
        question: session.current_view(rng),
        feedback,
    }
}

/// Lists categories with their question counts and the allowed game settings.
pub async fn list_categories(
    State(bank): State<Arc<QuestionBank>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "categories": bank.categories(),
        "modes": ["classic", "time_attack"],
        "question_count": { "min": MIN_QUESTION_COUNT, "max": MAX_QUESTION_COUNT },
        "time_limits": TIME_ATTACK_LIMITS,
    })))
}

/// Starts a new game for the caller, replacing any previous one.
///
/// * Classic: draws up to `question_count` questions from the category.
/// * Time Attack: the whole category against the chosen time limit.
pub async fn start(
    State(bank): State<Arc<QuestionBank>>,
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StartGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let options = GameOptions::from_request(payload.mode, payload.question_count, payload.time_limit)?;
    let pool = bank
        .pool(&payload.category)
        .ok_or_else(|| QuizError::EmptyPool(payload.category.trim().to_string()))?;

    let now = Utc::now();
    let mut rng = StdRng::from_entropy();
    let mut session = start_game(
        GameSetup {
            player_name: payload.name,
            category: payload.category,
            options,
        },
        pool,
        now,
        &mut rng,
    )?;

    let view = session_view(&mut session, now, &mut rng);
    sessions.replace(&claims.sub, session, now);

    Ok((StatusCode::CREATED, Json(view)))
}

/// Current state of the caller's game.
pub async fn current(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let mut rng = StdRng::from_entropy();
    let view = sessions
        .with_session(&claims.sub, now, |session| session_view(session, now, &mut rng))
        .ok_or_else(no_active_session)?;

    Ok(Json(view))
}

/// Submits an answer for the current question.
///
/// Repeated or stale submits are accepted without effect and return the
/// current state, so the client can safely resend.
pub async fn submit_answer(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let mut rng = StdRng::from_entropy();
    let (outcome, view) = sessions
        .with_session(&claims.sub, now, |session| {
            let outcome =
                quiz_engine::submit(session, payload.index, payload.answer.as_deref(), now);
            (outcome, session_view(session, now, &mut rng))
        })
        .ok_or_else(no_active_session)?;

    let status = match outcome {
        SubmitOutcome::Recorded(_) => "recorded",
        SubmitOutcome::AlreadyAnswered(_) => "already_answered",
        SubmitOutcome::NoSelection => "no_selection",
        SubmitOutcome::Stale => "stale",
        SubmitOutcome::TimeUp => "time_up",
        SubmitOutcome::Finished => "finished",
    };

    Ok(Json(json!({
        "status": status,
        "session": view,
    })))
}

/// Moves on to the next question (or to the results).
pub async fn next_question(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let mut rng = StdRng::from_entropy();
    let view = sessions
        .with_session(&claims.sub, now, |session| {
            quiz_engine::advance(session, now).map(|_| session_view(session, now, &mut rng))
        })
        .ok_or_else(no_active_session)??;

    Ok(Json(view))
}

/// Final results of a completed game.
///
/// The first call also writes the leaderboard record; later calls only report.
pub async fn record_results(
    State(sessions): State<SessionRegistry>,
    State(leaderboard): State<LeaderboardStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let (mut report, pending) = sessions
        .with_session(&claims.sub, now, |session| {
            quiz_engine::enforce_deadline(session, now);
            if !session.is_complete() {
                return Err(QuizError::InvalidTransition(
                    "results are available once the quiz is complete".to_string(),
                ));
            }
            let pending = results::claim_leaderboard_write(session, now)
                .map(|record| (session.game_id(), record));
            Ok((results::build_report(session, now), pending))
        })
        .ok_or_else(no_active_session)??;

    if let Some((game_id, record)) = pending {
        if let Err(e) = leaderboard.append(record).await {
            sessions.with_session(&claims.sub, Utc::now(), |session| {
                results::release_leaderboard_write(session, game_id)
            });
            return Err(e.into());
        }
        tracing::info!(
            "Recorded {} result {}/{} in '{}'",
            report.mode,
            report.score,
            report.total,
            report.category
        );
        report.saved = true;
    }

    Ok(Json(report))
}

/// Downloads the PDF certificate of a completed game.
pub async fn certificate(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let data = sessions
        .with_session(&claims.sub, now, |session| {
            quiz_engine::enforce_deadline(session, now);
            if !session.is_complete() {
                return Err(QuizError::InvalidTransition(
                    "the certificate is available once the quiz is complete".to_string(),
                ));
            }
            Ok(CertificateData::from_session(session, now))
        })
        .ok_or_else(no_active_session)??;

    let bytes = render_pdf(&data)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"aml_certificate.pdf\"",
            ),
        ],
        bytes,
    ))
}

/// Abandons the caller's game. Nothing is persisted.
pub async fn abandon(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    if !sessions.remove(&claims.sub, Utc::now()) {
        return Err(no_active_session());
    }
    Ok(StatusCode::NO_CONTENT)
}
