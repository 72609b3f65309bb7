// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, comments, leaderboard, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quiz, leaderboard, comments, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (config, question bank, session registry, stores).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new().route("/login", post(auth::login));

    // The whole game sits behind the shared app password.
    let quiz_routes = Router::new()
        .route("/categories", get(quiz::list_categories))
        .route("/start", post(quiz::start))
        .route("/session", get(quiz::current).delete(quiz::abandon))
        .route("/submit", post(quiz::submit_answer))
        .route("/next", post(quiz::next_question))
        .route("/results", post(quiz::record_results))
        .route("/certificate", get(quiz::certificate))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let leaderboard_routes = Router::new()
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .route("/api/leaderboard/stats", get(leaderboard::get_stats));

    let comment_routes = Router::new()
        .route("/api/comments", post(comments::create_comment))
        // Keeps the merged fallback (404) outside the auth check.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/login", post(auth::admin_login))
        .merge(
            Router::new()
                .route("/comments", get(admin::list_comments))
                // Double middleware protection: Auth first, then Admin check
                .layer(middleware::from_fn(admin_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        .merge(leaderboard_routes)
        .merge(comment_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
