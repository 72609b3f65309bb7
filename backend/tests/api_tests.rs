// tests/api_tests.rs

use aml_mastermind::{
    config::Config, routes, services::question_bank::QuestionBank, state::AppState,
};
use serde_json::{Value, json};
use std::path::PathBuf;

const APP_PASSWORD: &str = "iloveaml2025";
const ADMIN_PASSWORD: &str = "admin-secret";

struct TestApp {
    address: String,
    leaderboard_path: PathBuf,
    comments_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.leaderboard_path);
        let _ = std::fs::remove_dir(&self.leaderboard_path);
        let _ = std::fs::remove_file(&self.comments_path);
    }
}

/// Five "Crypto" questions (correct answer is always "A") and one uncategorized.
fn bank() -> QuestionBank {
    let mut records = Vec::new();
    for i in 0..5 {
        records.push(json!({
            "question": format!("Crypto question {}", i),
            "options": ["A", "B", "C", "D"],
            "correct_answer": "A",
            "explanation": format!("Explanation {}", i),
            "source": "FATF",
            "category": "Crypto"
        }));
    }
    records.push(json!({
        "question": "Uncategorized question",
        "options": ["A", "B"],
        "correct_answer": "A"
    }));

    let raw = serde_json::to_string(&records).unwrap();
    QuestionBank::from_questions(
        aml_mastermind::services::question_bank::parse_questions(&raw).unwrap(),
    )
}

/// Helper function to spawn the app on a random port for testing.
async fn spawn_app() -> TestApp {
    let unique = uuid::Uuid::new_v4();
    let leaderboard_path = std::env::temp_dir().join(format!("leaderboard-{}.json", unique));
    let comments_path = std::env::temp_dir().join(format!("comments-{}.json", unique));

    let config = Config {
        app_password: APP_PASSWORD.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        question_bank_path: "unused.json".to_string(),
        leaderboard_path: leaderboard_path.to_string_lossy().into_owned(),
        comments_path: comments_path.to_string_lossy().into_owned(),
        port: 0,
        rust_log: "error".to_string(),
    };

    let app = routes::create_router(AppState::new(config, bank()));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        leaderboard_path,
        comments_path,
    }
}

async fn login(client: &reqwest::Client, address: &str, path: &str, password: &str) -> String {
    let resp: Value = client
        .post(format!("{}{}", address, path))
        .json(&json!({ "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    resp["token"].as_str().expect("Token not found").to_string()
}

async fn post(client: &reqwest::Client, url: String, token: &str, body: Value) -> reqwest::Response {
    client
        .post(url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

/// Plays a full Classic game in "Crypto", answering the first question wrong
/// and the rest right.
async fn play_classic(client: &reqwest::Client, address: &str, token: &str, name: &str) {
    let start = post(
        client,
        format!("{}/api/quiz/start", address),
        token,
        json!({ "name": name, "mode": "classic", "category": "Crypto", "question_count": 10 }),
    )
    .await;
    assert_eq!(start.status().as_u16(), 201);
    let view: Value = start.json().await.unwrap();
    assert_eq!(view["total_questions"], 5);

    for i in 0..5 {
        let answer = if i == 0 { "B" } else { "a " };
        let resp = post(
            client,
            format!("{}/api/quiz/submit", address),
            token,
            json!({ "index": i, "answer": answer }),
        )
        .await;
        assert_eq!(resp.status().as_u16(), 200);

        let next = post(client, format!("{}/api/quiz/next", address), token, json!({})).await;
        assert_eq!(next.status().as_u16(), 200);
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn wrong_password_is_denied() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "password": "guess" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(format!("{}/api/quiz/categories", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn categories_are_listed_after_login() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    let body: Value = client
        .get(format!("{}/api/quiz/categories", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], "Crypto");
    assert_eq!(categories[0]["question_count"], 5);
    assert_eq!(categories[1]["name"], "Other");
}

#[tokio::test]
async fn start_rejects_empty_pool_and_blank_name() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;
    let url = format!("{}/api/quiz/start", app.address);

    let resp = post(
        &client,
        url.clone(),
        &token,
        json!({ "name": "Alice", "mode": "classic", "category": "Sanctions" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = post(
        &client,
        url,
        &token,
        json!({ "name": "   ", "mode": "classic", "category": "Crypto" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_submit_and_early_next_do_not_change_answers() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    post(
        &client,
        format!("{}/api/quiz/start", app.address),
        &token,
        json!({ "name": "Alice", "mode": "classic", "category": "Crypto", "question_count": 5 }),
    )
    .await;

    // Next before answering is rejected.
    let early = post(&client, format!("{}/api/quiz/next", app.address), &token, json!({})).await;
    assert_eq!(early.status().as_u16(), 409);

    // Empty selection keeps waiting.
    let empty: Value = post(
        &client,
        format!("{}/api/quiz/submit", app.address),
        &token,
        json!({ "index": 0, "answer": "" }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(empty["status"], "no_selection");
    assert_eq!(empty["session"]["phase"]["state"], "awaiting_answer");

    let first: Value = post(
        &client,
        format!("{}/api/quiz/submit", app.address),
        &token,
        json!({ "index": 0, "answer": "A" }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(first["status"], "recorded");
    assert_eq!(first["session"]["feedback"]["correct"], true);
    assert_eq!(first["session"]["feedback"]["source"], "FATF");

    let again: Value = post(
        &client,
        format!("{}/api/quiz/submit", app.address),
        &token,
        json!({ "index": 0, "answer": "B" }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(again["status"], "already_answered");
    assert_eq!(again["session"]["answered"], 1);
    assert_eq!(again["session"]["score"], 1);
}

#[tokio::test]
async fn displayed_options_are_stable_across_reads() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    let started: Value = post(
        &client,
        format!("{}/api/quiz/start", app.address),
        &token,
        json!({ "name": "Alice", "mode": "time_attack", "category": "Crypto", "time_limit": 60 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(started["remaining_seconds"].as_u64().map(|s| s <= 60), Some(true));

    let options = started["question"]["options"].clone();
    for _ in 0..3 {
        let view: Value = client
            .get(format!("{}/api/quiz/session", app.address))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["question"]["options"], options);
    }
}

#[tokio::test]
async fn results_are_recorded_once_and_ranked() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    play_classic(&client, &app.address, &token, "Jonathan").await;

    for _ in 0..3 {
        let report: Value = post(&client, format!("{}/api/quiz/results", app.address), &token, json!({}))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(report["score"], 4);
        assert_eq!(report["total"], 5);
        assert_eq!(report["percent"], 80);
        assert_eq!(report["passed"], true);
        assert_eq!(report["saved"], true);
        assert_eq!(report["incorrect_questions"].as_array().unwrap().len(), 1);
        assert_eq!(report["review_topics"], json!(["Crypto"]));
    }

    let stats: Value = client
        .get(format!("{}/api/leaderboard/stats", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_players"], 1);

    let top: Value = client
        .get(format!("{}/api/leaderboard?limit=5", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["name"], "Jonat###");
    assert_eq!(top[0]["mode"], "classic");
    assert_eq!(top[0]["score"], 4);
}

#[tokio::test]
async fn failed_leaderboard_write_can_be_retried_once() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    // A directory where the leaderboard file should be makes every write fail.
    std::fs::create_dir(&app.leaderboard_path).unwrap();

    play_classic(&client, &app.address, &token, "Jonathan").await;

    let failed = post(&client, format!("{}/api/quiz/results", app.address), &token, json!({})).await;
    assert_eq!(failed.status().as_u16(), 500);
    let body: Value = failed.json().await.unwrap();
    assert!(body["error"].is_string());

    std::fs::remove_dir(&app.leaderboard_path).unwrap();

    for _ in 0..2 {
        let report: Value = post(&client, format!("{}/api/quiz/results", app.address), &token, json!({}))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(report["saved"], true);
        assert_eq!(report["score"], 4);
    }

    let stats: Value = client
        .get(format!("{}/api/leaderboard/stats", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_players"], 1);
}

#[tokio::test]
async fn results_require_a_finished_game() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    let none = post(&client, format!("{}/api/quiz/results", app.address), &token, json!({})).await;
    assert_eq!(none.status().as_u16(), 404);

    post(
        &client,
        format!("{}/api/quiz/start", app.address),
        &token,
        json!({ "name": "Alice", "mode": "classic", "category": "Crypto" }),
    )
    .await;

    let early = post(&client, format!("{}/api/quiz/results", app.address), &token, json!({})).await;
    assert_eq!(early.status().as_u16(), 409);

    let cert = client
        .get(format!("{}/api/quiz/certificate", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(cert.status().as_u16(), 409);

    let abandon = client
        .delete(format!("{}/api/quiz/session", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(abandon.status().as_u16(), 204);

    let gone = client
        .get(format!("{}/api/quiz/session", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn certificate_is_a_pdf() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    play_classic(&client, &app.address, &token, "Alice").await;

    let response = client
        .get(format!("{}/api/quiz/certificate", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn comments_are_admin_only() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let player = login(&client, &app.address, "/api/auth/login", APP_PASSWORD).await;

    let created = post(
        &client,
        format!("{}/api/comments", app.address),
        &player,
        json!({ "name": "Margaret", "comment": "  Great questions!<script>x()</script> " }),
    )
    .await;
    assert_eq!(created.status().as_u16(), 201);

    let blank = post(
        &client,
        format!("{}/api/comments", app.address),
        &player,
        json!({ "name": "Margaret", "comment": "    " }),
    )
    .await;
    assert_eq!(blank.status().as_u16(), 400);

    // Player token is not enough.
    let forbidden = client
        .get(format!("{}/api/admin/comments", app.address))
        .bearer_auth(&player)
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    let denied = client
        .post(format!("{}/api/admin/login", app.address))
        .json(&json!({ "password": APP_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status().as_u16(), 401);

    let admin = login(&client, &app.address, "/api/admin/login", ADMIN_PASSWORD).await;
    let comments: Value = client
        .get(format!("{}/api/admin/comments", app.address))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["name"], "Marga###");
    assert_eq!(comments[0]["comment"], "Great questions!");
}
