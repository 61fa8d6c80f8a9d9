//! API integration tests.
//!
//! These drive the full router against an in-memory `SQLite` database and a
//! temporary content directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use schoolboard_api::{AppState, router as api_router};
use schoolboard_common::LocalStorage;
use schoolboard_core::{
    AdminGate, MemeService, PollService, StudentService, UploadService, hash_passphrase,
};
use schoolboard_db::{
    repositories::{
        ChoiceRepository, MemeLikeRepository, MemeRepository, PollRepository, StudentRepository,
    },
    test_utils::TestDatabase,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSPHRASE: &str = "correct horse";
const BOUNDARY: &str = "schoolboard-test-boundary";

/// Create the test router backed by a fresh database and content directory.
async fn create_test_router() -> (Router, TempDir) {
    let db = Arc::new(TestDatabase::new().await.unwrap().into_connection());
    let dir = tempfile::tempdir().unwrap();

    let storage = LocalStorage::new(dir.path().to_path_buf(), "/static".to_string());
    let uploads = UploadService::new(Arc::new(storage), 1024 * 1024);

    let student_repo = StudentRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let choice_repo = ChoiceRepository::new(Arc::clone(&db));
    let meme_repo = MemeRepository::new(Arc::clone(&db));
    let like_repo = MemeLikeRepository::new(Arc::clone(&db));

    let state = AppState {
        student_service: StudentService::new(
            student_repo,
            poll_repo.clone(),
            choice_repo.clone(),
        ),
        poll_service: PollService::new(poll_repo, choice_repo, uploads.clone()),
        meme_service: MemeService::new(meme_repo, like_repo, uploads),
        admin_gate: AdminGate::new(&hash_passphrase(PASSPHRASE).unwrap()).unwrap(),
    };

    (api_router().with_state(state), dir)
}

/// Build a multipart body from `(field, file name, content)` parts.
fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn upload(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_register_and_login() {
    let (app, _dir) = create_test_router().await;

    let (status, body) = send(&app, post("/users/register?name=Ana&grade=10")).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["name"], "Ana");

    let (status, body) = send(&app, post("/users/login?name=Ana&grade=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_i64(), Some(id));

    let (status, body) = send(&app, post("/users/login?name=Ana&grade=9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(&app, get("/users/all_users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_rejects_grade_twelve() {
    let (app, _dir) = create_test_router().await;

    let (status, body) = send(&app, post("/users/register?name=Ana&grade=12")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_query_parameter_is_json_error() {
    let (app, _dir) = create_test_router().await;

    let (status, body) = send(&app, post("/users/register?name=Ana")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_admin_check() {
    let (app, _dir) = create_test_router().await;

    let (status, body) = send(&app, post("/admin/check?password=correct%20horse")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access"], true);

    let (status, body) = send(&app, post("/admin/check?password=wrong")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_destructive_routes_require_passphrase() {
    let (app, _dir) = create_test_router().await;

    send(&app, post("/users/register?name=Ana&grade=10")).await;

    let (status, _) = send(&app, post("/users/delete_users?id=1")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/users/delete_users?id=1")
        .method("POST")
        .header("X-Admin-Passphrase", "guess")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/users/delete_users?id=1")
        .method("POST")
        .header("X-Admin-Passphrase", PASSPHRASE)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, post("/vote/delete_votes?id=1")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/memes/delete/1")
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_poll_flow() {
    let (app, dir) = create_test_router().await;

    let parts: [(&str, &str, &[u8]); 3] = [
        ("photo1", "f1.jpg", b"one"),
        ("photo2", "f2.png", b"two"),
        ("photo3", "f3.jpg", b"three"),
    ];
    let (status, body) = send(&app, upload("/vote/add_votes?category=Sport", &parts)).await;
    assert_eq!(status, StatusCode::OK);
    let poll_id = body["vote_id"].as_i64().unwrap();
    let photos = body["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 3);
    let first = photos[0].as_str().unwrap();
    assert!(first.starts_with("/static/votes/Sport_photo1_"));
    assert!(dir.path().join(first.trim_start_matches("/static/")).exists());

    let (status, body) = send(&app, get("/vote/get_votes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["total_votes"], 0);
    assert_eq!(body[0]["results"]["1"], 0);

    let uri = format!("/vote/{poll_id}/vote?photo_choice=2&user_id=1");
    let (status, body) = send(&app, post(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["your_choice"], 2);

    let (status, body) = send(&app, post(&uri)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = send(&app, post(&format!("/vote/{poll_id}/vote?photo_choice=4&user_id=2"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post("/vote/999/vote?photo_choice=1&user_id=2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, get("/vote/get_votes")).await;
    assert_eq!(body[0]["results"]["2"], 1);
    assert_eq!(body[0]["total_votes"], 1);

    let request = Request::builder()
        .uri(format!("/vote/delete_votes?id={poll_id}"))
        .method("POST")
        .header("X-Admin-Passphrase", PASSPHRASE)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!dir.path().join(first.trim_start_matches("/static/")).exists());

    let (_, body) = send(&app, get("/vote/get_votes")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_poll_rejects_bad_photo() {
    let (app, dir) = create_test_router().await;

    let parts: [(&str, &str, &[u8]); 2] = [("photo1", "f1.jpg", b"one"), ("photo2", "f2.gif", b"two")];
    let (status, body) = send(&app, upload("/vote/add_votes?category=Sport", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("Photo 2"));
    assert!(!dir.path().join("votes").exists());

    let parts: [(&str, &str, &[u8]); 1] = [("photo1", "f1.jpg", b"one")];
    let (status, _) = send(&app, upload("/vote/add_votes?category=Sport", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlong_category_is_bad_request() {
    let (app, dir) = create_test_router().await;

    let parts: [(&str, &str, &[u8]); 2] = [("photo1", "f1.jpg", b"one"), ("photo2", "f2.jpg", b"two")];
    let uri = format!("/vote/add_votes?category={}", "a".repeat(300));
    let (status, body) = send(&app, upload(&uri, &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let parts: [(&str, &str, &[u8]); 1] = [("file", "meme.gif", b"GIF89a")];
    let uri = format!("/memes/add?category={}&description=x", "%3F".repeat(100));
    let (status, body) = send(&app, upload(&uri, &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    assert!(!dir.path().join("votes").exists());
    assert!(!dir.path().join("memes").exists());
}

#[tokio::test]
async fn test_non_ascii_category_urls_are_encoded() {
    let (app, dir) = create_test_router().await;

    // "Спорт"
    let parts: [(&str, &str, &[u8]); 2] = [("photo1", "f1.jpg", b"one"), ("photo2", "f2.jpg", b"two")];
    let (status, body) = send(
        &app,
        upload("/vote/add_votes?category=%D0%A1%D0%BF%D0%BE%D1%80%D1%82", &parts),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Спорт");

    let url = body["photos"][0].as_str().unwrap();
    assert!(url.starts_with("/static/votes/%D0%A1%D0%BF%D0%BE%D1%80%D1%82_photo1_"));
    let file_name = std::fs::read_dir(dir.path().join("votes"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .find(|name| name.contains("photo1"))
        .unwrap();
    assert!(file_name.starts_with("Спорт_photo1_"));
}

#[tokio::test]
async fn test_meme_flow() {
    let (app, dir) = create_test_router().await;

    let parts: [(&str, &str, &[u8]); 1] = [("file", "meme.gif", b"GIF89a")];
    let (status, body) = send(
        &app,
        upload("/memes/add?category=fun&description=lol&user_id=7", &parts),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let meme_id = body["meme_id"].as_i64().unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert_eq!(body["media_kind"], "animation");

    let (_, body) = send(&app, get("/memes/all")).await;
    assert_eq!(body[0]["category"], "fun");
    assert_eq!(body[0]["description"], "lol");
    assert_eq!(body[0]["author_id"], 7);
    assert_eq!(body[0]["likes"], 0);

    let like_uri = format!("/memes/{meme_id}/like?user_id=3");
    let (_, body) = send(&app, post(&like_uri)).await;
    assert_eq!(body["liked"], true);
    assert_eq!(body["likes"], 1);
    let (_, body) = send(&app, post(&like_uri)).await;
    assert_eq!(body["liked"], false);
    assert_eq!(body["likes"], 0);

    let request = Request::builder()
        .uri(format!("/memes/delete/{meme_id}"))
        .method("DELETE")
        .header("X-Admin-Passphrase", PASSPHRASE)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!dir.path().join(url.trim_start_matches("/static/")).exists());

    let (_, body) = send(&app, get("/memes/all")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, post(&like_uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_meme_rejects_unsupported_file() {
    let (app, _dir) = create_test_router().await;

    let parts: [(&str, &str, &[u8]); 1] = [("file", "notes.txt", b"hello")];
    let (status, body) = send(
        &app,
        upload("/memes/add?category=fun&description=x&user_id=1", &parts),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let (app, _dir) = create_test_router().await;

    let (status, _) = send(&app, get("/nonexistent/endpoint")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
