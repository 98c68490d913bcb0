//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pustaka_server::{
    api,
    repository::{JsonFileStore, Repository},
    services::Services,
    AppConfig, AppState,
};

fn app_with(repository: Repository) -> Router {
    api::create_router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(repository)),
    })
}

fn app() -> Router {
    app_with(Repository::in_memory())
}

/// Send a request and return the status with the parsed JSON body (Null when empty)
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_list_and_delete_book() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Bumi Manusia", "author": "Pramoedya Ananta Toer"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["status"], "available");

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, Method::GET, "/books?q=PRAMOEDYA", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Bumi Manusia");

    let (status, _) = send(&app, Method::DELETE, "/books/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_create_book_with_empty_title_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "", "author": "Author"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Laskar Pelangi", "author": "Andrea Hirata"})),
    )
    .await;
    let (_, member) = send(
        &app,
        Method::POST,
        "/members",
        Some(json!({"name": "Siti", "email": "siti@example.org"})),
    )
    .await;
    let member_id = member["id"].as_i64().expect("No member ID");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "cancelled", "member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InvalidTransition");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "borrowed", "member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "borrowed");

    let (_, loan) = send(&app, Method::GET, "/books/1/loan", None).await;
    assert_eq!(loan["member_id"], member_id);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "returned", "member_id": member_id + 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotLoanOwner");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "returned", "member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    let (_, transitions) = send(&app, Method::GET, "/books/1/transitions", None).await;
    assert_eq!(transitions["allowed"], json!(["available"]));

    let (status, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(Vec::len), Some(2));
    assert_eq!(history[0]["status"], "borrowed");
    assert_eq!(history[0]["book_title"], "Laskar Pelangi");
    assert_eq!(history[1]["member_name"], "Siti");
}

#[tokio::test]
async fn test_member_update_and_validation() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/members",
        Some(json!({"name": "Budi", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/members/5",
        Some(json!({"name": "Budi", "email": "budi@example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        Method::POST,
        "/members",
        Some(json!({"name": "Budi", "email": "budi@example.org"})),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/members/1",
        Some(json!({"name": "Budi Santoso", "email": "budi@example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Budi Santoso");

    let (status, _) = send(&app, Method::DELETE, "/members/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send(&app, Method::GET, "/members", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_history_entry_bounds() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Saman", "author": "Ayu Utami"})),
    )
    .await;
    send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "borrowed", "member_id": 3})),
    )
    .await;

    for uri in ["/history/-1", "/history/1"] {
        let (status, body) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "IndexOutOfRange");
    }

    let (status, _) = send(&app, Method::DELETE, "/history/0", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_state_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let app = app_with(Repository::new(Arc::new(JsonFileStore::new(dir.path()))));
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Ca Bau Kan", "author": "Remy Sylado"})),
    )
    .await;
    send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "borrowed", "member_id": 2})),
    )
    .await;
    drop(app);

    assert!(dir.path().join("books.json").exists());
    assert!(dir.path().join("history.json").exists());

    let app = app_with(Repository::new(Arc::new(JsonFileStore::new(dir.path()))));
    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["status"], "borrowed");
    let (_, loan) = send(&app, Method::GET, "/books/1/loan", None).await;
    assert_eq!(loan["member_id"], 2);
}

#[tokio::test]
async fn test_unknown_status_value_is_a_bad_request() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Saman", "author": "Ayu Utami"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/1/status",
        Some(json!({"status": "lost", "member_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["code"], 18);
    assert!(body["message"].is_string());

    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["status"], "available");
}

#[tokio::test]
async fn test_malformed_input_gets_json_error_body() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/history/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(&app, Method::GET, "/books/first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(&app, Method::POST, "/members", Some(json!({"name": "Budi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}
