//! Tag API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

/// Test tags created through a session write show up in the vocabulary,
/// trimmed and sorted by name.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_tags_appear_in_vocabulary() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let payload = fixtures::session_today(&["rust", " math "]);
    server.post("/api/v1/sessions").json(&payload).await;

    let response = server.get("/api/v1/tags").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["math", "rust"]);

    ctx.cleanup_user(&ctx.user_id).await;
}

/// Test duplicate and blank names collapse; matching stays case-sensitive,
/// so "Math" and "math" remain distinct tags.
#[tokio::test]
#[ignore = "requires database"]
async fn test_tag_names_dedupe_case_sensitively() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let payload = fixtures::session_today(&["Math", " math ", "Math", "  "]);
    server.post("/api/v1/sessions").json(&payload).await;

    let response = server.get("/api/v1/tags").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Math", "math"]);

    ctx.cleanup_user(&ctx.user_id).await;
}

/// Test a second session with an existing tag reuses the row instead of
/// creating a duplicate.
#[tokio::test]
#[ignore = "requires database"]
async fn test_existing_tags_are_reused() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    server
        .post("/api/v1/sessions")
        .json(&fixtures::session_on(
            fixtures::date(2024, 5, 1),
            9,
            30,
            3,
            None,
            &["math"],
        ))
        .await;
    server
        .post("/api/v1/sessions")
        .json(&fixtures::session_on(
            fixtures::date(2024, 5, 2),
            9,
            30,
            3,
            None,
            &["math"],
        ))
        .await;

    let response = server.get("/api/v1/tags").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    ctx.cleanup_user(&ctx.user_id).await;
}
