//! Auth API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use common::TestContext;

fn signup_body(user_id: &str) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "email": format!("{}@example.com", user_id),
        "password": "hunter2hunter2",
        "name": "Signup Test",
    })
}

/// Test signing up creates a user with zeroed streak fields.
#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_creates_user() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = format!("signup-{}", Uuid::new_v4());

    let response = server
        .post("/api/v1/auth/signup")
        .json(&signup_body(&user_id))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["longest_streak"], 0);

    ctx.cleanup_user(&user_id).await;
    ctx.cleanup_user(&ctx.user_id).await;
}

/// Test a taken user ID is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_rejects_taken_user_id() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = format!("signup-{}", Uuid::new_v4());

    server
        .post("/api/v1/auth/signup")
        .json(&signup_body(&user_id))
        .await;
    let response = server
        .post("/api/v1/auth/signup")
        .json(&signup_body(&user_id))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(&user_id).await;
    ctx.cleanup_user(&ctx.user_id).await;
}

/// Test a registered email cannot be reused under a different user ID.
#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_rejects_taken_email() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = format!("signup-{}", Uuid::new_v4());

    server
        .post("/api/v1/auth/signup")
        .json(&signup_body(&user_id))
        .await;

    let mut body = signup_body(&format!("signup-{}", Uuid::new_v4()));
    body["email"] = json!(format!("{}@example.com", user_id));
    let response = server.post("/api/v1/auth/signup").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(&user_id).await;
    ctx.cleanup_user(&ctx.user_id).await;
}

/// Test login succeeds with the signup password and fails otherwise.
#[tokio::test]
#[ignore = "requires database"]
async fn test_login_verifies_password() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let user_id = format!("signup-{}", Uuid::new_v4());

    server
        .post("/api/v1/auth/signup")
        .json(&signup_body(&user_id))
        .await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "user_id": user_id, "password": "hunter2hunter2" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user_id.as_str());

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "user_id": user_id, "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(&user_id).await;
    ctx.cleanup_user(&ctx.user_id).await;
}
