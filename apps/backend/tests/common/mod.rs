//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the test environment with a database
//! - Helper functions for creating isolated test users
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use studylog_backend::db::Database;
use studylog_backend::{build_router, AppState};

/// Test context containing database connection and test router.
///
/// Each context creates its own throwaway user, and the app's default user is
/// pointed at it, so requests work with or without the X-User-Id header.
pub struct TestContext {
    pub db: Arc<Database>,
    pub user_id: String,
    app: Router,
}

impl TestContext {
    /// Create a new test context with a fresh test user.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let user_id = format!("test-user-{}", Uuid::new_v4());
        db.create_user(
            &user_id,
            &format!("{}@example.com", user_id),
            "not-a-real-hash",
            None,
            Some("Test User"),
        )
        .await
        .expect("Failed to create test user");

        let state = AppState {
            db: db.clone(),
            default_user_id: user_id.clone(),
        };

        let app = build_router(state);

        Self { db, user_id, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create an additional isolated user and return its ID.
    pub async fn create_other_user(&self) -> String {
        let user_id = format!("test-user-{}", Uuid::new_v4());
        self.db
            .create_user(
                &user_id,
                &format!("{}@example.com", user_id),
                "not-a-real-hash",
                None,
                None,
            )
            .await
            .expect("Failed to create test user");
        user_id
    }

    /// Clean up all data belonging to a test user.
    ///
    /// Sessions, tags, junction rows and reports go with the user via the
    /// cascading foreign keys.
    pub async fn cleanup_user(&self, user_id: &str) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
