//! Health endpoint

use axum::{extract::State, Json};
use chrono::Utc;

use crate::models::HealthResponse;
use crate::AppState;

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.db.pool())
        .await
    {
        Ok(_) => "ok",
        Err(_) => "error",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        db: db.to_string(),
        time: Utc::now(),
    })
}
