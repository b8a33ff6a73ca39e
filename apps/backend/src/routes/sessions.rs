//! Study session endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::RequestUser;
use crate::AppState;
use studylog_core::session_minutes;

const DEFAULT_RECENT_LIMIT: i64 = 10;
const MAX_RECENT_LIMIT: i64 = 50;

/// POST /api/v1/sessions
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Json(payload): Json<SessionPayload>,
) -> Result<(StatusCode, Json<SessionDetail>)> {
    validate_focus(payload.focus_level)?;
    let duration_minutes = session_minutes(payload.start_time, payload.end_time)?;

    let (session, tags) = state
        .db
        .create_session(&user.user_id, &payload, duration_minutes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionDetail::from_db(session, tags)),
    ))
}

/// GET /api/v1/sessions/recent
pub async fn recent(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<RecentSessionsQuery>,
) -> Result<Json<SessionListResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_RECENT_LIMIT}"
        )));
    }

    let sessions = state.db.recent_sessions(&user.user_id, limit).await?;
    let items = sessions
        .into_iter()
        .map(|(session, tags)| SessionPublic::from_db(session, tags))
        .collect();

    Ok(Json(SessionListResponse { items }))
}

/// GET /api/v1/sessions/:session_id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionDetail>> {
    let (session, tags) = state
        .db
        .get_session(session_id, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    Ok(Json(SessionDetail::from_db(session, tags)))
}

/// PUT /api/v1/sessions/:session_id
///
/// Replaces every field; the payload's tag list is authoritative.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Path(session_id): Path<i64>,
    Json(payload): Json<SessionPayload>,
) -> Result<Json<SessionDetail>> {
    validate_focus(payload.focus_level)?;
    let duration_minutes = session_minutes(payload.start_time, payload.end_time)?;

    let (session, tags) = state
        .db
        .update_session(session_id, &user.user_id, &payload, duration_minutes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    Ok(Json(SessionDetail::from_db(session, tags)))
}

/// DELETE /api/v1/sessions/:session_id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Path(session_id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = state.db.delete_session(session_id, &user.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_focus(focus_level: i16) -> Result<()> {
    if !(1..=5).contains(&focus_level) {
        return Err(ApiError::BadRequest(
            "focus_level must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}
