//! Dashboard endpoints
//!
//! Aggregates are recomputed from stored sessions on every call; nothing is
//! cached between requests.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::RequestUser;
use crate::AppState;
use studylog_core::{daily_series, heatmap as heatmap_cells, rank_tags, today_summary, DateRange};

const DEFAULT_TOP_TAGS_LIMIT: usize = 5;
const MAX_TOP_TAGS_LIMIT: usize = 50;

/// GET /api/v1/dashboard/today
pub async fn today(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<TodaySummary>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let sessions = state.db.day_sessions(&user.user_id, date).await?;
    let day_sessions: Vec<_> = sessions
        .iter()
        .map(|(session, tags)| session.to_day_session(tags.clone()))
        .collect();

    Ok(Json(today_summary(date, &day_sessions)))
}

/// GET /api/v1/dashboard/weekly
///
/// Rolling 7-day window ending at the provided date (default today).
pub async fn weekly(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<WeeklySummaryResponse>> {
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = end - Duration::days(6);
    let range = DateRange::new(start, end)?;

    let sessions = state.db.sessions_in_range(&user.user_id, start, end).await?;
    let slices: Vec<_> = sessions.iter().map(|s| s.to_slice()).collect();

    Ok(Json(WeeklySummaryResponse {
        start_date: start,
        end_date: end,
        days: daily_series(&range, &slices),
    }))
}

/// GET /api/v1/dashboard/heatmap
pub async fn heatmap(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<HeatmapResponse>> {
    let range = DateRange::new(query.start_date, query.end_date)?;

    let sessions = state
        .db
        .sessions_in_range(&user.user_id, range.start(), range.end())
        .await?;
    let slices: Vec<_> = sessions.iter().map(|s| s.to_slice()).collect();

    Ok(Json(HeatmapResponse {
        start_date: range.start(),
        end_date: range.end(),
        cells: heatmap_cells(&range, &slices),
    }))
}

/// GET /api/v1/dashboard/top-tags
pub async fn top_tags(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<TopTagsQuery>,
) -> Result<Json<TopTagsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_TAGS_LIMIT);
    if !(1..=MAX_TOP_TAGS_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_TOP_TAGS_LIMIT}"
        )));
    }

    let range = DateRange::new(query.start_date, query.end_date)?;

    let pairs = state
        .db
        .tag_minutes_in_range(&user.user_id, range.start(), range.end())
        .await?;

    Ok(Json(TopTagsResponse {
        start_date: range.start(),
        end_date: range.end(),
        items: rank_tags(&pairs, limit),
    }))
}

/// GET /api/v1/dashboard/streak
///
/// Reads the cached streak fields off the user row; they were recomputed by
/// the latest session write.
pub async fn streak(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
) -> Result<Json<StreakResponse>> {
    let user = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(StreakResponse {
        current_streak: user.current_streak,
        longest_streak: user.longest_streak,
        last_study_date: user.last_study_date,
    }))
}
