//! Report metadata endpoints
//!
//! Reports are metadata stubs: the rows are persisted, but download URLs are
//! placeholders standing in for presigned object-storage URLs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::RequestUser;
use crate::AppState;

const ALLOWED_FORMATS: [&str; 3] = ["csv", "json", "pdf"];
const ALLOWED_REPORT_TYPES: [&str; 3] = ["daily", "weekly", "custom"];

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// POST /api/v1/reports/daily
pub async fn create_daily(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Json(payload): Json<DailyReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    validate_format(&payload.format)?;

    let report = create_report_record(
        &state,
        &user.user_id,
        "daily",
        payload.date,
        payload.date,
        &payload.format,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(build_report_response(report))))
}

/// POST /api/v1/reports/weekly
pub async fn create_weekly(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Json(payload): Json<WeeklyReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    validate_format(&payload.format)?;

    let period_start = payload.week_start;
    let period_end = payload.week_start + Duration::days(6);
    let report = create_report_record(
        &state,
        &user.user_id,
        "weekly",
        period_start,
        period_end,
        &payload.format,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(build_report_response(report))))
}

/// GET /api/v1/reports
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ReportListResponse>> {
    if let Some(kind) = query.report_type.as_deref() {
        if !ALLOWED_REPORT_TYPES.contains(&kind) {
            return Err(ApiError::BadRequest("Unsupported report type".to_string()));
        }
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }

    let reports = state
        .db
        .list_reports(&user.user_id, query.report_type.as_deref(), limit)
        .await?;
    let items = reports
        .into_iter()
        .map(|report| ReportListItem {
            id: report.id,
            report_type: report.report_type,
            period_start: report.period_start,
            period_end: report.period_end,
            file_format: report.file_format,
            created_at: report.created_at,
        })
        .collect();

    Ok(Json(ReportListResponse { items }))
}

/// POST /api/v1/reports/:report_id/download
///
/// Regenerates a placeholder download URL with a fresh token.
pub async fn download(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
    Path(report_id): Path<i64>,
) -> Result<Json<ReportDownloadResponse>> {
    let report = state
        .db
        .get_report(report_id, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    let download_url = format!(
        "https://example.com/dummy/{}?token={}",
        report.s3_key,
        Uuid::new_v4()
    );

    Ok(Json(ReportDownloadResponse {
        report_id: report.id,
        download_url,
    }))
}

fn validate_format(file_format: &str) -> Result<()> {
    if !ALLOWED_FORMATS.contains(&file_format) {
        return Err(ApiError::BadRequest("Unsupported file format".to_string()));
    }
    Ok(())
}

async fn create_report_record(
    state: &AppState,
    user_id: &str,
    report_type: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
    file_format: &str,
) -> Result<DbReportFile> {
    let s3_key = format!(
        "reports/{}/{}-{}.{}",
        report_type,
        period_start,
        Uuid::new_v4(),
        file_format
    );

    state
        .db
        .insert_report(
            user_id,
            report_type,
            period_start,
            period_end,
            file_format,
            &s3_key,
        )
        .await
}

fn build_report_response(report: DbReportFile) -> ReportResponse {
    let download_url = format!("https://example.com/dummy/{}", report.s3_key);
    ReportResponse {
        report_id: report.id,
        report_type: report.report_type,
        period_start: report.period_start,
        period_end: report.period_end,
        file_format: report.file_format,
        download_url,
        created_at: report.created_at,
    }
}
