//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from studylog-core
pub use studylog_core::types::{DailyPoint, HeatmapCell, TagMinutes, TodaySummary};

use studylog_core::types::{DaySession, SessionSlice};

// === Database Entity Types ===

/// User row, carrying the cached streak fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_study_date: Option<NaiveDate>,
    pub current_streak: i32,
    pub longest_streak: i32,
}

/// Study session row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub id: i64,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub focus_level: i16,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbSession {
    /// Calendar day the session counts toward (start time, UTC).
    pub fn study_day(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// Reduce to the aggregation view used by the period aggregator.
    pub fn to_slice(&self) -> SessionSlice {
        SessionSlice {
            day: self.study_day(),
            minutes: i64::from(self.duration_minutes),
            focus_level: self.focus_level,
        }
    }

    /// Full single-day view including memo and tags.
    pub fn to_day_session(&self, tags: Vec<String>) -> DaySession {
        DaySession {
            minutes: i64::from(self.duration_minutes),
            focus_level: self.focus_level,
            end_time: self.end_time,
            memo: self.memo.clone(),
            tags,
        }
    }
}

/// Tag row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTag {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Report metadata row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReportFile {
    pub id: i64,
    pub user_id: String,
    pub report_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub file_format: String,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

// === API Request/Response Types ===

// Auth types
#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub id: String,
    pub email: String,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub current_streak: i32,
    pub longest_streak: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

// Session types
/// Payload shared by session create and update (updates replace every field,
/// including the tag list).
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionPayload {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub focus_level: i16,
    pub memo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionPublic {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub focus_level: i16,
    pub memo: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: i64,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub focus_level: i16,
    pub memo: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SessionDetail {
    pub fn from_db(session: DbSession, tags: Vec<String>) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_minutes: session.duration_minutes,
            focus_level: session.focus_level,
            memo: session.memo,
            tags,
            created_at: session.created_at,
        }
    }
}

impl SessionPublic {
    pub fn from_db(session: DbSession, tags: Vec<String>) -> Self {
        Self {
            id: session.id,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_minutes: session.duration_minutes,
            focus_level: session.focus_level,
            memo: session.memo,
            tags,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionPublic>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentSessionsQuery {
    pub limit: Option<i64>,
}

// Dashboard types
#[derive(Debug, Serialize, Deserialize)]
pub struct TodayQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyQuery {
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeatmapQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklySummaryResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DailyPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeatmapResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cells: Vec<HeatmapCell>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopTagsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopTagsResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub items: Vec<TagMinutes>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_study_date: Option<NaiveDate>,
}

// Tag types
#[derive(Debug, Serialize, Deserialize)]
pub struct TagItem {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagListResponse {
    pub items: Vec<TagItem>,
}

// Report types
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyReportRequest {
    pub date: NaiveDate,
    pub format: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyReportRequest {
    pub week_start: NaiveDate,
    pub format: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report_id: i64,
    pub report_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub file_format: String,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListItem {
    pub id: i64,
    pub report_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub file_format: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListResponse {
    pub items: Vec<ReportListItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListQuery {
    pub report_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDownloadResponse {
    pub report_id: i64,
    pub download_url: String,
}

// System types
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub time: DateTime<Utc>,
}
