//! Shared types for the study-tracking engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Streak fields derived from a user's distinct study days.
///
/// `current_streak` counts the run ending at `last_study_date`; there is no
/// decay when the last study day is in the past (staleness is a display
/// concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_study_date: Option<NaiveDate>,
}

impl StreakSummary {
    /// Summary for a user with no sessions at all.
    pub fn empty() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_study_date: None,
        }
    }
}

/// Minimal per-session view consumed by the period aggregator.
///
/// `day` is the session's start time truncated to a calendar date in the
/// stored timezone representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSlice {
    pub day: NaiveDate,
    pub minutes: i64,
    pub focus_level: i16,
}

/// One calendar-day bucket in a daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub avg_focus: Option<f64>,
    pub session_count: u32,
}

/// One calendar-day cell in a heatmap (minutes only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub total_minutes: i64,
}

/// Tag name with summed study minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMinutes {
    pub name: String,
    pub minutes: i64,
}

/// Full session view for the single-day summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySession {
    pub minutes: i64,
    pub focus_level: i16,
    pub end_time: DateTime<Utc>,
    pub memo: Option<String>,
    pub tags: Vec<String>,
}

/// Totals for a single day, with top tags and a highlight memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub avg_focus: Option<f64>,
    pub session_count: u32,
    pub top_tags: Vec<TagMinutes>,
    pub highlight_memo: Option<String>,
}
