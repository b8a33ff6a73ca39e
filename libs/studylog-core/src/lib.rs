//! Core study-tracking engine shared by the StudyLog backend.
//!
//! Provides:
//! - Streak computation over a user's distinct study days
//! - Calendar-day aggregation (daily series, heatmaps, single-day summaries)
//! - Tag ranking and tag-name normalization
//! - Session duration derivation and date-range validation
//!
//! Everything here is pure computation over data the caller already fetched;
//! persistence and HTTP live in the backend crate.

pub mod aggregate;
pub mod error;
pub mod streak;
pub mod tags;
pub mod types;

pub use aggregate::{daily_series, heatmap, session_minutes, today_summary, DateRange};
pub use error::{EngineError, Result};
pub use streak::compute_streaks;
pub use tags::{normalize_tag_names, rank_tags};
pub use types::{
    DailyPoint, DaySession, HeatmapCell, SessionSlice, StreakSummary, TagMinutes, TodaySummary,
};
