//! Error types for studylog-core.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the aggregation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("session duration must be positive, computed {minutes} minutes")]
    InvalidDuration { minutes: i64 },
}
