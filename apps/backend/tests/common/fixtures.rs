//! Test fixtures and factory functions for creating test data.

use chrono::{Duration, NaiveDate, Utc};

use studylog_backend::models::SessionPayload;

/// Date helper for readable test data.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A session starting at `start_hour` UTC on `day`, lasting `minutes`.
pub fn session_on(
    day: NaiveDate,
    start_hour: u32,
    minutes: i64,
    focus_level: i16,
    memo: Option<&str>,
    tags: &[&str],
) -> SessionPayload {
    let start_time = day.and_hms_opt(start_hour, 0, 0).unwrap().and_utc();
    SessionPayload {
        start_time,
        end_time: start_time + Duration::minutes(minutes),
        focus_level,
        memo: memo.map(str::to_string),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// A simple half-hour session earlier today.
pub fn session_today(tags: &[&str]) -> SessionPayload {
    session_on(Utc::now().date_naive(), 0, 30, 3, None, tags)
}
