//! Calendar-day bucketed aggregation over study sessions.
//!
//! All operations take sessions the caller already restricted to one user and
//! date range, bucket them by the session's start day, and zero-fill every
//! day of the inclusive range so a series never has gaps.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EngineError, Result};
use crate::tags;
use crate::types::{DailyPoint, DaySession, HeatmapCell, SessionSlice, TodaySummary};

/// Number of tags reported in a single-day summary.
const TODAY_TOP_TAGS: usize = 5;

/// Inclusive calendar-day range, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start` before any computation runs.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range (at least 1).
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Derive a session's duration in whole minutes.
///
/// Floor of the elapsed seconds over 60; anything that does not reach a full
/// positive minute is rejected, so `end == start` fails here rather than
/// producing a zero-length session.
pub fn session_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
    let minutes = (end - start).num_seconds().div_euclid(60);
    if minutes <= 0 {
        return Err(EngineError::InvalidDuration { minutes });
    }
    Ok(minutes)
}

/// Per-day totals over the range, one point per day in ascending order.
///
/// Days without sessions appear with zero minutes, zero count and no average
/// focus. Slices whose day falls outside the range are ignored.
pub fn daily_series(range: &DateRange, slices: &[SessionSlice]) -> Vec<DailyPoint> {
    let mut buckets: BTreeMap<NaiveDate, (i64, i64, u32)> = BTreeMap::new();
    for slice in slices {
        if !range.contains(slice.day) {
            continue;
        }
        let bucket = buckets.entry(slice.day).or_insert((0, 0, 0));
        bucket.0 += slice.minutes;
        bucket.1 += i64::from(slice.focus_level);
        bucket.2 += 1;
    }

    range
        .days()
        .map(|date| match buckets.get(&date) {
            Some(&(total_minutes, focus_sum, session_count)) => DailyPoint {
                date,
                total_minutes,
                avg_focus: Some(focus_sum as f64 / f64::from(session_count)),
                session_count,
            },
            None => DailyPoint {
                date,
                total_minutes: 0,
                avg_focus: None,
                session_count: 0,
            },
        })
        .collect()
}

/// Per-day minutes over the range, minutes only, same no-gaps contract as
/// [`daily_series`].
pub fn heatmap(range: &DateRange, slices: &[SessionSlice]) -> Vec<HeatmapCell> {
    daily_series(range, slices)
        .into_iter()
        .map(|point| HeatmapCell {
            date: point.date,
            total_minutes: point.total_minutes,
        })
        .collect()
}

/// Single-day summary: totals plus top tags and the highlight memo.
///
/// The highlight memo is the most recent non-empty memo of the day, ordered
/// by session end time descending.
pub fn today_summary(date: NaiveDate, sessions: &[DaySession]) -> TodaySummary {
    let total_minutes: i64 = sessions.iter().map(|s| s.minutes).sum();
    let session_count = sessions.len() as u32;
    let avg_focus = if sessions.is_empty() {
        None
    } else {
        let focus_sum: i64 = sessions.iter().map(|s| i64::from(s.focus_level)).sum();
        Some(focus_sum as f64 / f64::from(session_count))
    };

    let pairs: Vec<(String, i64)> = sessions
        .iter()
        .flat_map(|s| s.tags.iter().map(|name| (name.clone(), s.minutes)))
        .collect();
    let top_tags = tags::rank_tags(&pairs, TODAY_TOP_TAGS);

    let highlight_memo = sessions
        .iter()
        .filter(|s| s.memo.as_deref().is_some_and(|m| !m.is_empty()))
        .max_by_key(|s| s.end_time)
        .and_then(|s| s.memo.clone());

    TodaySummary {
        date,
        total_minutes,
        avg_focus,
        session_count,
        top_tags,
        highlight_memo,
    }
}
