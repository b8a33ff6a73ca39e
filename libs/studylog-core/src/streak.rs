//! Consecutive-day streak computation.
//!
//! A streak is a run of calendar days, each with at least one session. The
//! current streak is the run ending at the most recent study day; the longest
//! streak is the longest run anywhere in the history. Both are recomputed in
//! full from the day set on every call.

use chrono::NaiveDate;

use crate::types::StreakSummary;

/// Recompute streak fields from a user's distinct study days.
///
/// Input order does not matter and duplicates are tolerated; the function
/// sorts and dedups internally, so recomputing on an unchanged day set always
/// yields identical results.
pub fn compute_streaks(days: &[NaiveDate]) -> StreakSummary {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.is_empty() {
        return StreakSummary::empty();
    }

    let last_study_date = sorted[sorted.len() - 1];

    // Walk backward from the most recent day; the first gap wider than one
    // day ends the current streak.
    let mut current_streak = 1;
    for pair in sorted.windows(2).rev() {
        if (pair[1] - pair[0]).num_days() == 1 {
            current_streak += 1;
        } else {
            break;
        }
    }

    // Ascending scan: a run extends on an exact one-day gap, resets otherwise.
    let mut longest_streak = 1;
    let mut run = 1;
    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 1;
        }
    }

    StreakSummary {
        current_streak,
        longest_streak,
        last_study_date: Some(last_study_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_day_set_yields_zeroes() {
        let summary = compute_streaks(&[]);
        assert_eq!(summary, StreakSummary::empty());
    }

    #[test]
    fn single_day_is_a_streak_of_one() {
        let summary = compute_streaks(&[d(2024, 1, 5)]);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 1);
        assert_eq!(summary.last_study_date, Some(d(2024, 1, 5)));
    }

    #[test]
    fn gap_before_latest_day_breaks_current_streak() {
        // 01-04 missing: current run is just 01-05, longest is 01-01..01-03.
        let days = [d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 5)];
        let summary = compute_streaks(&days);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.last_study_date, Some(d(2024, 1, 5)));
    }

    #[test]
    fn unbroken_run_counts_fully() {
        let days = [d(2024, 3, 10), d(2024, 3, 11), d(2024, 3, 12), d(2024, 3, 13)];
        let summary = compute_streaks(&days);
        assert_eq!(summary.current_streak, 4);
        assert_eq!(summary.longest_streak, 4);
    }

    #[test]
    fn current_run_can_exceed_earlier_runs() {
        // Earlier pair, then a longer recent run; longest follows the recent run.
        let days = [
            d(2024, 1, 1),
            d(2024, 1, 2),
            d(2024, 1, 10),
            d(2024, 1, 11),
            d(2024, 1, 12),
        ];
        let summary = compute_streaks(&days);
        assert_eq!(summary.current_streak, 3);
        assert_eq!(summary.longest_streak, 3);
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter() {
        let shuffled = [d(2024, 1, 5), d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)];
        let with_dupes = [
            d(2024, 1, 1),
            d(2024, 1, 2),
            d(2024, 1, 2),
            d(2024, 1, 3),
            d(2024, 1, 5),
        ];
        assert_eq!(compute_streaks(&shuffled), compute_streaks(&with_dupes));
    }

    #[test]
    fn recompute_is_idempotent() {
        let days = [d(2024, 2, 1), d(2024, 2, 2), d(2024, 2, 5)];
        assert_eq!(compute_streaks(&days), compute_streaks(&days));
    }

    #[test]
    fn stale_latest_day_does_not_decay_to_zero() {
        // No reference to "today": a run ending long ago still counts.
        let days = [d(2020, 6, 1), d(2020, 6, 2)];
        let summary = compute_streaks(&days);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.last_study_date, Some(d(2020, 6, 2)));
    }
}
