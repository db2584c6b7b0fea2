//! Streak calculation
//!
//! Pure functions over per-day outcomes. No database access, no clock:
//! callers pass "today" explicitly.

use crate::config::STREAK_LOOKBACK_DAYS;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Outcome recorded for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub succeeded: bool,
}

impl DayOutcome {
    pub fn success(date: NaiveDate) -> Self {
        Self {
            date,
            succeeded: true,
        }
    }

    pub fn failure(date: NaiveDate) -> Self {
        Self {
            date,
            succeeded: false,
        }
    }
}

/// Number of consecutive successful days ending today (or yesterday).
///
/// Today without an outcome is still undecided and is skipped. Today marked
/// as failed yields 0. Any earlier day that is missing or failed ends the
/// walk, which never looks back more than a year.
pub fn current_streak(log: &[DayOutcome], today: NaiveDate) -> u32 {
    let by_day: HashMap<NaiveDate, bool> = log.iter().map(|o| (o.date, o.succeeded)).collect();

    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(i64::from(offset));

        match by_day.get(&day) {
            Some(true) => streak += 1,
            Some(false) => break,
            None if offset == 0 => continue,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive calendar days among `success_dates`.
///
/// Order and duplicates in the input do not matter.
pub fn longest_streak(success_dates: &[NaiveDate]) -> u32 {
    let mut dates = success_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(prev) if (date - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    longest
}

/// Successful days of a log, for feeding [`longest_streak`]
pub fn success_dates(log: &[DayOutcome]) -> Vec<NaiveDate> {
    log.iter().filter(|o| o.succeeded).map(|o| o.date).collect()
}
