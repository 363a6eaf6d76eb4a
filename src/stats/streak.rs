//! Streaks over civil completion dates
//!
//! A streak counts consecutive IST calendar days on which at least one plan
//! day was completed. Day numbers play no part: finishing days 4 and 5 on the
//! same evening is one streak day.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calendar;
use crate::progress::ProgressMap;

/// IST dates on which some day was completed.
///
/// Completed entries without a timestamp (older records) are skipped.
pub fn completion_dates(progress: &ProgressMap) -> BTreeSet<NaiveDate> {
    progress.completed().filter_map(|(_, p)| p.completed_at).map(calendar::civil_date).collect()
}

/// Length of the streak ending today.
///
/// Up to `grace_days` leading days without a completion are tolerated, so a
/// streak that ended yesterday still counts until today is over.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate, grace_days: u32) -> u32 {
    let mut cursor = today;
    let mut skipped = 0;

    while !dates.contains(&cursor) {
        if skipped >= grace_days {
            return 0;
        }
        skipped += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => return 0,
        }
    }

    let mut streak = 0;
    while dates.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive completion dates ever recorded
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;

    for &date in dates {
        run = match last {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        last = Some(date);
    }
    best
}
