//! Mutations on the progress map
//!
//! Every mutation is a pure function from the current map to a new one. The
//! completed flag is derived from the problem count in exactly one place,
//! [`sync_completion`], which runs once per mutation.

use chrono::{DateTime, Utc};

use super::model::{DayProgress, ProgressMap};
use crate::plan::Day;

/// Coerce user input to a problem count.
///
/// Reads the leading integer the way a number field does, so `"13.7"` and
/// `"12abc"` count as 13 and 12. Blank, non-numeric and negative input read
/// as zero; values beyond `u32::MAX` saturate.
pub fn parse_problem_count(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = unsigned.find(|c: char| !c.is_ascii_digit()).unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Apply a new problem count to a day and resync its completion state.
///
/// Reaching the target completes the day (stamped with `now`), dropping below
/// it reopens the day. A day that stays on the same side of the target keeps
/// its existing `completed_at`.
pub fn sync_completion(
    previous: DayProgress,
    problems_solved: u32,
    target: u32,
    now: DateTime<Utc>,
) -> DayProgress {
    let meets_target = problems_solved >= target;

    match (meets_target, previous.completed) {
        (true, false) => DayProgress { completed: true, completed_at: Some(now), problems_solved },
        (false, true) => DayProgress { completed: false, completed_at: None, problems_solved },
        // A completed day always carries a timestamp
        (true, true) => DayProgress {
            completed: true,
            completed_at: previous.completed_at.or(Some(now)),
            problems_solved,
        },
        (false, false) => DayProgress { completed: false, completed_at: None, problems_solved },
    }
}

/// Record the number of problems solved on a day
pub fn set_problems_solved(
    progress: &ProgressMap,
    day: &Day,
    problems_solved: u32,
    now: DateTime<Utc>,
) -> ProgressMap {
    let previous = progress.day(day.day_number);
    let next = sync_completion(previous, problems_solved, day.target_problems, now);
    tracing::debug!(
        day = day.day_number,
        problems_solved,
        completed = next.completed,
        "Updated problems solved"
    );
    progress.with_day(day.day_number, next)
}

/// Mark a day done or not done.
///
/// Completing a day credits at least its target. Reopening a day trims the
/// count to just below the target so the two fields never disagree; a day with
/// a zero target cannot be reopened.
pub fn set_completed(
    progress: &ProgressMap,
    day: &Day,
    completed: bool,
    now: DateTime<Utc>,
) -> ProgressMap {
    let previous = progress.day(day.day_number);
    let target = day.target_problems;

    let problems_solved = if completed {
        previous.problems_solved.max(target)
    } else {
        match target.checked_sub(1) {
            Some(below) => previous.problems_solved.min(below),
            None => {
                tracing::debug!(day = day.day_number, "Day has no target and stays completed");
                previous.problems_solved
            }
        }
    };

    set_problems_solved(progress, day, problems_solved, now)
}
