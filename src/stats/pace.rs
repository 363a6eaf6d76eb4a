//! Pace analysis: catch-up plans and velocity

use serde::Serialize;

use crate::progress::ProgressMap;

/// How to make up a problem lag in the days left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    /// Calendar days left in the plan
    pub remaining_days: u32,
    /// Extra problems per remaining day
    pub daily_catchup: u32,
    /// Extra problems per remaining week
    pub weekly_catchup: u32,
    /// Double-rate days needed to close the gap
    pub intensive_days_needed: u32,
}

/// Problems solved in the latest window of completed days vs the window before
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityTrend {
    /// Solved across the most recent window
    pub recent: u32,
    /// Solved across the preceding window
    pub prior: u32,
    /// Percent change from `prior` to `recent`; 0 when `prior` is 0
    pub trend_percent: f64,
}

/// Division that yields 0 instead of NaN or infinity
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

/// Ceiling division that yields 0 for a zero divisor
pub fn ceil_div(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 { 0 } else { numerator.div_ceil(denominator) }
}

fn saturating_sum<'a>(values: impl Iterator<Item = &'a u32>) -> u32 {
    values.fold(0, |acc, v| acc.saturating_add(*v))
}

/// Catch-up plan, present only while behind with calendar days left
pub fn recovery_plan(
    problem_lag: u32,
    total_days: u32,
    days_since_start: u32,
    nominal_daily_rate: f64,
) -> Option<RecoveryPlan> {
    if problem_lag == 0 {
        return None;
    }
    let remaining_days = total_days.checked_sub(days_since_start).filter(|d| *d > 0)?;

    let remaining_weeks = remaining_days.div_ceil(7);
    let intensive = ratio(f64::from(problem_lag), nominal_daily_rate * 2.0).ceil();

    Some(RecoveryPlan {
        remaining_days,
        daily_catchup: ceil_div(problem_lag, remaining_days),
        weekly_catchup: ceil_div(problem_lag, remaining_weeks),
        intensive_days_needed: intensive as u32,
    })
}

/// Compare the last `window` completed days (by day number) to the `window`
/// before them
pub fn velocity_trend(progress: &ProgressMap, window: u32) -> VelocityTrend {
    let window = window as usize;
    let solved: Vec<u32> = progress.completed().map(|(_, p)| p.problems_solved).collect();

    let recent = saturating_sum(solved.iter().rev().take(window));
    let prior = saturating_sum(solved.iter().rev().skip(window).take(window));

    let trend_percent = ratio(100.0 * (f64::from(recent) - f64::from(prior)), f64::from(prior));

    VelocityTrend { recent, prior, trend_percent }
}
