//! Statistics derivation
//!
//! [`derive_statistics`] turns the stored progress, the plan, the start date
//! and the current instant into everything the views display. It performs no
//! I/O, never fails and returns identical output for identical input; callers
//! pass `now` explicitly instead of the engine reading a clock.

pub mod achievements;
pub mod pace;
pub mod streak;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar;
use crate::plan::PlanCatalog;
use crate::progress::ProgressMap;

pub use achievements::{Milestone, MilestoneStatus, WeekSummary};
pub use pace::{RecoveryPlan, VelocityTrend};

/// Tunable heuristics used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Problems behind schedule tolerated before `lag_alert` is raised
    pub lag_tolerance: u32,
    /// Leading days without a completion the current streak survives
    pub streak_grace_days: u32,
    /// Completed days per velocity window
    pub velocity_window_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { lag_tolerance: 5, streak_grace_days: 1, velocity_window_days: 7 }
    }
}

/// Completion count relative to the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    Ahead,
    OnTrack,
    Behind,
}

/// Everything derived from the progress record for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// IST civil date the statistics were computed for
    pub today: NaiveDate,

    pub total_days: u32,
    pub completed_days_count: u32,
    pub days_remaining: u32,
    /// Completion-based active day, independent of the calendar
    pub current_day: u32,

    pub total_problems: u32,
    pub total_problems_solved: u32,
    pub remaining_problems: u32,
    pub progress_percentage: f64,
    pub day_completion_percentage: f64,

    pub average_problems_per_day: f64,
    pub nominal_daily_rate: f64,
    pub required_daily_rate_remaining: f64,

    /// 1-based calendar day of the challenge; 0 before a start date is chosen
    pub days_since_start: u32,
    pub expected_days_completed_by_now: u32,
    pub expected_problems_by_now: u32,
    pub problem_lag: u32,
    pub problems_ahead: u32,
    /// Lag expressed in days of work at the current average
    pub time_lag_days: f64,
    pub lag_alert: bool,
    pub schedule: ScheduleStatus,
    pub recovery: Option<RecoveryPlan>,

    pub current_streak: u32,
    pub longest_streak: u32,
    pub velocity: VelocityTrend,

    pub estimated_days_to_complete: u32,
    pub estimated_completion_date: Option<NaiveDate>,
    pub projected_overrun_days: u32,

    pub weeks: Vec<WeekSummary>,
    pub milestones: Vec<MilestoneStatus>,
}

impl Statistics {
    pub fn is_ahead_of_schedule(&self) -> bool {
        self.schedule == ScheduleStatus::Ahead
    }

    pub fn is_behind_schedule(&self) -> bool {
        self.schedule == ScheduleStatus::Behind
    }
}

/// Derive the statistics view model
pub fn derive_statistics(
    progress: &ProgressMap,
    plan: &PlanCatalog,
    start_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> Statistics {
    use pace::ratio;

    let total_days = plan.total_days();
    let total_problems = plan.total_problems();
    let today = calendar::civil_date(now);

    let completed_days_count = progress.completed().count() as u32;
    let total_problems_solved =
        progress.iter().fold(0u32, |sum, (_, p)| sum.saturating_add(p.problems_solved));
    let remaining_problems = total_problems.saturating_sub(total_problems_solved);
    let days_remaining = total_days.saturating_sub(completed_days_count);
    let current_day = (completed_days_count + 1).clamp(1, total_days.max(1));

    let progress_percentage =
        ratio(100.0 * f64::from(total_problems_solved), f64::from(total_problems));
    let day_completion_percentage =
        ratio(100.0 * f64::from(completed_days_count), f64::from(total_days));
    let average_problems_per_day =
        ratio(f64::from(total_problems_solved), f64::from(completed_days_count));
    let nominal_daily_rate = plan.nominal_daily_rate();
    let required_daily_rate_remaining =
        ratio(f64::from(remaining_problems), f64::from(days_remaining));

    let days_since_start =
        start_date.map_or(0, |start| calendar::days_since_start(start, now));
    let expected_days_completed_by_now = days_since_start.min(total_days);
    let expected_problems_by_now = plan.expected_problems_through(expected_days_completed_by_now);
    let problem_lag = expected_problems_by_now.saturating_sub(total_problems_solved);
    let problems_ahead = total_problems_solved.saturating_sub(expected_problems_by_now);
    let time_lag_days = if completed_days_count > 0 {
        f64::from(problem_lag) / average_problems_per_day.max(1.0)
    } else {
        0.0
    };

    let schedule = match completed_days_count.cmp(&expected_days_completed_by_now) {
        std::cmp::Ordering::Greater => ScheduleStatus::Ahead,
        std::cmp::Ordering::Less => ScheduleStatus::Behind,
        std::cmp::Ordering::Equal => ScheduleStatus::OnTrack,
    };
    let recovery =
        pace::recovery_plan(problem_lag, total_days, days_since_start, nominal_daily_rate);

    let dates = streak::completion_dates(progress);
    let current_streak = streak::current_streak(&dates, today, thresholds.streak_grace_days);
    let longest_streak = streak::longest_streak(&dates);
    let velocity = pace::velocity_trend(progress, thresholds.velocity_window_days);

    let estimated_days_to_complete = if average_problems_per_day > 0.0 {
        (f64::from(remaining_problems) / average_problems_per_day).ceil() as u32
    } else {
        total_days
    };
    let finish_offset = i64::from(days_since_start) + i64::from(estimated_days_to_complete) - 1;
    let estimated_completion_date = start_date
        .map(|start| calendar::add_civil_days(calendar::civil_date(start), finish_offset));
    let projected_overrun_days =
        u32::try_from(finish_offset - i64::from(total_days)).unwrap_or(0);

    Statistics {
        today,
        total_days,
        completed_days_count,
        days_remaining,
        current_day,
        total_problems,
        total_problems_solved,
        remaining_problems,
        progress_percentage,
        day_completion_percentage,
        average_problems_per_day,
        nominal_daily_rate,
        required_daily_rate_remaining,
        days_since_start,
        expected_days_completed_by_now,
        expected_problems_by_now,
        problem_lag,
        problems_ahead,
        time_lag_days,
        lag_alert: problem_lag > thresholds.lag_tolerance,
        schedule,
        recovery,
        current_streak,
        longest_streak,
        velocity,
        estimated_days_to_complete,
        estimated_completion_date,
        projected_overrun_days,
        weeks: achievements::week_summaries(plan, progress),
        milestones: achievements::milestones(current_streak, total_problems_solved),
    }
}
