//! Dashboard: headline numbers, pace alerts, weeks and milestones

use std::fmt::Write;

use super::{plural, progress_bar};
use crate::plan::PlanCatalog;
use crate::stats::{ScheduleStatus, Statistics};

/// Render the statistics view model as text
pub fn render_dashboard(stats: &Statistics, plan: &PlanCatalog) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_dashboard(&mut out, stats, plan);
    out
}

fn write_dashboard(out: &mut String, stats: &Statistics, plan: &PlanCatalog) -> std::fmt::Result {
    writeln!(out, "{}  |  {} (IST)", plan.name(), stats.today)?;

    if stats.days_since_start == 0 {
        writeln!(out, "Not started yet. Record a day or run `start` to begin.")?;
    } else {
        writeln!(
            out,
            "Calendar day {} of {}  |  working on day {}  |  {} remaining",
            stats.days_since_start,
            stats.total_days,
            stats.current_day,
            plural(stats.days_remaining, "day"),
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Problems  {}/{} ({:.1}%) {}",
        stats.total_problems_solved,
        stats.total_problems,
        stats.progress_percentage,
        progress_bar(stats.progress_percentage),
    )?;
    writeln!(
        out,
        "Days      {}/{} ({:.1}%) {}",
        stats.completed_days_count,
        stats.total_days,
        stats.day_completion_percentage,
        progress_bar(stats.day_completion_percentage),
    )?;
    writeln!(
        out,
        "Pace      {:.1}/day actual, {:.1}/day planned, {:.1}/day needed from here",
        stats.average_problems_per_day, stats.nominal_daily_rate, stats.required_daily_rate_remaining,
    )?;

    let schedule = match stats.schedule {
        ScheduleStatus::Ahead => "ahead",
        ScheduleStatus::OnTrack => "on track",
        ScheduleStatus::Behind => "behind",
    };
    writeln!(
        out,
        "Schedule  {schedule} ({} days expected, {} problems expected by today)",
        stats.expected_days_completed_by_now, stats.expected_problems_by_now,
    )?;
    writeln!(
        out,
        "Streak    {} (longest {})",
        plural(stats.current_streak, "day"),
        stats.longest_streak,
    )?;
    writeln!(
        out,
        "Velocity  {} solved recently vs {} before ({:+.0}%)",
        stats.velocity.recent, stats.velocity.prior, stats.velocity.trend_percent,
    )?;

    write!(out, "Estimate  {} to finish", plural(stats.estimated_days_to_complete, "day"))?;
    if let Some(date) = stats.estimated_completion_date {
        write!(out, ", around {date}")?;
    }
    if stats.projected_overrun_days > 0 {
        writeln!(out, " ({} over plan)", plural(stats.projected_overrun_days, "day"))?;
    } else {
        writeln!(out, " (on track)")?;
    }

    if stats.lag_alert {
        writeln!(out)?;
        writeln!(out, "! You're behind schedule")?;
        writeln!(out, "  {} behind the expected pace", plural(stats.problem_lag, "problem"))?;
        writeln!(out, "  About {:.1} days of work at your current pace", stats.time_lag_days)?;
        if let Some(recovery) = &stats.recovery {
            writeln!(out, "  Recovery options:")?;
            writeln!(
                out,
                "    + {} on each of the next {}",
                plural(recovery.daily_catchup, "problem"),
                plural(recovery.remaining_days, "day"),
            )?;
            writeln!(out, "    + {} per remaining week", plural(recovery.weekly_catchup, "problem"))?;
            writeln!(
                out,
                "    {} at double the planned rate",
                plural(recovery.intensive_days_needed, "intensive day"),
            )?;
        }
    } else if stats.is_ahead_of_schedule() && stats.problems_ahead > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "* You're {} ahead of schedule. Keep it up!",
            plural(stats.problems_ahead, "problem"),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Weeks")?;
    for week in &stats.weeks {
        let marker = if week.is_complete() { "x" } else { " " };
        writeln!(
            out,
            "  [{marker}] Week {}  {}/{} days  {}/{} problems  {:.1}%  {}",
            week.week,
            week.completed_days,
            week.total_days,
            week.problems_solved,
            week.target_problems,
            week.progress_percentage,
            week.title.as_deref().unwrap_or(""),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Milestones")?;
    for status in &stats.milestones {
        let marker = if status.achieved { "x" } else { " " };
        writeln!(
            out,
            "  [{marker}] {} - {}",
            status.milestone.title(),
            status.milestone.description(),
        )?;
    }

    Ok(())
}
