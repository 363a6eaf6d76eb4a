//! Plain-text rendering of the dashboard and the plan

pub mod dashboard;
pub mod plan;

pub use dashboard::render_dashboard;
pub use plan::render_plan;

use crate::progress::DayProgress;

/// Column width used when the terminal width is unknown
pub const DEFAULT_WIDTH: usize = 80;

const BAR_WIDTH: usize = 24;

/// Fixed-width bar for a percentage, clamped to 0..=100
pub fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// "1 day", "3 days"
pub fn plural(count: u32, noun: &str) -> String {
    if count == 1 { format!("{count} {noun}") } else { format!("{count} {noun}s") }
}

/// One-line confirmation after a day was updated
pub fn describe_update(day: u32, progress: &DayProgress) -> String {
    let state = if progress.completed { "completed" } else { "in progress" };
    format!("Day {day}: {} solved, {state}", plural(progress.problems_solved, "problem"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_clamped() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(250.0), progress_bar(100.0));
        assert_eq!(progress_bar(-3.0), progress_bar(0.0));
        assert_eq!(progress_bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn update_description() {
        let done = DayProgress { completed: true, completed_at: None, problems_solved: 13 };
        assert_eq!(describe_update(4, &done), "Day 4: 13 problems solved, completed");

        let partial = DayProgress { problems_solved: 1, ..Default::default() };
        assert_eq!(describe_update(4, &partial), "Day 4: 1 problem solved, in progress");
    }
}
