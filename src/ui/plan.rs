//! Plan view: every day grouped by week with its status

use std::fmt::Write;

use textwrap::{Options, wrap};

use crate::plan::{Day, PlanCatalog};
use crate::progress::{DayStatus, ProgressMap};

fn status_marker(status: DayStatus) -> char {
    match status {
        DayStatus::Untouched => ' ',
        DayStatus::Started => '~',
        DayStatus::Completed => 'x',
    }
}

fn write_day(
    out: &mut String,
    day: &Day,
    progress: &ProgressMap,
    current_day: u32,
    width: usize,
) -> std::fmt::Result {
    let entry = progress.day(day.day_number);
    let cursor = if day.day_number == current_day { '>' } else { ' ' };
    let prefix = format!(
        "{cursor} [{}] Day {:>2}  ",
        status_marker(progress.status(day.day_number)),
        day.day_number,
    );
    let indent = " ".repeat(prefix.len());
    let text = format!(
        "{} ({}/{} problems, {}h)",
        day.topic_label, entry.problems_solved, day.target_problems, day.planned_hours,
    );

    let opts = Options::new(width.max(prefix.len() + 10))
        .initial_indent(&prefix)
        .subsequent_indent(&indent);
    for line in wrap(&text, opts) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Render the full plan, marking the day currently being worked on
pub fn render_plan(
    plan: &PlanCatalog,
    progress: &ProgressMap,
    current_day: u32,
    width: usize,
) -> String {
    let mut out = String::new();
    let _ = write_plan(&mut out, plan, progress, current_day, width);
    out
}

fn write_plan(
    out: &mut String,
    plan: &PlanCatalog,
    progress: &ProgressMap,
    current_day: u32,
    width: usize,
) -> std::fmt::Result {
    writeln!(
        out,
        "{}: {} days, {} problems, {} hours",
        plan.name(),
        plan.total_days(),
        plan.total_problems(),
        plan.total_hours(),
    )?;

    for week in plan.weeks() {
        writeln!(out)?;
        match plan.week_title(week) {
            Some(title) => writeln!(out, "Week {week}: {title}")?,
            None => writeln!(out, "Week {week}")?,
        }
        for day in plan.days_in_week(week) {
            write_day(out, day, progress, current_day, width)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::dsa_35;
    use crate::progress::DayProgress;

    #[test]
    fn days_show_status_and_cursor() {
        let progress = ProgressMap::new()
            .with_day(1, DayProgress { completed: true, completed_at: None, problems_solved: 13 })
            .with_day(2, DayProgress { problems_solved: 4, ..Default::default() });
        let text = render_plan(dsa_35(), &progress, 2, 200);

        assert!(text.starts_with("DSA 35-Day Challenge: 35 days, 455 problems, 280 hours"));
        assert!(text.contains("  [x] Day  1  Time & Space Complexity + Basics of Arrays (13/13 problems, 8h)"));
        assert!(text.contains("> [~] Day  2  "));
        assert!(text.contains("  [ ] Day  3  "));
        assert!(text.contains("Week 5"));
    }

    #[test]
    fn long_topics_wrap_under_the_label() {
        let text = render_plan(dsa_35(), &ProgressMap::new(), 1, 40);
        let indent = " ".repeat("  [ ] Day  5  ".len());

        let day_lines = text.lines().filter(|line| line.starts_with(' ') || line.starts_with('>'));
        for line in day_lines {
            assert!(line.chars().count() <= 40, "line too long: {line:?}");
        }
        assert!(text.lines().any(|line| line.starts_with(&indent)));
    }
}
