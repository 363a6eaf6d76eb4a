//! Week summaries and milestones

use serde::Serialize;

use super::pace::ratio;
use crate::plan::PlanCatalog;
use crate::progress::ProgressMap;

/// Roll-up of one week of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week: u32,
    pub title: Option<String>,
    pub total_days: u32,
    pub completed_days: u32,
    pub problems_solved: u32,
    pub target_problems: u32,
    pub progress_percentage: f64,
}

impl WeekSummary {
    /// Every day of the week is done
    pub fn is_complete(&self) -> bool {
        self.total_days > 0 && self.completed_days == self.total_days
    }
}

/// Summaries for every week of the plan, in order
pub fn week_summaries(plan: &PlanCatalog, progress: &ProgressMap) -> Vec<WeekSummary> {
    plan.weeks()
        .into_iter()
        .map(|week| {
            let mut summary = WeekSummary {
                week,
                title: plan.week_title(week).map(str::to_string),
                total_days: 0,
                completed_days: 0,
                problems_solved: 0,
                target_problems: plan.week_problems(week),
                progress_percentage: 0.0,
            };
            for day in plan.days_in_week(week) {
                let entry = progress.day(day.day_number);
                summary.total_days += 1;
                summary.completed_days += u32::from(entry.completed);
                summary.problems_solved = summary.problems_solved.saturating_add(entry.problems_solved);
            }
            summary.progress_percentage = ratio(
                100.0 * f64::from(summary.problems_solved),
                f64::from(summary.target_problems),
            );
            summary
        })
        .collect()
}

/// Badges unlocked by streaks and volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Milestone {
    FirstWeek,
    ProblemMaster,
    StreakWarrior,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [Self::FirstWeek, Self::ProblemMaster, Self::StreakWarrior];

    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstWeek => "First Week Complete",
            Self::ProblemMaster => "Problem Master",
            Self::StreakWarrior => "Streak Warrior",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstWeek => "Complete 7 consecutive days of problem solving",
            Self::ProblemMaster => "Solve 100 problems",
            Self::StreakWarrior => "Maintain a 14-day streak",
        }
    }

    /// Whether the milestone is reached for the given streak and total
    pub fn is_achieved(&self, current_streak: u32, problems_solved: u32) -> bool {
        match self {
            Self::FirstWeek => current_streak >= 7,
            Self::ProblemMaster => problems_solved >= 100,
            Self::StreakWarrior => current_streak >= 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneStatus {
    pub milestone: Milestone,
    pub achieved: bool,
}

pub fn milestones(current_streak: u32, problems_solved: u32) -> Vec<MilestoneStatus> {
    Milestone::ALL
        .into_iter()
        .map(|milestone| MilestoneStatus {
            milestone,
            achieved: milestone.is_achieved(current_streak, problems_solved),
        })
        .collect()
}
