//! Plan catalog model
//!
//! A plan is an ordered list of days, each with a topic and a problem target.
//! Catalogs are validated on construction so the rest of the crate can rely on
//! day numbers being exactly `1..=N`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or loading a plan catalog
#[derive(Debug, Error)]
pub enum PlanError {
    /// The catalog has no days
    #[error("Plan has no days")]
    Empty,

    /// Day numbers are not the contiguous sequence 1..=N
    #[error("Expected day {expected} at position {position}, found day {found}")]
    NonContiguous {
        /// Zero-based position in the catalog
        position: usize,
        /// Day number that should be at this position
        expected: u32,
        /// Day number actually found
        found: u32,
    },

    /// A day carries a week number of zero
    #[error("Day {day} has week 0; weeks start at 1")]
    InvalidWeek {
        /// Offending day
        day: u32,
    },

    /// Failed to read the plan file
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    /// Plan file is not valid JSON for a catalog
    #[error("Failed to parse plan file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One day of the study plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-based position in the plan
    pub day_number: u32,
    /// What the day covers
    pub topic_label: String,
    /// Problems to solve that day
    pub target_problems: u32,
    /// 1-based week the day belongs to
    pub week: u32,
    /// Hours budgeted for the day
    pub planned_hours: u32,
}

impl Day {
    /// Create a new day
    pub fn new(
        day_number: u32,
        topic_label: impl Into<String>,
        target_problems: u32,
        week: u32,
        planned_hours: u32,
    ) -> Self {
        Self { day_number, topic_label: topic_label.into(), target_problems, week, planned_hours }
    }
}

/// On-disk shape of a custom plan file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    /// Display name of the plan
    pub name: String,
    /// Days in order
    pub days: Vec<Day>,
    /// Optional week titles keyed by week number
    #[serde(default)]
    pub week_titles: BTreeMap<u32, String>,
}

/// The immutable, ordered list of days that make up a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    name: String,
    days: Vec<Day>,
    week_titles: BTreeMap<u32, String>,
    total_problems: u32,
    total_hours: u32,
    /// `prefix_targets[k]` is the target sum of days `1..=k`
    prefix_targets: Vec<u32>,
}

impl PlanCatalog {
    /// Build a catalog, checking that day numbers run 1..=N in order
    pub fn new(
        name: impl Into<String>,
        days: Vec<Day>,
        week_titles: BTreeMap<u32, String>,
    ) -> Result<Self, PlanError> {
        if days.is_empty() {
            return Err(PlanError::Empty);
        }

        for (position, day) in days.iter().enumerate() {
            let expected = position as u32 + 1;
            if day.day_number != expected {
                return Err(PlanError::NonContiguous { position, expected, found: day.day_number });
            }
            if day.week == 0 {
                return Err(PlanError::InvalidWeek { day: day.day_number });
            }
        }

        Ok(Self::assemble(name.into(), days, week_titles))
    }

    /// Build a catalog from days already known to be contiguous
    pub(crate) fn assemble(name: String, days: Vec<Day>, week_titles: BTreeMap<u32, String>) -> Self {
        let mut prefix_targets = Vec::with_capacity(days.len() + 1);
        prefix_targets.push(0u32);
        let mut running = 0u32;
        for day in &days {
            running = running.saturating_add(day.target_problems);
            prefix_targets.push(running);
        }

        let total_hours = days.iter().fold(0u32, |sum, d| sum.saturating_add(d.planned_hours));

        Self { name, days, week_titles, total_problems: running, total_hours, prefix_targets }
    }

    /// Load a catalog from a JSON plan file
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a catalog from a JSON plan document
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let file: PlanFile = serde_json::from_str(json)?;
        Self::new(file.name, file.days, file.week_titles)
    }

    /// Display name of the plan
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All days in order
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of days (N)
    pub fn total_days(&self) -> u32 {
        self.days.len() as u32
    }

    /// Sum of every day's target
    pub fn total_problems(&self) -> u32 {
        self.total_problems
    }

    /// Sum of every day's planned hours
    pub fn total_hours(&self) -> u32 {
        self.total_hours
    }

    /// Average target per day across the whole plan
    pub fn nominal_daily_rate(&self) -> f64 {
        f64::from(self.total_problems) / f64::from(self.total_days())
    }

    /// Look up a day by its 1-based number
    pub fn day(&self, day_number: u32) -> Option<&Day> {
        let index = day_number.checked_sub(1)?;
        self.days.get(index as usize)
    }

    /// Whether `day_number` names a day in this plan
    pub fn contains(&self, day_number: u32) -> bool {
        (1..=self.total_days()).contains(&day_number)
    }

    /// Target sum for days `1..=through`, clamped to the plan length
    pub fn expected_problems_through(&self, through: u32) -> u32 {
        let index = through.min(self.total_days()) as usize;
        self.prefix_targets[index]
    }

    /// Distinct week numbers in ascending order
    pub fn weeks(&self) -> Vec<u32> {
        let weeks: BTreeSet<u32> = self.days.iter().map(|d| d.week).collect();
        weeks.into_iter().collect()
    }

    /// Days belonging to a week
    pub fn days_in_week(&self, week: u32) -> impl Iterator<Item = &Day> {
        self.days.iter().filter(move |d| d.week == week)
    }

    /// Target sum for a week
    pub fn week_problems(&self, week: u32) -> u32 {
        self.days_in_week(week).fold(0u32, |sum, d| sum.saturating_add(d.target_problems))
    }

    /// Title of a week, if the plan names it
    pub fn week_title(&self, week: u32) -> Option<&str> {
        self.week_titles.get(&week).map(String::as_str)
    }
}
