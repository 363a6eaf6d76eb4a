//! Per-day progress records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress recorded against a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    /// Whether the day counts as done
    #[serde(default)]
    pub completed: bool,

    /// When the day was marked done; `None` while not completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Problems solved for the day
    #[serde(default)]
    pub problems_solved: u32,
}

/// Coarse state of a day as seen by the views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// No record exists for the day
    Untouched,
    /// A record exists but the day is not done
    Started,
    /// The day is done
    Completed,
}

/// Sparse map of day number to progress.
///
/// Days without an entry are untouched and read as `DayProgress::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<u32, DayProgress>);

impl ProgressMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress for a day, normalized to the default when untouched
    pub fn day(&self, day_number: u32) -> DayProgress {
        self.0.get(&day_number).copied().unwrap_or_default()
    }

    /// Status of a day
    pub fn status(&self, day_number: u32) -> DayStatus {
        match self.0.get(&day_number) {
            None => DayStatus::Untouched,
            Some(p) if p.completed => DayStatus::Completed,
            Some(_) => DayStatus::Started,
        }
    }

    /// A copy of this map with one day replaced
    pub fn with_day(&self, day_number: u32, progress: DayProgress) -> Self {
        let mut next = self.0.clone();
        next.insert(day_number, progress);
        Self(next)
    }

    /// All entries in ascending day order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DayProgress)> {
        self.0.iter().map(|(day, p)| (*day, p))
    }

    /// Completed entries in ascending day order
    pub fn completed(&self) -> impl Iterator<Item = (u32, &DayProgress)> {
        self.iter().filter(|(_, p)| p.completed)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no day has been touched
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, DayProgress)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (u32, DayProgress)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the tracker persists: the progress map and the start date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    /// Per-day progress
    pub progress: ProgressMap,
    /// Instant day 1 began, once chosen
    pub start_date: Option<DateTime<Utc>>,
}
