//! Tracker session: state ownership, mutations and persistence

pub mod command;
pub mod rollover;
pub mod session;

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use crate::codec::{self, ExportDocument};
use crate::config::Config;
use crate::plan::{self, Day, PlanCatalog};
use crate::progress::{self, DayProgress, TrackerState};
use crate::stats::{self, Statistics, Thresholds};
use crate::storage::Store;

pub use rollover::MidnightRollover;

/// The single owner of the progress map and start date.
///
/// Every mutation builds a new [`TrackerState`], persists it, and only then
/// replaces the in-memory copy, so readers never observe a half-applied change
/// and a failed write leaves the session as it was.
#[derive(Debug)]
pub struct Tracker {
    plan: PlanCatalog,
    store: Store,
    thresholds: Thresholds,
    state: TrackerState,
}

impl Tracker {
    /// Open the tracker described by the config
    pub fn open(config: &Config) -> Result<Self> {
        let plan = plan::load_plan(config)?;
        let store = Store::open(config)?;
        Self::new(plan, store, config.thresholds())
    }

    /// Open a tracker over an explicit plan and store
    pub fn new(plan: PlanCatalog, store: Store, thresholds: Thresholds) -> Result<Self> {
        let state = store.load_state()?;
        tracing::debug!(
            days = state.progress.len(),
            started = state.start_date.is_some(),
            dir = ?store.dir(),
            "Loaded tracker state"
        );
        Ok(Self { plan, store, thresholds, state })
    }

    pub fn plan(&self) -> &PlanCatalog {
        &self.plan
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Derive the statistics view model for `now`
    pub fn statistics(&self, now: DateTime<Utc>) -> Statistics {
        stats::derive_statistics(
            &self.state.progress,
            &self.plan,
            self.state.start_date,
            now,
            &self.thresholds,
        )
    }

    /// Choose day 1 explicitly. Only allowed before anything is recorded.
    pub fn set_start_date(&mut self, start: DateTime<Utc>) -> Result<()> {
        if let Some(existing) = self.state.start_date {
            bail!("Challenge already started on {}; reset or import to change it", existing);
        }
        if !self.state.progress.is_empty() {
            bail!("Progress already recorded; reset before choosing a start date");
        }

        tracing::info!(start = %start, "Start date chosen");
        self.commit(TrackerState { progress: self.state.progress.clone(), start_date: Some(start) })
    }

    /// Record problems solved for a day, completing or reopening it as needed
    pub fn set_problems_solved(
        &mut self,
        day_number: u32,
        problems_solved: u32,
        now: DateTime<Utc>,
    ) -> Result<DayProgress> {
        let day = self.day(day_number)?;
        let progress = progress::set_problems_solved(&self.state.progress, day, problems_solved, now);
        self.apply(progress, day_number, now)
    }

    /// Mark a day done or not done
    pub fn set_completed(
        &mut self,
        day_number: u32,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<DayProgress> {
        let day = self.day(day_number)?;
        let progress = progress::set_completed(&self.state.progress, day, completed, now);
        self.apply(progress, day_number, now)
    }

    /// Build an export document of the current state
    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        codec::export_document(&self.state.progress, self.state.start_date, now)
    }

    /// Write an export document to `path`
    pub fn export_to(&self, path: &Path, now: DateTime<Utc>) -> Result<()> {
        let json = codec::export_json(&self.export(now)).context("Failed to serialize export")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write export to {:?}", path))?;
        tracing::info!(path = ?path, "Exported progress");
        Ok(())
    }

    /// Replace the whole state with an imported document.
    ///
    /// Validation errors are returned as [`codec::ImportError`] inside the
    /// `anyhow::Error` and leave the current state untouched.
    pub fn import_json(&mut self, raw: &str) -> Result<()> {
        let imported = codec::import_document(raw, &self.plan)?;
        tracing::info!(days = imported.progress.len(), "Importing progress");
        self.commit(imported)
    }

    /// Read a document from `path` and import it
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read import file {:?}", path))?;
        self.import_json(&raw)
    }

    /// Forget all progress and the start date
    pub fn reset(&mut self) -> Result<()> {
        tracing::info!("Resetting progress");
        self.commit(TrackerState::default())
    }

    fn day(&self, day_number: u32) -> Result<&Day> {
        match self.plan.day(day_number) {
            Some(day) => Ok(day),
            None => bail!("Day {} is not part of the plan (1-{})", day_number, self.plan.total_days()),
        }
    }

    fn apply(
        &mut self,
        progress: progress::ProgressMap,
        day_number: u32,
        now: DateTime<Utc>,
    ) -> Result<DayProgress> {
        // The first recorded change starts the challenge
        let start_date = self.state.start_date.or_else(|| {
            tracing::info!(start = %now, "Start date set on first update");
            Some(now)
        });
        let updated = progress.day(day_number);
        self.commit(TrackerState { progress, start_date })?;
        Ok(updated)
    }

    fn commit(&mut self, next: TrackerState) -> Result<()> {
        self.store.save_state(&next)?;
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImportError;
    use crate::plan::dsa_35;
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 6, 0, 0).unwrap()
    }

    fn tracker(dir: &TempDir) -> Tracker {
        Tracker::new(dsa_35().clone(), Store::new(dir.path()), Thresholds::default()).unwrap()
    }

    #[test]
    fn first_update_sets_the_start_date() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        assert!(tracker.state().start_date.is_none());

        tracker.set_problems_solved(1, 4, now()).unwrap();
        assert_eq!(tracker.state().start_date, Some(now()));

        tracker.set_problems_solved(1, 6, now() + TimeDelta::days(2)).unwrap();
        assert_eq!(tracker.state().start_date, Some(now()));
    }

    #[test]
    fn updates_are_persisted() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        let updated = tracker.set_problems_solved(3, 13, now()).unwrap();
        assert!(updated.completed);

        let reopened = self::tracker(&dir);
        assert_eq!(reopened.state(), tracker.state());
        assert_eq!(reopened.statistics(now()).completed_days_count, 1);
    }

    #[test]
    fn completing_and_reopening_days() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        let done = tracker.set_completed(2, true, now()).unwrap();
        assert_eq!(done.problems_solved, 13);
        assert_eq!(done.completed_at, Some(now()));

        let reopened = tracker.set_completed(2, false, now()).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.problems_solved, 12);
    }

    #[test]
    fn rejects_days_outside_the_plan() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        assert!(tracker.set_problems_solved(36, 1, now()).is_err());
        assert!(tracker.set_completed(0, true, now()).is_err());
        assert!(tracker.state().start_date.is_none());
    }

    #[test]
    fn start_date_can_only_be_chosen_once() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_start_date(now()).unwrap();
        assert!(tracker.set_start_date(now() + TimeDelta::days(1)).is_err());
        assert_eq!(tracker.state().start_date, Some(now()));
    }

    #[test]
    fn start_date_cannot_follow_progress() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 1, now()).unwrap();
        tracker.state.start_date = None;
        assert!(tracker.set_start_date(now()).is_err());
    }

    #[test]
    fn rejected_import_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 13, now()).unwrap();
        let before = tracker.state().clone();

        let raw = r#"{"progress": {"36": {"problemsSolved": 1}}, "startDate": "2024-09-01T00:00:00Z"}"#;
        let err = tracker.import_json(raw).unwrap_err();
        assert!(matches!(err.downcast_ref::<ImportError>(), Some(ImportError::InvalidEntry { .. })));

        assert_eq!(tracker.state(), &before);
        assert_eq!(self::tracker(&dir).state(), &before);
    }

    #[test]
    fn failed_import_write_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 13, now()).unwrap();
        let before = tracker.state().clone();

        let start_file = dir.path().join("startDate.json");
        std::fs::remove_file(&start_file).unwrap();
        std::fs::create_dir_all(start_file.join("occupied")).unwrap();

        let raw = r#"{"progress": {"5": {"problemsSolved": 2}}, "startDate": "2024-08-20T00:00:00Z"}"#;
        assert!(tracker.import_json(raw).is_err());

        assert_eq!(tracker.state(), &before);
        let on_disk: progress::ProgressMap =
            Store::new(dir.path()).get(crate::storage::PROGRESS_KEY).unwrap().unwrap();
        assert_eq!(on_disk, before.progress);
    }

    #[test]
    fn import_overwrites_instead_of_merging() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 13, now()).unwrap();

        let raw = r#"{"progress": {"5": {"problemsSolved": 2}}, "startDate": "2024-08-20T00:00:00Z"}"#;
        tracker.import_json(raw).unwrap();

        assert_eq!(tracker.state().progress.len(), 1);
        assert_eq!(tracker.state().progress.day(5).problems_solved, 2);
        assert_eq!(
            tracker.state().start_date,
            Some(Utc.with_ymd_and_hms(2024, 8, 20, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn export_then_import_through_files() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 13, now()).unwrap();
        tracker.set_problems_solved(2, 5, now()).unwrap();
        let saved = tracker.state().clone();

        let path = dir.path().join(codec::export_file_name(now()));
        tracker.export_to(&path, now()).unwrap();
        tracker.reset().unwrap();
        assert_eq!(tracker.state(), &TrackerState::default());

        tracker.import_from(&path).unwrap();
        assert_eq!(tracker.state(), &saved);
    }

    #[test]
    fn reset_clears_disk_state() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);
        tracker.set_problems_solved(1, 13, now()).unwrap();
        tracker.reset().unwrap();
        assert_eq!(self::tracker(&dir).state(), &TrackerState::default());
    }
}
