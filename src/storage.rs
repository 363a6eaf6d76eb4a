//! Durable key-value storage for tracker state
//!
//! Each key is stored as `<key>.json` in the data directory. Writes go to a
//! temporary file that is renamed into place, so a crash never leaves a
//! half-written value behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::progress::{ProgressMap, TrackerState};

/// Key holding the progress map
pub const PROGRESS_KEY: &str = "progress";

/// Key holding the start date
pub const START_DATE_KEY: &str = "startDate";

/// JSON file store rooted at a directory
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(config.data_dir()?))
    }

    /// Directory the store writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and decode a value, `None` if the key was never written
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {key} from {:?}", path))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {key}.json"))?;
        Ok(Some(value))
    }

    /// Encode and write a value
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {key}"))?;
        self.write_raw(key, &contents)
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {key} from {:?}", path))?;
        Ok(Some(contents))
    }

    fn write_raw(&self, key: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.dir))?;

        let path = self.key_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&tmp, contents).with_context(|| format!("Failed to write {:?}", tmp))?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err)
                .with_context(|| format!("Failed to move {:?} into place at {:?}", tmp, path));
        }

        tracing::debug!(key, path = ?path, "Stored value");
        Ok(())
    }

    /// Delete a key; missing keys are ignored
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }

    /// Load the progress map and start date
    pub fn load_state(&self) -> Result<TrackerState> {
        let progress = self.get::<ProgressMap>(PROGRESS_KEY)?.unwrap_or_default();
        let start_date = self.get::<DateTime<Utc>>(START_DATE_KEY)?;
        Ok(TrackerState { progress, start_date })
    }

    /// Persist the progress map and start date.
    ///
    /// Either both keys are updated or neither is: when the start date cannot
    /// be written, the previous progress file is put back.
    pub fn save_state(&self, state: &TrackerState) -> Result<()> {
        let previous = self.read_raw(PROGRESS_KEY)?;
        self.set(PROGRESS_KEY, &state.progress)?;

        let start = match &state.start_date {
            Some(start) => self.set(START_DATE_KEY, start),
            None => self.remove(START_DATE_KEY),
        };

        if let Err(err) = start {
            tracing::warn!(error = %err, "Start date write failed, restoring previous progress");
            let restored = match &previous {
                Some(contents) => self.write_raw(PROGRESS_KEY, contents),
                None => self.remove(PROGRESS_KEY),
            };
            if let Err(rollback) = restored {
                return Err(err.context(format!("Failed to restore progress: {rollback:#}")));
            }
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::DayProgress;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_keys_read_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        assert!(store.get::<ProgressMap>(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn empty_store_loads_default_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("nested"));
        assert_eq!(store.load_state().unwrap(), TrackerState::default());
    }

    #[test]
    fn state_round_trips_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("data"));

        let state = TrackerState {
            progress: ProgressMap::new()
                .with_day(2, DayProgress { problems_solved: 7, ..Default::default() }),
            start_date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).unwrap()),
        };

        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap(), state);
        assert!(store.dir().join("progress.json").exists());
        assert!(store.dir().join("startDate.json").exists());
        assert!(!store.dir().join(".progress.json.tmp").exists());
    }

    #[test]
    fn clearing_start_date_removes_the_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());

        let mut state = TrackerState {
            start_date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).unwrap()),
            ..Default::default()
        };
        store.save_state(&state).unwrap();

        state.start_date = None;
        store.save_state(&state).unwrap();
        assert!(!temp_dir.path().join("startDate.json").exists());
        assert!(store.load_state().unwrap().start_date.is_none());
    }

    fn blocked_start_date(store: &Store) {
        let blocker = store.dir().join("startDate.json");
        let _ = fs::remove_file(&blocker);
        fs::create_dir_all(blocker.join("occupied")).unwrap();
    }

    #[test]
    fn failed_start_date_write_keeps_previous_progress() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());

        let before = TrackerState {
            progress: ProgressMap::new()
                .with_day(1, DayProgress { problems_solved: 13, ..Default::default() }),
            start_date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).unwrap()),
        };
        store.save_state(&before).unwrap();
        let saved = fs::read_to_string(store.dir().join("progress.json")).unwrap();

        blocked_start_date(&store);
        let after = TrackerState {
            progress: ProgressMap::new()
                .with_day(5, DayProgress { problems_solved: 2, ..Default::default() }),
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 4, 0, 0).unwrap()),
        };
        assert!(store.save_state(&after).is_err());

        assert_eq!(fs::read_to_string(store.dir().join("progress.json")).unwrap(), saved);
        assert!(!store.dir().join(".progress.json.tmp").exists());
        assert!(!store.dir().join(".startDate.json.tmp").exists());
    }

    #[test]
    fn failed_start_date_removal_keeps_previous_progress() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        blocked_start_date(&store);

        let state = TrackerState {
            progress: ProgressMap::new()
                .with_day(2, DayProgress { problems_solved: 1, ..Default::default() }),
            start_date: None,
        };
        assert!(store.save_state(&state).is_err());
        assert!(!store.dir().join("progress.json").exists());
    }

    #[test]
    fn corrupt_values_surface_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("progress.json"), "{oops").unwrap();
        let store = Store::new(temp_dir.path());
        assert!(store.load_state().is_err());
    }

    #[test]
    fn reads_browser_storage_layout() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("progress.json"),
            r#"{"4": {"completed": false, "completedAt": null, "problemsSolved": 3}}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("startDate.json"), r#""2024-02-01T04:00:00.000Z""#).unwrap();

        let state = Store::new(temp_dir.path()).load_state().unwrap();
        assert_eq!(state.progress.day(4).problems_solved, 3);
        assert_eq!(state.start_date, Some(Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).unwrap()));
    }
}
