//! Configuration management for the tracker

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::stats::Thresholds;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Custom plan file; the built-in 35-day plan is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<PathBuf>,

    /// Override for where progress is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Problems behind schedule tolerated before the lag alert fires
    #[serde(default = "default_lag_tolerance")]
    pub lag_tolerance: u32,

    /// Days without a completion a streak survives (counting back from today)
    #[serde(default = "default_streak_grace_days")]
    pub streak_grace_days: u32,

    /// Completed days per window in the velocity trend
    #[serde(default = "default_velocity_window_days")]
    pub velocity_window_days: u32,
}

fn default_lag_tolerance() -> u32 {
    5
}

fn default_streak_grace_days() -> u32 {
    1
}

fn default_velocity_window_days() -> u32 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plan_file: None,
            data_dir: None,
            lag_tolerance: default_lag_tolerance(),
            streak_grace_days: default_streak_grace_days(),
            velocity_window_days: default_velocity_window_days(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "dsa-tracker")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the default data directory path
    pub fn default_data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "dsa-tracker")
            .context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Data directory in effect, honouring the override
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }

    /// Heuristic thresholds for the statistics engine
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            lag_tolerance: self.lag_tolerance,
            streak_grace_days: self.streak_grace_days,
            velocity_window_days: self.velocity_window_days.max(1),
        }
    }
}
