//! dsa-tracker - progress tracking for a fixed-length DSA study plan
//!
//! Records problems solved per day, derives pace and schedule statistics
//! against the plan, and moves progress in and out as versioned JSON.
//! Civil days are counted in India Standard Time.

pub mod app;
pub mod calendar;
pub mod codec;
pub mod config;
pub mod plan;
pub mod progress;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::Tracker;
pub use config::Config;
pub use plan::PlanCatalog;
pub use stats::Statistics;
