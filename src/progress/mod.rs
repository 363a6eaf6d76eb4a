//! Progress tracking for the study plan

pub mod model;
pub mod reducer;

pub use model::{DayProgress, DayStatus, ProgressMap, TrackerState};
pub use reducer::{parse_problem_count, set_completed, set_problems_solved, sync_completion};
