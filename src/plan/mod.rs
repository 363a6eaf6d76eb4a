//! Study plan catalogs
//!
//! A catalog is fixed for the lifetime of the process: either the built-in
//! 35-day plan or a custom plan file named in the config.

pub mod builtin;
pub mod model;

use anyhow::{Context, Result};

use crate::config::Config;

pub use builtin::dsa_35;
pub use model::{Day, PlanCatalog, PlanError, PlanFile};

/// Resolve the plan named by the config, falling back to the built-in plan
pub fn load_plan(config: &Config) -> Result<PlanCatalog> {
    match &config.plan_file {
        Some(path) => {
            let plan = PlanCatalog::from_file(path)
                .with_context(|| format!("Failed to load plan from {:?}", path))?;
            tracing::info!(plan = plan.name(), days = plan.total_days(), "Loaded custom plan");
            Ok(plan)
        }
        None => Ok(dsa_35().clone()),
    }
}
