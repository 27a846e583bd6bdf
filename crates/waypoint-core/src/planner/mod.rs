//! High-level async planner API.
//!
//! [`Planner`] is the entry point used by the CLI and the MCP server. It
//! validates interface parameters, then runs each operation on a blocking
//! thread against a freshly opened [`Database`]:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │     Params      │    │     Planner     │    │    Database     │
//! │  (validation)   │───▶│  (spawn_blocking│───▶│ + orchestrator  │
//! │                 │    │   per call)     │    │ + graph engine  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`plan_ops`]: Plans and their goals, objectives and milestones
//! - [`task_ops`]: Tasks, with every status change routed through
//!   [`TaskOrchestrator`](crate::orchestrator::TaskOrchestrator)
//! - [`dependency_ops`]: Dependency edges, validated before they are stored
//!
//! # Usage
//!
//! ```rust
//! use waypoint_core::{params::CreatePlan, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("/tmp/waypoint-example.db")
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         title: "Launch".to_string(),
//!         description: None,
//!         directory: None,
//!     })
//!     .await?;
//! println!("Created plan {}", plan.id);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
};

pub mod builder;
pub mod dependency_ops;
pub mod plan_ops;
pub mod task_ops;

#[cfg(test)]
mod tests;

pub use builder::PlannerBuilder;

/// Main planner interface for plans, tasks and their dependencies.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the SQLite database backing this planner.
    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Runs `op` on a blocking thread with its own database connection.
    pub(crate) async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
