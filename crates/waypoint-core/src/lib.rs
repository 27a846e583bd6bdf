//! Core library for the Waypoint planning backend.
//!
//! Waypoint tracks plans, their goals, objectives and milestones, and the
//! tasks that carry the actual work. Any of these can depend on any other
//! within the same plan. The crate is organized around three pieces:
//!
//! - [`lifecycle`]: pure transition tables for task and plan statuses
//! - [`graph`]: dependency queries (blockers, cycle detection, chains) on
//!   top of any edge store implementing [`graph::DependencyGraph`]
//! - [`orchestrator`]: the single writer of task status, composing the
//!   lifecycle with the SQLite store in [`db`]
//!
//! [`Planner`] wraps all of this in an async API used by the CLI and the MCP
//! server, and [`display`] renders results as markdown.
//!
//! # Quick Start
//!
//! ```rust
//! use waypoint_core::{
//!     params::{CreatePlan, CreateTask, StartTask},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("/tmp/waypoint-quickstart.db")
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         title: "My Project".to_string(),
//!         description: None,
//!         directory: None,
//!     })
//!     .await?;
//!
//! let task = planner
//!     .create_task(&CreateTask {
//!         plan_id: plan.id.clone(),
//!         title: "Write the README".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let task = planner
//!     .start_task(&StartTask {
//!         id: task.id,
//!         notes: None,
//!     })
//!     .await?;
//! println!("{task}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod planner;

pub use db::Database;
pub use error::{PlannerError, Result};
pub use graph::DependencyGraph;
pub use lifecycle::Lifecycle;
pub use models::{
    Dependency, DependencyType, EntityKind, EntityRef, Plan, PlanItem, PlanStatus, Task,
    TaskStatus,
};
pub use orchestrator::TaskOrchestrator;
pub use planner::{Planner, PlannerBuilder};
