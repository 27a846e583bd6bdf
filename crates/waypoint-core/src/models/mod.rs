//! Data models for plans, plan items, tasks and dependencies.
//!
//! This module contains the core domain models of the Waypoint planning
//! system. Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures and presentation apart.
//!
//! # Entity hierarchy
//!
//! ```text
//! Plan
//!  ├── Goal / Objective / Milestone   (PlanItem)
//!  └── Task                            (optionally tied to a milestone)
//! ```
//!
//! Any of the five kinds can be the endpoint of a [`Dependency`]; endpoints
//! are addressed with an [`EntityRef`], a `(kind, id)` pair.
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{EntityKind, EntityRef, TaskStatus};
//!
//! let task = EntityRef::task("3f1c0d7e");
//! assert_eq!(task.kind, EntityKind::Task);
//! assert_eq!(task.to_string(), "task:3f1c0d7e");
//!
//! let status: TaskStatus = "in_progress".parse().unwrap();
//! assert_eq!(status, TaskStatus::InProgress);
//! ```

pub mod dependency;
pub mod entity;
pub mod item;
pub mod plan;
pub mod status;
pub mod task;

#[cfg(test)]
mod tests;

pub use dependency::{
    ChainEntry, Dependency, DependencyType, Direction, EdgeCount, EntityDependencies, StartCheck,
};
pub use entity::{EntityKind, EntityRef};
pub use item::{ItemKind, PlanItem};
pub use plan::Plan;
pub use status::{PlanStatus, TaskPriority, TaskStatus};
pub use task::{ContextEntry, ContextKind, Task};
