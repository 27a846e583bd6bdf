//! Parameter structures for Waypoint operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde and an optional JSON schema.
//! Interface layers wrap them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Enumerated values (statuses, kinds, dependency types) arrive as strings
//! so that every interface reports bad input the same way. Each structure
//! that holds one has a `validate` (or similarly named) method that parses
//! them into typed values and fails with [`PlannerError::InvalidInput`].
//!
//! ```rust
//! use waypoint_core::params::TransitionTask;
//!
//! let params = TransitionTask {
//!     id: "3f1c".to_string(),
//!     status: "sideways".to_string(),
//! };
//! assert!(params.validate().is_err());
//! ```

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    graph::DEFAULT_MAX_DEPTH,
    models::{
        DependencyType, Direction, EntityKind, EntityRef, ItemKind, PlanStatus, TaskPriority,
        TaskStatus,
    },
};

/// Parses an enumerated string field, naming the field on failure.
fn parse_field<T: FromStr<Err = String>>(field: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|reason| PlannerError::invalid_input(field).with_reason(reason))
}

fn parse_optional<T: FromStr<Err = String>>(field: &str, value: Option<&str>) -> Result<Option<T>> {
    value.map(|v| parse_field(field, v)).transpose()
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(())
}

fn require_hours(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(hours) if !hours.is_finite() || hours < 0.0 => Err(PlannerError::invalid_input(field)
            .with_reason(format!("must be a non-negative number of hours, got {hours}"))),
        _ => Ok(()),
    }
}

/// Generic parameters for operations requiring just an ID.
///
/// Used for show/delete/activate on plans and show/delete/cancel on tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: String,
}

/// Parameters for creating a new plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePlan {
    /// Title of the plan (required)
    pub title: String,
    /// Optional detailed description of the plan
    pub description: Option<String>,
    /// Optional working directory for the plan
    pub directory: Option<String>,
}

impl CreatePlan {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)
    }
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListPlans {
    /// Only list plans in this status ('draft', 'active', 'completed',
    /// 'archived')
    pub status: Option<String>,
}

impl ListPlans {
    pub fn validate(&self) -> Result<Option<PlanStatus>> {
        parse_optional("status", self.status.as_deref())
    }
}

/// Parameters for moving a plan to another status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TransitionPlan {
    /// ID of the plan
    pub id: String,
    /// Target status ('active', 'completed' or 'archived')
    pub status: String,
}

impl TransitionPlan {
    pub fn validate(&self) -> Result<PlanStatus> {
        parse_field("status", &self.status)
    }
}

/// Parameters for adding a goal, objective or milestone to a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateItem {
    /// ID of the plan to add the item to
    pub plan_id: String,
    /// Kind of item: 'goal', 'objective' or 'milestone'
    pub kind: String,
    /// Title of the item (required)
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
}

impl CreateItem {
    pub fn validate(&self) -> Result<ItemKind> {
        require_text("title", &self.title)?;
        parse_field("kind", &self.kind)
    }
}

/// Parameters addressing one goal, objective or milestone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ItemRef {
    /// Kind of item: 'goal', 'objective' or 'milestone'
    pub kind: String,
    /// ID of the item
    pub id: String,
}

impl ItemRef {
    pub fn validate(&self) -> Result<ItemKind> {
        parse_field("kind", &self.kind)
    }
}

/// Parameters for listing a plan's goals, objectives and milestones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListItems {
    /// ID of the plan
    pub plan_id: String,
    /// Only list items of this kind
    pub kind: Option<String>,
}

impl ListItems {
    pub fn validate(&self) -> Result<Option<ItemKind>> {
        parse_optional("kind", self.kind.as_deref())
    }
}

/// Parameters for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTask {
    /// ID of the plan to add the task to
    pub plan_id: String,
    /// Title of the task (required)
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Optional milestone in the same plan this task contributes to
    pub milestone_id: Option<String>,
    /// Priority: 'low', 'medium' (default), 'high' or 'critical'
    pub priority: Option<String>,
    /// Estimated effort in hours
    pub estimated_hours: Option<f64>,
}

impl CreateTask {
    pub fn validate(&self) -> Result<TaskPriority> {
        require_text("title", &self.title)?;
        require_hours("estimated_hours", self.estimated_hours)?;
        Ok(parse_optional("priority", self.priority.as_deref())?.unwrap_or_default())
    }
}

/// Parameters for listing a plan's tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// ID of the plan
    pub plan_id: String,
    /// Only list tasks in this status
    pub status: Option<String>,
}

impl ListTasks {
    pub fn validate(&self) -> Result<Option<TaskStatus>> {
        parse_optional("status", self.status.as_deref())
    }
}

/// Parameters for moving a task to another status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TransitionTask {
    /// ID of the task
    pub id: String,
    /// Target status ('backlog', 'ready', 'in_progress', 'review',
    /// 'blocked', 'completed' or 'cancelled')
    pub status: String,
}

impl TransitionTask {
    pub fn validate(&self) -> Result<TaskStatus> {
        parse_field("status", &self.status)
    }
}

/// Parameters for starting work on a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartTask {
    /// ID of the task
    pub id: String,
    /// Optional note recorded in the task's context log
    pub notes: Option<String>,
}

/// Parameters for completing a task under review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CompleteTask {
    /// ID of the task
    pub id: String,
    /// What was accomplished. Recorded in the task's context log.
    ///
    /// Example: "Added retry with exponential backoff to the sync client and
    /// covered the timeout path with an integration test."
    pub summary: String,
    /// Effort actually spent, in hours
    pub actual_hours: Option<f64>,
}

impl CompleteTask {
    pub fn validate(&self) -> Result<()> {
        require_text("summary", &self.summary)?;
        require_hours("actual_hours", self.actual_hours)
    }
}

/// Parameters for blocking a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct BlockTask {
    /// ID of the task
    pub id: String,
    /// Why the task cannot progress
    pub reason: String,
}

impl BlockTask {
    pub fn validate(&self) -> Result<()> {
        require_text("reason", &self.reason)
    }
}

/// Parameters addressing any entity: a plan, goal, objective, milestone or
/// task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Entity {
    /// Entity kind: 'plan', 'goal', 'objective', 'milestone' or 'task'
    pub kind: String,
    /// ID of the entity
    pub id: String,
}

impl Entity {
    pub fn validate(&self) -> Result<EntityRef> {
        let kind: EntityKind = parse_field("kind", &self.kind)?;
        Ok(EntityRef::new(kind, &self.id))
    }
}

/// Parameters naming both ends of a dependency edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DependencyEnds {
    /// Kind of the source entity (the blocker, for 'blocks' edges)
    pub source_kind: String,
    /// ID of the source entity
    pub source_id: String,
    /// Kind of the target entity
    pub target_kind: String,
    /// ID of the target entity
    pub target_id: String,
}

impl DependencyEnds {
    pub fn validate(&self) -> Result<(EntityRef, EntityRef)> {
        let source_kind: EntityKind = parse_field("source_kind", &self.source_kind)?;
        let target_kind: EntityKind = parse_field("target_kind", &self.target_kind)?;
        Ok((
            EntityRef::new(source_kind, &self.source_id),
            EntityRef::new(target_kind, &self.target_id),
        ))
    }
}

/// Parameters for adding a dependency edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddDependency {
    #[serde(flatten)]
    pub ends: DependencyEnds,
    /// Edge type: 'blocks' (default), 'required_by' or 'related_to'
    pub dependency_type: Option<String>,
}

impl AddDependency {
    pub fn validate(&self) -> Result<(EntityRef, EntityRef, DependencyType)> {
        let (source, target) = self.ends.validate()?;
        let dependency_type =
            parse_optional("dependency_type", self.dependency_type.as_deref())?.unwrap_or_default();
        Ok((source, target, dependency_type))
    }
}

/// Parameters for walking the dependency chain of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DependencyChain {
    #[serde(flatten)]
    pub entity: Entity,
    /// 'upstream' (what this depends on, default) or 'downstream' (what
    /// depends on this)
    pub direction: Option<String>,
    /// Maximum number of hops to follow (default 10)
    pub max_depth: Option<usize>,
}

impl DependencyChain {
    pub fn validate(&self) -> Result<(EntityRef, Direction, usize)> {
        let origin = self.entity.validate()?;
        let direction =
            parse_optional("direction", self.direction.as_deref())?.unwrap_or_default();
        Ok((origin, direction, self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)))
    }
}
