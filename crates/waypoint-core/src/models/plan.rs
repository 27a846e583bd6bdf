//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityRef, PlanItem, PlanStatus, Task};

/// Represents a complete plan with metadata and, when loaded, its contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan (UUID)
    pub id: String,

    /// Title of the plan
    pub title: String,

    /// Detailed multi-line description of the plan
    pub description: Option<String>,

    /// Lifecycle status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Working directory for the plan
    pub directory: Option<String>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Goals, objectives and milestones (lazy-loaded)
    #[serde(default)]
    pub items: Vec<PlanItem>,

    /// Associated tasks (lazy-loaded)
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Plan {
    /// Reference to this plan as a dependency endpoint.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::plan(&self.id)
    }
}
