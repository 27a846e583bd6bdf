//! Goals, objectives and milestones.
//!
//! These three kinds share one shape: they are scoped to a plan, carry no
//! lifecycle of their own and exist mainly as dependency endpoints.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityKind, EntityRef};

/// The plan-scoped entity kinds without a lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Goal,
    Objective,
    Milestone,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        self.entity_kind().as_str()
    }

    /// The matching entity kind used for dependency endpoints.
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            ItemKind::Goal => EntityKind::Goal,
            ItemKind::Objective => EntityKind::Objective,
            ItemKind::Milestone => EntityKind::Milestone,
        }
    }
}

impl TryFrom<EntityKind> for ItemKind {
    type Error = String;

    fn try_from(kind: EntityKind) -> Result<Self, Self::Error> {
        match kind {
            EntityKind::Goal => Ok(ItemKind::Goal),
            EntityKind::Objective => Ok(ItemKind::Objective),
            EntityKind::Milestone => Ok(ItemKind::Milestone),
            EntityKind::Plan | EntityKind::Task => {
                Err(format!("{kind} is not a goal, objective or milestone"))
            }
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EntityKind>()?.try_into()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal, objective or milestone belonging to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    /// Unique identifier (UUID)
    pub id: String,

    /// Which of the three kinds this is
    pub kind: ItemKind,

    /// ID of the owning plan
    pub plan_id: String,

    pub title: String,

    pub description: Option<String>,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl PlanItem {
    /// Reference to this item as a dependency endpoint.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind.entity_kind(), &self.id)
    }
}
