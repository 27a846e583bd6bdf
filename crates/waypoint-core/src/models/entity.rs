//! Typed references to any plannable entity.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Closed set of entity kinds that can appear at either end of a dependency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Plan,
    Goal,
    Objective,
    Milestone,
    Task,
}

impl EntityKind {
    /// All kinds, in hierarchy order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Plan,
        EntityKind::Goal,
        EntityKind::Objective,
        EntityKind::Milestone,
        EntityKind::Task,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Plan => "plan",
            EntityKind::Goal => "goal",
            EntityKind::Objective => "objective",
            EntityKind::Milestone => "milestone",
            EntityKind::Task => "task",
        }
    }

    /// Capitalized name used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Plan => "Plan",
            EntityKind::Goal => "Goal",
            EntityKind::Objective => "Objective",
            EntityKind::Milestone => "Milestone",
            EntityKind::Task => "Task",
        }
    }

    /// Name of the table holding entities of this kind.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            EntityKind::Plan => "plans",
            EntityKind::Goal => "goals",
            EntityKind::Objective => "objectives",
            EntityKind::Milestone => "milestones",
            EntityKind::Task => "tasks",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plan" => Ok(EntityKind::Plan),
            "goal" => Ok(EntityKind::Goal),
            "objective" => Ok(EntityKind::Objective),
            "milestone" => Ok(EntityKind::Milestone),
            "task" => Ok(EntityKind::Task),
            _ => Err(format!("Invalid entity kind: {s}")),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(kind, id)` pair identifying a single entity.
///
/// Identity is the pair: two references are equal only when both the kind
/// and the id match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn plan(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Plan, id)
    }

    pub fn task(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Task, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
