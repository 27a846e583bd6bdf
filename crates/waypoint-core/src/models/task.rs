//! Task model definition and its context log.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityRef, TaskPriority, TaskStatus};

/// A unit of work inside a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task (UUID)
    pub id: String,

    /// ID of the owning plan
    pub plan_id: String,

    /// Optional milestone the task contributes to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,

    /// Brief title/summary of the task
    pub title: String,

    /// Detailed multi-line description of the task
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Relative urgency
    #[serde(default)]
    pub priority: TaskPriority,

    /// Estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Effort actually spent, recorded on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,

    /// Append-only free-text log of notes, summaries and blocker reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextEntry>,

    /// Set the first time the task enters `in_progress`; never cleared
    pub started_at: Option<Timestamp>,

    /// Set the first time the task enters `completed`; never cleared
    pub completed_at: Option<Timestamp>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,
}

/// What a context log entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Note,
    Summary,
    Blocker,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Note => "note",
            ContextKind::Summary => "summary",
            ContextKind::Blocker => "blocker",
        }
    }
}

impl FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "note" => Ok(ContextKind::Note),
            "summary" => Ok(ContextKind::Summary),
            "blocker" => Ok(ContextKind::Blocker),
            _ => Err(format!("Invalid context kind: {s}")),
        }
    }
}

/// One line of a task's context log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextEntry {
    pub kind: ContextKind,
    pub message: String,
    pub recorded_at: Timestamp,
}

impl ContextEntry {
    pub fn new(kind: ContextKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recorded_at: Timestamp::now(),
        }
    }
}

impl Task {
    /// Reference to this task as a dependency endpoint.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::task(&self.id)
    }
}
