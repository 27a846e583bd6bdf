//! Dependency edges between entities and the shapes returned by graph queries.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::EntityRef;

/// Kind of relation an edge expresses.
///
/// Only [`DependencyType::Blocks`] takes part in cycle detection and
/// startability checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Source must resolve before target can start
    #[default]
    Blocks,
    /// Source is required by target, informational
    RequiredBy,
    /// Loose association
    RelatedTo,
}

impl DependencyType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Blocks => "blocks",
            DependencyType::RequiredBy => "required_by",
            DependencyType::RelatedTo => "related_to",
        }
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blocks" => Ok(DependencyType::Blocks),
            "required_by" => Ok(DependencyType::RequiredBy),
            "related_to" => Ok(DependencyType::RelatedTo),
            _ => Err(format!("Invalid dependency type: {s}")),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge: `source` blocks (or relates to) `target`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dependency {
    pub id: String,
    pub source: EntityRef,
    pub target: EntityRef,
    pub dependency_type: DependencyType,
    pub created_at: Timestamp,
}

/// Direction of a dependency chain traversal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// What the origin depends on (walks edges towards their sources)
    #[default]
    Upstream,
    /// What depends on the origin (walks edges towards their targets)
    Downstream,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upstream" => Ok(Direction::Upstream),
            "downstream" => Ok(Direction::Downstream),
            _ => Err(format!("Invalid direction: {s}")),
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
        }
    }
}

/// One entity discovered by a chain traversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainEntry {
    pub entity: EntityRef,
    /// Hop count from the origin, starting at 1
    pub depth: usize,
    /// Type of the edge through which the entity was first reached
    pub dependency_type: DependencyType,
}

/// Number of edges touching an entity on each side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EdgeCount {
    pub as_source: usize,
    pub as_target: usize,
}

impl EdgeCount {
    pub fn total(&self) -> usize {
        self.as_source + self.as_target
    }
}

/// Outcome of a "can this entity start" check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartCheck {
    pub entity: EntityRef,
    pub startable: bool,
    /// Blockers that have not resolved yet
    pub unresolved: Vec<EntityRef>,
}

/// Every edge touching one entity, split by which end it sits on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDependencies {
    pub entity: EntityRef,
    /// Edges where the entity is the source
    pub outgoing: Vec<Dependency>,
    /// Edges where the entity is the target
    pub incoming: Vec<Dependency>,
}
