//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case with a short sentence, so callers can
//! print the result of a list query without checking it first.

use std::fmt;

use crate::models::{ChainEntry, Direction, EntityRef, Plan, PlanItem, Task, TaskStatus};

/// Newtype wrapper for displaying a list of plans, one summary per plan.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::display::Plans;
///
/// assert_eq!(Plans(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct Plans(pub Vec<Plan>);

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }

        for plan in &self.0 {
            writeln!(f, "## {} (ID: {})", plan.title, plan.id)?;
            writeln!(f)?;
            writeln!(f, "- **Status**: {}", plan.status)?;
            if let Some(desc) = &plan.description {
                writeln!(f, "- **Description**: {desc}")?;
            }
            if let Some(dir) = &plan.directory {
                writeln!(f, "- **Directory**: {dir}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of tasks as one line each.
pub struct Tasks(pub Vec<Task>);

impl Tasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.0 {
            task.fmt_line(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying goals, objectives and milestones.
pub struct Items(pub Vec<PlanItem>);

impl Items {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals, objectives or milestones found.");
        }
        for item in &self.0 {
            writeln!(f, "- {item}")?;
        }
        Ok(())
    }
}

/// Result of a chain traversal together with what was traversed.
pub struct Chain {
    pub origin: EntityRef,
    pub direction: Direction,
    pub entries: Vec<ChainEntry>,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} dependencies of {}", self.direction, self.origin)?;
        writeln!(f)?;
        if self.entries.is_empty() {
            return writeln!(f, "No dependencies found.");
        }
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Statuses a task may move to next.
pub struct Transitions {
    pub task_id: String,
    pub statuses: Vec<TaskStatus>,
}

impl fmt::Display for Transitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statuses.is_empty() {
            return writeln!(f, "Task {} has no available transitions.", self.task_id);
        }
        writeln!(f, "Task {} can move to:", self.task_id)?;
        writeln!(f)?;
        for status in &self.statuses {
            writeln!(f, "- {} (`{status}`)", status.with_icon())?;
        }
        Ok(())
    }
}
