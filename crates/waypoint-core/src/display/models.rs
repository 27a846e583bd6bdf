//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to keep data structures and
//! presentation apart.
//!
//! Status enums render as their storage names so that error messages such as
//! "Invalid transition from backlog to completed" read the same everywhere.
//! Plans, tasks and dependency query results render as markdown.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    ChainEntry, ContextKind, Dependency, Direction, EntityDependencies, Plan, PlanItem,
    PlanStatus, StartCheck, Task, TaskPriority, TaskStatus,
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Status: {}", self.status)?;
        if let Some(dir) = &self.directory {
            writeln!(f, "- Directory: {dir}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.items.is_empty() {
            writeln!(f, "\n## Goals, objectives and milestones")?;
            writeln!(f)?;
            for item in &self.items {
                writeln!(f, "- {item}")?;
            }
        }

        if self.tasks.is_empty() {
            writeln!(f, "\nNo tasks in this plan.")?;
        } else {
            let done = self.tasks.iter().filter(|t| t.status.is_resolved()).count();
            writeln!(f, "\n## Tasks ({done}/{})", self.tasks.len())?;
            writeln!(f)?;
            for task in &self.tasks {
                task.fmt_line(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** {} (ID: {})", self.kind, self.title, self.id)?;
        if let Some(desc) = &self.description {
            write!(f, ": {desc}")?;
        }
        Ok(())
    }
}

impl Task {
    /// One-line list entry.
    pub(crate) fn fmt_line(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {} **{}** (ID: {}, priority: {})",
            self.status.with_icon(),
            self.title,
            self.id,
            self.priority
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.title, self.status.with_icon())?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Plan: {}", self.plan_id)?;
        if let Some(milestone) = &self.milestone_id {
            writeln!(f, "- Milestone: {milestone}")?;
        }
        writeln!(f, "- Priority: {}", self.priority)?;
        match (self.estimated_hours, self.actual_hours) {
            (Some(est), Some(actual)) => writeln!(f, "- Hours: {actual} of {est} estimated")?,
            (Some(est), None) => writeln!(f, "- Estimated hours: {est}")?,
            (None, Some(actual)) => writeln!(f, "- Actual hours: {actual}")?,
            (None, None) => {}
        }
        if let Some(started) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started))?;
        }
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        if !self.context.is_empty() {
            writeln!(f, "#### Context")?;
            writeln!(f)?;
            for entry in &self.context {
                writeln!(
                    f,
                    "- {} *{}*: {}",
                    LocalDateTime(&entry.recorded_at),
                    entry.kind,
                    entry.message
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} **{}** {}",
            self.source, self.dependency_type, self.target
        )
    }
}

impl fmt::Display for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}- {} (depth {}, via {})",
            "  ".repeat(self.depth.saturating_sub(1)),
            self.entity,
            self.depth,
            self.dependency_type
        )
    }
}

impl fmt::Display for StartCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.startable {
            return writeln!(f, "{} can start: all blockers are resolved.", self.entity);
        }

        writeln!(f, "{} cannot start yet. Unresolved blockers:", self.entity)?;
        writeln!(f)?;
        for blocker in &self.unresolved {
            writeln!(f, "- {blocker}")?;
        }
        Ok(())
    }
}

impl fmt::Display for EntityDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Dependencies of {}", self.entity)?;

        writeln!(f, "\n## Depends on")?;
        writeln!(f)?;
        if self.incoming.is_empty() {
            writeln!(f, "Nothing.")?;
        }
        for dep in &self.incoming {
            writeln!(f, "- {dep}")?;
        }

        writeln!(f, "\n## Depended on by")?;
        writeln!(f)?;
        if self.outgoing.is_empty() {
            writeln!(f, "Nothing.")?;
        }
        for dep in &self.outgoing {
            writeln!(f, "- {dep}")?;
        }

        Ok(())
    }
}
