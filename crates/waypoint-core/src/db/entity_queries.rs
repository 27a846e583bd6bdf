//! Kind-agnostic lookups over any entity reference.

use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{EntityKind, EntityRef, PlanStatus, TaskStatus},
};

const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const SELECT_TASK_STATUS_SQL: &str = "SELECT status FROM tasks WHERE id = ?1";
const SELECT_PLAN_STATUS_SQL: &str = "SELECT status FROM plans WHERE id = ?1";

impl super::Database {
    /// Checks whether a plan with the given ID exists.
    pub fn plan_exists(&self, id: &str) -> Result<bool> {
        self.connection
            .query_row(CHECK_PLAN_EXISTS_SQL, params![id], |row| row.get(0))
            .db_context("Failed to check plan existence")
    }

    /// Checks whether the referenced entity exists.
    pub fn entity_exists(&self, entity: &EntityRef) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
            entity.kind.table()
        );
        self.connection
            .query_row(&sql, params![&entity.id], |row| row.get(0))
            .db_context("Failed to check entity existence")
    }

    /// Plan that scopes the referenced entity. A plan scopes itself.
    /// Returns `None` when the entity does not exist.
    pub fn entity_plan_id(&self, entity: &EntityRef) -> Result<Option<String>> {
        match entity.kind {
            EntityKind::Plan => Ok(self.plan_exists(&entity.id)?.then(|| entity.id.clone())),
            EntityKind::Goal | EntityKind::Objective | EntityKind::Milestone | EntityKind::Task => {
                let sql = format!("SELECT plan_id FROM {} WHERE id = ?1", entity.kind.table());
                self.connection
                    .query_row(&sql, params![&entity.id], |row| row.get(0))
                    .optional()
                    .db_context("Failed to look up entity plan")
            }
        }
    }

    /// Whether the referenced entity no longer holds back what it blocks.
    ///
    /// Tasks resolve once completed or cancelled, plans once completed or
    /// archived. Goals, objectives and milestones have no status and always
    /// count as resolved, as does a reference to a missing entity.
    pub fn entity_resolved(&self, entity: &EntityRef) -> Result<bool> {
        let resolved = match entity.kind {
            EntityKind::Task => self
                .connection
                .query_row(SELECT_TASK_STATUS_SQL, params![&entity.id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()
                .db_context("Failed to query task status")?
                .map(|status| {
                    status
                        .parse::<TaskStatus>()
                        .map(|s| s.is_resolved())
                        .unwrap_or(false)
                }),
            EntityKind::Plan => self
                .connection
                .query_row(SELECT_PLAN_STATUS_SQL, params![&entity.id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()
                .db_context("Failed to query plan status")?
                .map(|status| {
                    status
                        .parse::<PlanStatus>()
                        .map(|s| s.is_resolved())
                        .unwrap_or(false)
                }),
            EntityKind::Goal | EntityKind::Objective | EntityKind::Milestone => Some(true),
        };

        Ok(resolved.unwrap_or_else(|| {
            log::debug!("Blocker {entity} no longer exists, treating as resolved");
            true
        }))
    }
}
