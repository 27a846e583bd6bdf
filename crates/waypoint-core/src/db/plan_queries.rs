//! Plan CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::utils::{enum_column, ensure_absolute_directory, new_id, timestamp_column};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{EntityKind, Plan, PlanStatus},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (id, title, description, status, directory, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_PLAN_SQL: &str = "SELECT id, title, description, status, directory, created_at, updated_at FROM plans WHERE id = ?1";
const SELECT_ALL_PLANS_SQL: &str = "SELECT id, title, description, status, directory, created_at, updated_at FROM plans ORDER BY rowid";
const SELECT_PLANS_BY_STATUS_SQL: &str = "SELECT id, title, description, status, directory, created_at, updated_at FROM plans WHERE status = ?1 ORDER BY rowid";
const UPDATE_PLAN_STATUS_SQL: &str = "UPDATE plans SET status = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";
const DELETE_PLAN_EDGES_SQL: &str = "DELETE FROM dependencies WHERE (source_kind = ?1 AND source_id IN (SELECT id FROM {table} WHERE plan_id = ?2)) OR (target_kind = ?1 AND target_id IN (SELECT id FROM {table} WHERE plan_id = ?2))";

impl super::Database {
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
        Ok(Plan {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status: enum_column(row, 3)?,
            directory: row.get(4)?,
            created_at: timestamp_column(row, 5)?,
            updated_at: timestamp_column(row, 6)?,
            items: Vec::new(),
            tasks: Vec::new(),
        })
    }

    /// Creates a new plan in `draft` status. A relative directory is stored
    /// as an absolute path.
    pub fn create_plan(
        &mut self,
        title: &str,
        description: Option<&str>,
        directory: Option<&str>,
    ) -> Result<Plan> {
        let directory = ensure_absolute_directory(directory)?;
        let id = new_id();
        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_PLAN_SQL,
                params![
                    &id,
                    title,
                    description,
                    PlanStatus::Draft.as_str(),
                    directory.as_deref(),
                    &now_str,
                    &now_str
                ],
            )
            .db_context("Failed to insert plan")?;

        Ok(Plan {
            id,
            title: title.into(),
            description: description.map(String::from),
            status: PlanStatus::Draft,
            directory,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            tasks: Vec::new(),
        })
    }

    /// Retrieves a plan by its ID without its contents.
    pub fn get_plan(&self, id: &str) -> Result<Option<Plan>> {
        self.connection
            .query_row(SELECT_PLAN_SQL, params![id], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")
    }

    /// Retrieves a plan with its items and tasks eagerly loaded.
    pub fn get_plan_with_contents(&self, id: &str) -> Result<Option<Plan>> {
        let Some(mut plan) = self.get_plan(id)? else {
            return Ok(None);
        };
        plan.items = self.list_items(&plan.id, None)?;
        plan.tasks = self.list_tasks(&plan.id, None)?;
        Ok(Some(plan))
    }

    /// Lists plans, optionally restricted to one status, oldest first.
    pub fn list_plans(&self, status: Option<PlanStatus>) -> Result<Vec<Plan>> {
        let mut stmt = match status {
            Some(_) => self.connection.prepare(SELECT_PLANS_BY_STATUS_SQL),
            None => self.connection.prepare(SELECT_ALL_PLANS_SQL),
        }
        .db_context("Failed to prepare query")?;

        let rows = match status {
            Some(status) => stmt.query_map(params![status.as_str()], Self::build_plan_from_row),
            None => stmt.query_map([], Self::build_plan_from_row),
        }
        .db_context("Failed to query plans")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")
    }

    /// Writes a new plan status. Validation happens in the caller.
    pub fn set_plan_status(&mut self, id: &str, status: PlanStatus) -> Result<Plan> {
        let now_str = Timestamp::now().to_string();
        let affected = self
            .connection
            .execute(UPDATE_PLAN_STATUS_SQL, params![status.as_str(), &now_str, id])
            .db_context("Failed to update plan status")?;

        if affected == 0 {
            return Err(PlannerError::not_found(EntityKind::Plan, id));
        }

        self.get_plan(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Plan, id))
    }

    /// Deletes a plan, everything it owns and every dependency edge touching
    /// any of it.
    pub fn delete_plan(&mut self, id: &str) -> Result<Plan> {
        let plan = self
            .get_plan(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Plan, id))?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        for kind in [
            EntityKind::Goal,
            EntityKind::Objective,
            EntityKind::Milestone,
            EntityKind::Task,
        ] {
            let sql = DELETE_PLAN_EDGES_SQL.replace("{table}", kind.table());
            tx.execute(&sql, params![kind.as_str(), id])
                .db_context("Failed to delete plan content dependencies")?;
        }

        Self::delete_edges_in(&tx, &plan.entity_ref())?;

        tx.execute(DELETE_PLAN_SQL, params![id])
            .db_context("Failed to delete plan")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(plan)
    }
}
