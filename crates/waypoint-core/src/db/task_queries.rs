//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use super::utils::{enum_column, new_id, optional_timestamp_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{ContextEntry, EntityKind, Task, TaskPriority, TaskStatus},
};

const TASK_COLUMNS: &str = "id, plan_id, milestone_id, title, description, status, priority, estimated_hours, actual_hours, context, started_at, completed_at, created_at, updated_at";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (id, plan_id, milestone_id, title, description, status, priority, estimated_hours, context, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, '[]', ?9, ?10)";
const SELECT_MILESTONE_PLAN_SQL: &str = "SELECT plan_id FROM milestones WHERE id = ?1";
const UPDATE_PLAN_TIMESTAMP_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";
const UPDATE_TASK_STATUS_SQL: &str = "UPDATE tasks SET status = ?1, updated_at = ?2, started_at = CASE WHEN ?1 = 'in_progress' THEN COALESCE(started_at, ?2) ELSE started_at END, completed_at = CASE WHEN ?1 = 'completed' THEN COALESCE(completed_at, ?2) ELSE completed_at END WHERE id = ?3";
const SELECT_TASK_CONTEXT_SQL: &str = "SELECT context FROM tasks WHERE id = ?1";
const UPDATE_TASK_CONTEXT_SQL: &str = "UPDATE tasks SET context = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_ACTUAL_HOURS_SQL: &str =
    "UPDATE tasks SET actual_hours = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

impl super::Database {
    fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let context_json: String = row.get(9)?;
        let context = serde_json::from_str::<Vec<ContextEntry>>(&context_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

        Ok(Task {
            id: row.get(0)?,
            plan_id: row.get(1)?,
            milestone_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            status: enum_column(row, 5)?,
            priority: enum_column(row, 6)?,
            estimated_hours: row.get(7)?,
            actual_hours: row.get(8)?,
            context,
            started_at: optional_timestamp_column(row, 10)?,
            completed_at: optional_timestamp_column(row, 11)?,
            created_at: timestamp_column(row, 12)?,
            updated_at: timestamp_column(row, 13)?,
        })
    }

    /// Creates a task in `backlog` status.
    ///
    /// When a milestone is given it must exist and belong to the same plan.
    pub fn create_task(
        &mut self,
        plan_id: &str,
        title: &str,
        description: Option<&str>,
        milestone_id: Option<&str>,
        priority: TaskPriority,
        estimated_hours: Option<f64>,
    ) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let plan_exists: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)",
                params![plan_id],
                |row| row.get(0),
            )
            .db_context("Failed to check plan existence")?;
        if !plan_exists {
            return Err(PlannerError::not_found(EntityKind::Plan, plan_id));
        }

        if let Some(milestone_id) = milestone_id {
            let milestone_plan: Option<String> = tx
                .query_row(SELECT_MILESTONE_PLAN_SQL, params![milestone_id], |row| {
                    row.get(0)
                })
                .optional()
                .db_context("Failed to look up milestone")?;
            match milestone_plan {
                None => return Err(PlannerError::not_found(EntityKind::Milestone, milestone_id)),
                Some(owner) if owner != plan_id => {
                    return Err(PlannerError::invalid_input("milestone_id")
                        .with_reason(format!("Milestone {milestone_id} belongs to another plan")));
                }
                Some(_) => {}
            }
        }

        let id = new_id();
        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_TASK_SQL,
            params![
                &id,
                plan_id,
                milestone_id,
                title,
                description,
                TaskStatus::Backlog.as_str(),
                priority.as_str(),
                estimated_hours,
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert task")?;

        tx.execute(UPDATE_PLAN_TIMESTAMP_SQL, params![&now_str, plan_id])
            .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Task {
            id,
            plan_id: plan_id.into(),
            milestone_id: milestone_id.map(String::from),
            title: title.into(),
            description: description.map(String::from),
            status: TaskStatus::Backlog,
            priority,
            estimated_hours,
            actual_hours: None,
            context: Vec::new(),
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.connection
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                Self::build_task_from_row,
            )
            .optional()
            .db_context("Failed to query task")
    }

    /// Lists a plan's tasks, optionally restricted to one status, oldest first.
    pub fn list_tasks(&self, plan_id: &str, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let sql = match status {
            Some(_) => format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE plan_id = ?1 AND status = ?2 ORDER BY rowid"
            ),
            None => format!("SELECT {TASK_COLUMNS} FROM tasks WHERE plan_id = ?1 ORDER BY rowid"),
        };

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let rows = match status {
            Some(status) => {
                stmt.query_map(params![plan_id, status.as_str()], Self::build_task_from_row)
            }
            None => stmt.query_map(params![plan_id], Self::build_task_from_row),
        }
        .db_context("Failed to query tasks")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch tasks")
    }

    /// Writes a new task status without validating it.
    ///
    /// Entering `in_progress` stamps `started_at` and entering `completed`
    /// stamps `completed_at`, each only the first time.
    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<Task> {
        let now_str = Timestamp::now().to_string();
        let affected = self
            .connection
            .execute(UPDATE_TASK_STATUS_SQL, params![status.as_str(), &now_str, id])
            .db_context("Failed to update task status")?;

        if affected == 0 {
            return Err(PlannerError::not_found(EntityKind::Task, id));
        }

        self.get_task(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, id))
    }

    /// Appends one entry to the task's context log.
    pub fn append_context(&mut self, id: &str, entry: ContextEntry) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let context_json: String = tx
            .query_row(SELECT_TASK_CONTEXT_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to read task context")?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, id))?;

        let mut context: Vec<ContextEntry> = serde_json::from_str(&context_json)?;
        context.push(entry);

        tx.execute(
            UPDATE_TASK_CONTEXT_SQL,
            params![serde_json::to_string(&context)?, Timestamp::now().to_string(), id],
        )
        .db_context("Failed to update task context")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_task(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, id))
    }

    /// Records the effort actually spent on a task.
    pub fn set_actual_hours(&mut self, id: &str, hours: f64) -> Result<Task> {
        let affected = self
            .connection
            .execute(
                UPDATE_ACTUAL_HOURS_SQL,
                params![hours, Timestamp::now().to_string(), id],
            )
            .db_context("Failed to update actual hours")?;

        if affected == 0 {
            return Err(PlannerError::not_found(EntityKind::Task, id));
        }

        self.get_task(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, id))
    }

    /// Deletes a task together with every dependency edge touching it.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self
            .get_task(id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, id))?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let removed = Self::delete_edges_in(&tx, &task.entity_ref())?;
        tx.execute(DELETE_TASK_SQL, params![id])
            .db_context("Failed to delete task")?;

        tx.commit().db_context("Failed to commit transaction")?;

        log::debug!("Deleted task {id} and {removed} dependencies");
        Ok(task)
    }
}
