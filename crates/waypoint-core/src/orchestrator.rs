//! Task orchestration: the only code path that writes task status.
//!
//! Every status change is validated by the task lifecycle table before it
//! reaches storage. Composite actions (start, complete, block, unblock,
//! cancel) are built from [`TaskOrchestrator::transition`] plus follow-up
//! writes to the task's context log.
//!
//! Context appends run strictly after the status write has committed and
//! are not part of the same transaction. A failed append is logged and
//! otherwise ignored, so the status change still stands.

use crate::{
    db::Database,
    error::{PlannerError, Result},
    lifecycle::Lifecycle,
    models::{ContextEntry, ContextKind, EntityKind, Task, TaskStatus},
};

/// Composes the task lifecycle with the entity store.
pub struct TaskOrchestrator<'db> {
    db: &'db mut Database,
}

impl<'db> TaskOrchestrator<'db> {
    pub fn new(db: &'db mut Database) -> Self {
        Self { db }
    }

    fn load(&self, task_id: &str) -> Result<Task> {
        self.db
            .get_task(task_id)?
            .ok_or_else(|| PlannerError::not_found(EntityKind::Task, task_id))
    }

    /// Moves a task to `new_status` if the lifecycle allows it.
    pub fn transition(&mut self, task_id: &str, new_status: TaskStatus) -> Result<Task> {
        let task = self.load(task_id)?;
        let from = task.status;
        from.transition(new_status)?;

        let updated = self.db.set_task_status(task_id, new_status)?;

        match from.trigger_name(new_status) {
            Some(trigger) => log::info!("Task {task_id}: {trigger} ({from} -> {new_status})"),
            None => log::info!("Task {task_id}: {from} -> {new_status}"),
        }

        Ok(updated)
    }

    /// Starts work on a task.
    ///
    /// A task still in `backlog` is first moved to `ready`, and that step
    /// stays committed even if the move to `in_progress` then fails.
    pub fn start_task(&mut self, task_id: &str, notes: Option<&str>) -> Result<Task> {
        let task = self.load(task_id)?;
        if task.status == TaskStatus::Backlog {
            self.transition(task_id, TaskStatus::Ready)?;
        }

        let task = self.transition(task_id, TaskStatus::InProgress)?;
        Ok(self.record(task, ContextKind::Note, notes))
    }

    /// Approves a task under review, recording a summary and optionally the
    /// hours actually spent.
    pub fn complete_task(
        &mut self,
        task_id: &str,
        summary: &str,
        actual_hours: Option<f64>,
    ) -> Result<Task> {
        let task = self.load(task_id)?;
        if task.status != TaskStatus::Review {
            return Err(PlannerError::InvalidTransition {
                message: "Task must be in review to complete".to_string(),
            });
        }

        let task = self.transition(task_id, TaskStatus::Completed)?;
        let task = self.record(task, ContextKind::Summary, Some(summary));

        match actual_hours {
            Some(hours) => match self.db.set_actual_hours(task_id, hours) {
                Ok(updated) => Ok(updated),
                Err(e) => {
                    log::warn!("Failed to record actual hours for task {task_id}: {e}");
                    Ok(task)
                }
            },
            None => Ok(task),
        }
    }

    /// Blocks a task, recording why.
    pub fn block_task(&mut self, task_id: &str, reason: &str) -> Result<Task> {
        let task = self.transition(task_id, TaskStatus::Blocked)?;
        Ok(self.record(task, ContextKind::Blocker, Some(reason)))
    }

    /// Resumes a blocked task. Only `blocked -> in_progress` is accepted here;
    /// sending a blocked task back to `ready` goes through [`Self::transition`].
    pub fn unblock_task(&mut self, task_id: &str) -> Result<Task> {
        let task = self.load(task_id)?;
        if task.status != TaskStatus::Blocked {
            return Err(PlannerError::InvalidTransition {
                message: format!("Task must be blocked to unblock, but is {}", task.status),
            });
        }
        self.transition(task_id, TaskStatus::InProgress)
    }

    /// Cancels a task from any non-terminal status.
    pub fn cancel_task(&mut self, task_id: &str) -> Result<Task> {
        self.transition(task_id, TaskStatus::Cancelled)
    }

    /// Statuses the task may move to next. Empty when the task is missing.
    pub fn available_transitions(&self, task_id: &str) -> Result<Vec<TaskStatus>> {
        Ok(self
            .db
            .get_task(task_id)?
            .map(|task| task.status.allowed_transitions().to_vec())
            .unwrap_or_default())
    }

    /// Best-effort context append after a committed status change.
    fn record(&mut self, task: Task, kind: ContextKind, message: Option<&str>) -> Task {
        let Some(message) = message.filter(|m| !m.trim().is_empty()) else {
            return task;
        };

        match self.db.append_context(&task.id, ContextEntry::new(kind, message)) {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("Failed to append {} to task {}: {e}", kind.as_str(), task.id);
                task
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskPriority;

    fn setup() -> (Database, String) {
        let mut db = Database::in_memory().unwrap();
        let plan = db.create_plan("Plan", None, None).unwrap();
        let task = db
            .create_task(&plan.id, "Task", None, None, TaskPriority::Medium, None)
            .unwrap();
        (db, task.id)
    }

    #[test]
    fn test_transition_rejects_invalid_move() {
        let (mut db, id) = setup();
        let mut orchestrator = TaskOrchestrator::new(&mut db);

        let err = orchestrator
            .transition(&id, TaskStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "Invalid transition from backlog to completed");
        assert_eq!(db.get_task(&id).unwrap().unwrap().status, TaskStatus::Backlog);
    }

    #[test]
    fn test_transition_missing_task() {
        let mut db = Database::in_memory().unwrap();
        let err = TaskOrchestrator::new(&mut db)
            .transition("missing", TaskStatus::Ready)
            .unwrap_err();
        assert!(matches!(err, PlannerError::NotFound { .. }));
    }

    #[test]
    fn test_start_from_backlog_goes_through_ready() {
        let (mut db, id) = setup();
        let task = TaskOrchestrator::new(&mut db)
            .start_task(&id, Some("picking this up"))
            .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.started_at.is_some());
        assert_eq!(task.context.len(), 1);
        assert_eq!(task.context[0].kind, ContextKind::Note);
    }

    #[test]
    fn test_start_resumes_task_sent_back_from_review() {
        let (mut db, id) = setup();
        let mut orchestrator = TaskOrchestrator::new(&mut db);
        orchestrator.start_task(&id, None).unwrap();
        orchestrator.transition(&id, TaskStatus::Review).unwrap();

        let task = orchestrator.start_task(&id, None).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_start_cancelled_task_fails() {
        let (mut db, id) = setup();
        TaskOrchestrator::new(&mut db).cancel_task(&id).unwrap();

        let err = TaskOrchestrator::new(&mut db)
            .start_task(&id, None)
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidTransition { .. }));
        assert_eq!(
            db.get_task(&id).unwrap().unwrap().status,
            TaskStatus::Cancelled
        );
    }

    #[test]
    fn test_complete_requires_review() {
        let (mut db, id) = setup();
        let mut orchestrator = TaskOrchestrator::new(&mut db);
        orchestrator.start_task(&id, None).unwrap();

        let err = orchestrator.complete_task(&id, "done", None).unwrap_err();
        assert_eq!(err.to_string(), "Task must be in review to complete");

        orchestrator.transition(&id, TaskStatus::Review).unwrap();
        let task = orchestrator.complete_task(&id, "done", Some(3.0)).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.actual_hours, Some(3.0));
        assert!(task.completed_at.is_some());
        assert_eq!(task.context.last().unwrap().kind, ContextKind::Summary);
    }

    #[test]
    fn test_block_and_unblock() {
        let (mut db, id) = setup();
        let mut orchestrator = TaskOrchestrator::new(&mut db);
        let started = orchestrator.start_task(&id, None).unwrap();

        let blocked = orchestrator.block_task(&id, "waiting on API keys").unwrap();
        assert_eq!(blocked.status, TaskStatus::Blocked);
        assert_eq!(blocked.context[0].message, "waiting on API keys");

        let resumed = orchestrator.unblock_task(&id).unwrap();
        assert_eq!(resumed.status, TaskStatus::InProgress);
        assert_eq!(resumed.started_at, started.started_at);

        assert!(orchestrator.unblock_task(&id).is_err());
    }

    #[test]
    fn test_cancel_is_terminal() {
        let (mut db, id) = setup();
        let mut orchestrator = TaskOrchestrator::new(&mut db);
        orchestrator.cancel_task(&id).unwrap();

        assert!(orchestrator.available_transitions(&id).unwrap().is_empty());
        assert!(orchestrator.cancel_task(&id).is_err());
    }

    #[test]
    fn test_available_transitions() {
        let (mut db, id) = setup();
        let orchestrator = TaskOrchestrator::new(&mut db);

        assert_eq!(
            orchestrator.available_transitions(&id).unwrap(),
            vec![TaskStatus::Ready, TaskStatus::Cancelled]
        );
        assert!(orchestrator
            .available_transitions("missing")
            .unwrap()
            .is_empty());
    }
}
