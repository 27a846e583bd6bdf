//! Task operations for the Planner.
//!
//! Reads go straight to the database. Every status change goes through
//! [`TaskOrchestrator`].

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{EntityKind, Task, TaskStatus},
    orchestrator::TaskOrchestrator,
    params::{BlockTask, CompleteTask, CreateTask, Id, ListTasks, StartTask, TransitionTask},
};

impl Planner {
    /// Creates a task in `backlog` status.
    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        let priority = params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.create_task(
                &params.plan_id,
                &params.title,
                params.description.as_deref(),
                params.milestone_id.as_deref(),
                priority,
                params.estimated_hours,
            )
        })
        .await
    }

    /// Retrieves a task by its ID.
    pub async fn get_task(&self, params: &Id) -> Result<Option<Task>> {
        let task_id = params.id.clone();
        self.with_db(move |db| db.get_task(&task_id)).await
    }

    /// Lists a plan's tasks, optionally restricted to one status.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<Vec<Task>> {
        let status = params.validate()?;
        let plan_id = params.plan_id.clone();

        self.with_db(move |db| {
            if !db.plan_exists(&plan_id)? {
                return Err(PlannerError::not_found(EntityKind::Plan, &plan_id));
            }
            db.list_tasks(&plan_id, status)
        })
        .await
    }

    /// Moves a task to any status its lifecycle allows.
    pub async fn transition_task(&self, params: &TransitionTask) -> Result<Task> {
        let new_status = params.validate()?;
        let task_id = params.id.clone();

        self.with_db(move |db| TaskOrchestrator::new(db).transition(&task_id, new_status))
            .await
    }

    /// Starts work on a task, passing through `ready` when still in backlog.
    pub async fn start_task(&self, params: &StartTask) -> Result<Task> {
        let task_id = params.id.clone();
        let notes = params.notes.clone();

        self.with_db(move |db| TaskOrchestrator::new(db).start_task(&task_id, notes.as_deref()))
            .await
    }

    /// Completes a task under review.
    pub async fn complete_task(&self, params: &CompleteTask) -> Result<Task> {
        params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            TaskOrchestrator::new(db).complete_task(
                &params.id,
                &params.summary,
                params.actual_hours,
            )
        })
        .await
    }

    /// Blocks a task, recording the reason.
    pub async fn block_task(&self, params: &BlockTask) -> Result<Task> {
        params.validate()?;
        let params = params.clone();

        self.with_db(move |db| TaskOrchestrator::new(db).block_task(&params.id, &params.reason))
            .await
    }

    /// Resumes a blocked task.
    pub async fn unblock_task(&self, params: &Id) -> Result<Task> {
        let task_id = params.id.clone();
        self.with_db(move |db| TaskOrchestrator::new(db).unblock_task(&task_id))
            .await
    }

    /// Cancels a task.
    pub async fn cancel_task(&self, params: &Id) -> Result<Task> {
        let task_id = params.id.clone();
        self.with_db(move |db| TaskOrchestrator::new(db).cancel_task(&task_id))
            .await
    }

    /// Statuses the task may move to next. Empty when the task is missing.
    pub async fn available_transitions(&self, params: &Id) -> Result<Vec<TaskStatus>> {
        let task_id = params.id.clone();
        self.with_db(move |db| TaskOrchestrator::new(db).available_transitions(&task_id))
            .await
    }

    /// Permanently deletes a task and every dependency edge touching it.
    pub async fn delete_task(&self, params: &Id) -> Result<Task> {
        let task_id = params.id.clone();
        self.with_db(move |db| db.delete_task(&task_id)).await
    }
}
