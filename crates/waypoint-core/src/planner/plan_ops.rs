//! Plan and plan item operations for the Planner.

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    lifecycle::Lifecycle,
    models::{EntityKind, Plan, PlanItem, PlanStatus},
    params::{CreateItem, CreatePlan, Id, ItemRef, ListItems, ListPlans, TransitionPlan},
};

impl Planner {
    /// Creates a new plan in `draft` status.
    ///
    /// A relative directory is resolved against the current working directory
    /// and stored as an absolute path.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        params.validate()?;
        let title = params.title.clone();
        let description = params.description.clone();
        let directory = params.directory.clone();

        self.with_db(move |db| {
            db.create_plan(&title, description.as_deref(), directory.as_deref())
        })
        .await
    }

    /// Retrieves a plan with its items and tasks loaded.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let plan_id = params.id.clone();
        self.with_db(move |db| db.get_plan_with_contents(&plan_id))
            .await
    }

    /// Lists plans, optionally restricted to one status.
    pub async fn list_plans(&self, params: &ListPlans) -> Result<Vec<Plan>> {
        let status = params.validate()?;
        self.with_db(move |db| db.list_plans(status)).await
    }

    /// Moves a plan to another status if its lifecycle allows it.
    pub async fn transition_plan(&self, params: &TransitionPlan) -> Result<Plan> {
        let new_status = params.validate()?;
        let plan_id = params.id.clone();

        self.with_db(move |db| {
            let plan = db
                .get_plan(&plan_id)?
                .ok_or_else(|| PlannerError::not_found(EntityKind::Plan, &plan_id))?;
            let from = plan.status;
            from.transition(new_status)?;

            let updated = db.set_plan_status(&plan_id, new_status)?;
            if let Some(trigger) = from.trigger_name(new_status) {
                log::info!("Plan {plan_id}: {trigger} ({from} -> {new_status})");
            }
            Ok(updated)
        })
        .await
    }

    /// Moves a draft plan to `active`.
    pub async fn activate_plan(&self, params: &Id) -> Result<Plan> {
        self.transition_plan_to(params, PlanStatus::Active).await
    }

    /// Moves an active plan to `completed`.
    pub async fn complete_plan(&self, params: &Id) -> Result<Plan> {
        self.transition_plan_to(params, PlanStatus::Completed).await
    }

    /// Moves an active or completed plan to `archived`.
    pub async fn archive_plan(&self, params: &Id) -> Result<Plan> {
        self.transition_plan_to(params, PlanStatus::Archived).await
    }

    async fn transition_plan_to(&self, params: &Id, status: PlanStatus) -> Result<Plan> {
        self.transition_plan(&TransitionPlan {
            id: params.id.clone(),
            status: status.as_str().to_string(),
        })
        .await
    }

    /// Permanently deletes a plan, its items, its tasks and every dependency
    /// edge touching any of them.
    pub async fn delete_plan(&self, params: &Id) -> Result<Plan> {
        let plan_id = params.id.clone();
        self.with_db(move |db| db.delete_plan(&plan_id)).await
    }

    /// Adds a goal, objective or milestone to a plan.
    pub async fn create_item(&self, params: &CreateItem) -> Result<PlanItem> {
        let kind = params.validate()?;
        let plan_id = params.plan_id.clone();
        let title = params.title.clone();
        let description = params.description.clone();

        self.with_db(move |db| db.create_item(kind, &plan_id, &title, description.as_deref()))
            .await
    }

    /// Retrieves a single goal, objective or milestone.
    pub async fn get_item(&self, params: &ItemRef) -> Result<Option<PlanItem>> {
        let kind = params.validate()?;
        let id = params.id.clone();
        self.with_db(move |db| db.get_item(kind, &id)).await
    }

    /// Lists a plan's goals, objectives and milestones.
    pub async fn list_items(&self, params: &ListItems) -> Result<Vec<PlanItem>> {
        let kind = params.validate()?;
        let plan_id = params.plan_id.clone();

        self.with_db(move |db| {
            if !db.plan_exists(&plan_id)? {
                return Err(PlannerError::not_found(EntityKind::Plan, &plan_id));
            }
            db.list_items(&plan_id, kind)
        })
        .await
    }

    /// Deletes an item and every dependency edge touching it.
    pub async fn delete_item(&self, params: &ItemRef) -> Result<PlanItem> {
        let kind = params.validate()?;
        let id = params.id.clone();
        self.with_db(move |db| db.delete_item(kind, &id)).await
    }
}
