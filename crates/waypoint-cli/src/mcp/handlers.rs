//! MCP tool handlers implementation
//!
//! Each handler runs one planner operation and renders the outcome as the
//! same markdown the CLI prints. The tool router in the parent module wraps
//! the text into a tool result.

use std::{fmt::Write, sync::Arc};

use log::debug;
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use waypoint_core::{
    display::{
        Chain, CreateResult, DeleteResult, Items, OperationStatus, Plans, Tasks, Transitions,
        UpdateResult,
    },
    models::EntityRef,
    params as core, Planner,
};

use super::errors::to_mcp_error;

/// Generic MCP wrapper for core parameter types
///
/// Adds JSON deserialization and schema generation to any core parameter
/// type without putting rmcp concerns on the core types themselves.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T);

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreatePlan = McpParams<core::CreatePlan>;
pub type ListPlans = McpParams<core::ListPlans>;
pub type TransitionPlan = McpParams<core::TransitionPlan>;
pub type CreateItem = McpParams<core::CreateItem>;
pub type ItemRef = McpParams<core::ItemRef>;
pub type ListItems = McpParams<core::ListItems>;
pub type CreateTask = McpParams<core::CreateTask>;
pub type ListTasks = McpParams<core::ListTasks>;
pub type TransitionTask = McpParams<core::TransitionTask>;
pub type StartTask = McpParams<core::StartTask>;
pub type CompleteTask = McpParams<core::CompleteTask>;
pub type BlockTask = McpParams<core::BlockTask>;
pub type Entity = McpParams<core::Entity>;
pub type DependencyEnds = McpParams<core::DependencyEnds>;
pub type AddDependency = McpParams<core::AddDependency>;
pub type DependencyChain = McpParams<core::DependencyChain>;

pub type HandlerResult = Result<String, McpError>;

fn entity_list(heading: &str, entities: &[EntityRef]) -> String {
    let mut out = format!("# {heading}\n\n");
    if entities.is_empty() {
        out.push_str("None.\n");
    }
    for entity in entities {
        let _ = writeln!(out, "- {entity}");
    }
    out
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    planner: Arc<Mutex<Planner>>,
}

impl McpHandlers {
    pub fn new(planner: Arc<Mutex<Planner>>) -> Self {
        Self { planner }
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    pub async fn create_plan(&self, params: &core::CreatePlan) -> HandlerResult {
        debug!("create_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .create_plan(params)
            .await
            .map_err(|e| to_mcp_error("Failed to create plan", &e))?;
        Ok(CreateResult::new(plan).to_string())
    }

    pub async fn list_plans(&self, params: &core::ListPlans) -> HandlerResult {
        debug!("list_plans: {params:?}");
        let plans = self
            .planner
            .lock()
            .await
            .list_plans(params)
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;
        let title = match &params.status {
            Some(status) => format!("Plans ({status})"),
            None => "Plans".to_string(),
        };
        Ok(format!("# {title}\n\n{}", Plans(plans)))
    }

    pub async fn show_plan(&self, params: &core::Id) -> HandlerResult {
        debug!("show_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .get_plan(params)
            .await
            .map_err(|e| to_mcp_error("Failed to get plan", &e))?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Plan with ID {} not found", params.id), None)
            })?;
        Ok(plan.to_string())
    }

    pub async fn transition_plan(&self, params: &core::TransitionPlan) -> HandlerResult {
        debug!("transition_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .transition_plan(params)
            .await
            .map_err(|e| to_mcp_error("Failed to transition plan", &e))?;
        let change = format!("Status: {}", plan.status);
        Ok(UpdateResult::with_changes(plan, vec![change]).to_string())
    }

    pub async fn delete_plan(&self, params: &core::Id) -> HandlerResult {
        debug!("delete_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .delete_plan(params)
            .await
            .map_err(|e| to_mcp_error("Failed to delete plan", &e))?;
        Ok(DeleteResult::new(plan).to_string())
    }

    // ------------------------------------------------------------------
    // Goals, objectives and milestones
    // ------------------------------------------------------------------

    pub async fn add_item(&self, params: &core::CreateItem) -> HandlerResult {
        debug!("add_item: {params:?}");
        let item = self
            .planner
            .lock()
            .await
            .create_item(params)
            .await
            .map_err(|e| to_mcp_error("Failed to add item", &e))?;
        Ok(CreateResult::new(item).to_string())
    }

    pub async fn list_items(&self, params: &core::ListItems) -> HandlerResult {
        debug!("list_items: {params:?}");
        let items = self
            .planner
            .lock()
            .await
            .list_items(params)
            .await
            .map_err(|e| to_mcp_error("Failed to list items", &e))?;
        Ok(Items(items).to_string())
    }

    pub async fn show_item(&self, params: &core::ItemRef) -> HandlerResult {
        debug!("show_item: {params:?}");
        let item = self
            .planner
            .lock()
            .await
            .get_item(params)
            .await
            .map_err(|e| to_mcp_error("Failed to get item", &e))?
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!("{} with ID {} not found", params.kind, params.id),
                    None,
                )
            })?;
        Ok(format!("{item}\n"))
    }

    pub async fn delete_item(&self, params: &core::ItemRef) -> HandlerResult {
        debug!("delete_item: {params:?}");
        let item = self
            .planner
            .lock()
            .await
            .delete_item(params)
            .await
            .map_err(|e| to_mcp_error("Failed to delete item", &e))?;
        Ok(DeleteResult::new(item).to_string())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn create_task(&self, params: &core::CreateTask) -> HandlerResult {
        debug!("create_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .create_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to create task", &e))?;
        Ok(CreateResult::new(task).to_string())
    }

    pub async fn list_tasks(&self, params: &core::ListTasks) -> HandlerResult {
        debug!("list_tasks: {params:?}");
        let tasks = self
            .planner
            .lock()
            .await
            .list_tasks(params)
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;
        Ok(Tasks(tasks).to_string())
    }

    pub async fn show_task(&self, params: &core::Id) -> HandlerResult {
        debug!("show_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .get_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to get task", &e))?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Task with ID {} not found", params.id), None)
            })?;
        Ok(task.to_string())
    }

    pub async fn transition_task(&self, params: &core::TransitionTask) -> HandlerResult {
        debug!("transition_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .transition_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to transition task", &e))?;
        Ok(status_change(task))
    }

    pub async fn start_task(&self, params: &core::StartTask) -> HandlerResult {
        debug!("start_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .start_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to start task", &e))?;
        Ok(status_change(task))
    }

    pub async fn complete_task(&self, params: &core::CompleteTask) -> HandlerResult {
        debug!("complete_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .complete_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to complete task", &e))?;
        Ok(status_change(task))
    }

    pub async fn block_task(&self, params: &core::BlockTask) -> HandlerResult {
        debug!("block_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .block_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to block task", &e))?;
        Ok(status_change(task))
    }

    pub async fn unblock_task(&self, params: &core::Id) -> HandlerResult {
        debug!("unblock_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .unblock_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to unblock task", &e))?;
        Ok(status_change(task))
    }

    pub async fn cancel_task(&self, params: &core::Id) -> HandlerResult {
        debug!("cancel_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .cancel_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to cancel task", &e))?;
        Ok(status_change(task))
    }

    pub async fn available_transitions(&self, params: &core::Id) -> HandlerResult {
        debug!("available_transitions: {params:?}");
        let statuses = self
            .planner
            .lock()
            .await
            .available_transitions(params)
            .await
            .map_err(|e| to_mcp_error("Failed to look up transitions", &e))?;
        Ok(Transitions {
            task_id: params.id.clone(),
            statuses,
        }
        .to_string())
    }

    pub async fn delete_task(&self, params: &core::Id) -> HandlerResult {
        debug!("delete_task: {params:?}");
        let task = self
            .planner
            .lock()
            .await
            .delete_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to delete task", &e))?;
        Ok(DeleteResult::new(task).to_string())
    }

    // ------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------

    pub async fn add_dependency(&self, params: &core::AddDependency) -> HandlerResult {
        debug!("add_dependency: {params:?}");
        let dependency = self
            .planner
            .lock()
            .await
            .add_dependency(params)
            .await
            .map_err(|e| to_mcp_error("Failed to add dependency", &e))?;
        Ok(format!(
            "Added dependency with ID: {}\n\n{dependency}\n",
            dependency.id
        ))
    }

    pub async fn remove_dependency(&self, params: &core::DependencyEnds) -> HandlerResult {
        debug!("remove_dependency: {params:?}");
        self.planner
            .lock()
            .await
            .remove_dependency(params)
            .await
            .map_err(|e| to_mcp_error("Failed to remove dependency", &e))?;
        Ok(OperationStatus::success(format!(
            "Removed dependency {}:{} -> {}:{}",
            params.source_kind, params.source_id, params.target_kind, params.target_id
        ))
        .to_string())
    }

    pub async fn list_dependencies(&self, params: &core::Entity) -> HandlerResult {
        debug!("list_dependencies: {params:?}");
        let listing = self
            .planner
            .lock()
            .await
            .list_dependencies(params)
            .await
            .map_err(|e| to_mcp_error("Failed to list dependencies", &e))?;
        Ok(listing.to_string())
    }

    pub async fn blockers(&self, params: &core::Entity) -> HandlerResult {
        debug!("get_blockers: {params:?}");
        let blockers = self
            .planner
            .lock()
            .await
            .blockers(params)
            .await
            .map_err(|e| to_mcp_error("Failed to get blockers", &e))?;
        Ok(entity_list(
            &format!("Blockers of {}:{}", params.kind, params.id),
            &blockers,
        ))
    }

    pub async fn blocked(&self, params: &core::Entity) -> HandlerResult {
        debug!("get_blocked: {params:?}");
        let blocked = self
            .planner
            .lock()
            .await
            .blocked(params)
            .await
            .map_err(|e| to_mcp_error("Failed to get blocked entities", &e))?;
        Ok(entity_list(
            &format!("Blocked by {}:{}", params.kind, params.id),
            &blocked,
        ))
    }

    pub async fn dependency_chain(&self, params: &core::DependencyChain) -> HandlerResult {
        debug!("dependency_chain: {params:?}");
        let (origin, direction, _) = params
            .validate()
            .map_err(|e| to_mcp_error("Invalid chain request", &e))?;
        let entries = self
            .planner
            .lock()
            .await
            .dependency_chain(params)
            .await
            .map_err(|e| to_mcp_error("Failed to walk dependency chain", &e))?;
        Ok(Chain {
            origin,
            direction,
            entries,
        }
        .to_string())
    }

    pub async fn would_create_cycle(&self, params: &core::DependencyEnds) -> HandlerResult {
        debug!("would_create_cycle: {params:?}");
        let cycle = self
            .planner
            .lock()
            .await
            .would_create_cycle(params)
            .await
            .map_err(|e| to_mcp_error("Failed to check for cycles", &e))?;
        let answer = if cycle {
            "Yes: adding this blocking dependency would create a cycle."
        } else {
            "No: this blocking dependency can be added without creating a cycle."
        };
        Ok(format!("{answer}\n"))
    }

    pub async fn can_start(&self, params: &core::Entity) -> HandlerResult {
        debug!("can_start: {params:?}");
        let check = self
            .planner
            .lock()
            .await
            .can_start(params)
            .await
            .map_err(|e| to_mcp_error("Failed to check blockers", &e))?;
        Ok(check.to_string())
    }

    pub async fn count_dependencies(&self, params: &core::Entity) -> HandlerResult {
        debug!("count_dependencies: {params:?}");
        let count = self
            .planner
            .lock()
            .await
            .count_dependencies(params)
            .await
            .map_err(|e| to_mcp_error("Failed to count dependencies", &e))?;
        Ok(format!(
            "{}:{} has {} dependencies ({} as source, {} as target)\n",
            params.kind,
            params.id,
            count.total(),
            count.as_source,
            count.as_target
        ))
    }
}

fn status_change(task: waypoint_core::Task) -> String {
    let change = format!("Status: {}", task.status);
    UpdateResult::with_changes(task, vec![change]).to_string()
}
