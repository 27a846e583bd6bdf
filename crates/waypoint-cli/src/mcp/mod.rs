//! MCP server implementation for Waypoint
//!
//! Exposes plans, items, tasks and dependencies as Model Context Protocol
//! tools over stdio. Tool parameters are the core parameter types wrapped in
//! [`handlers::McpParams`]; enumerated fields arrive as strings and are
//! validated by the core.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use waypoint_core::Planner;

pub mod errors;
pub mod handlers;

use handlers::{
    AddDependency, BlockTask, CompleteTask, CreateItem, CreatePlan, CreateTask, DependencyChain,
    DependencyEnds, Entity, HandlerResult, Id, ItemRef, ListItems, ListPlans, ListTasks,
    McpHandlers, StartTask, TransitionPlan, TransitionTask,
};

pub type McpResult = Result<CallToolResult, McpError>;

fn reply(output: HandlerResult) -> McpResult {
    output.map(|text| CallToolResult::success(vec![Content::text(text)]))
}

const INSTRUCTIONS: &str = r#"Waypoint tracks plans and the work inside them.

## Core Concepts
- **Plans** move draft → active → completed → archived.
- **Goals, objectives and milestones** describe what a plan is for. They have no status of their own.
- **Tasks** carry the work: backlog → ready → in_progress → review → completed, with blocked and cancelled as side exits.
- **Dependencies** connect any two entities of the same plan. A `blocks` edge from A to B means B cannot start until A is resolved: a task once completed or cancelled, a plan once completed or archived. Goals, objectives and milestones never hold anything back.

Entities are addressed by kind ('plan', 'goal', 'objective', 'milestone', 'task') and ID.

## Typical Workflow
1. `create_plan`, then `add_item` for goals and milestones and `create_task` for the work.
2. Wire ordering with `add_dependency`. Cycles of blocking edges are rejected.
3. Before picking up a task call `can_start`, then `start_task`.
4. Move finished work to review with `transition_task` and close it with `complete_task`.
5. Use `block_task` / `unblock_task` when progress stalls, and `dependency_chain` to see what a change affects.

## Tool Categories
- **Plans**: create_plan, list_plans, show_plan, transition_plan, delete_plan
- **Items**: add_item, list_items, show_item, delete_item
- **Tasks**: create_task, list_tasks, show_task, transition_task, start_task, complete_task, block_task, unblock_task, cancel_task, available_transitions, delete_task
- **Dependencies**: add_dependency, remove_dependency, list_dependencies, get_blockers, get_blocked, dependency_chain, would_create_cycle, can_start, count_dependencies"#;

/// MCP server for Waypoint
#[derive(Clone)]
pub struct WaypointMcpServer {
    planner: Arc<Mutex<Planner>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WaypointMcpServer {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.planner.clone())
    }

    #[tool(
        name = "create_plan",
        description = "Create a new plan in draft status. Provide a clear title (required), an optional description and an optional working directory. Returns the plan ID used by every other tool."
    )]
    async fn create_plan(&self, Parameters(params): Parameters<CreatePlan>) -> McpResult {
        reply(self.handlers().create_plan(params.as_ref()).await)
    }

    #[tool(
        name = "list_plans",
        description = "List plans in creation order. Pass status ('draft', 'active', 'completed' or 'archived') to filter."
    )]
    async fn list_plans(&self, Parameters(params): Parameters<ListPlans>) -> McpResult {
        reply(self.handlers().list_plans(params.as_ref()).await)
    }

    #[tool(
        name = "show_plan",
        description = "Show a plan with its goals, objectives, milestones and tasks."
    )]
    async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().show_plan(params.as_ref()).await)
    }

    #[tool(
        name = "transition_plan",
        description = "Move a plan to another status. Allowed: draft → active, active → completed, and active or completed → archived."
    )]
    async fn transition_plan(&self, Parameters(params): Parameters<TransitionPlan>) -> McpResult {
        reply(self.handlers().transition_plan(params.as_ref()).await)
    }

    #[tool(
        name = "delete_plan",
        description = "Permanently delete a plan with all of its items, tasks and dependencies. This cannot be undone; consider archiving instead."
    )]
    async fn delete_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().delete_plan(params.as_ref()).await)
    }

    #[tool(
        name = "add_item",
        description = "Add a goal, objective or milestone to a plan. kind must be 'goal', 'objective' or 'milestone'."
    )]
    async fn add_item(&self, Parameters(params): Parameters<CreateItem>) -> McpResult {
        reply(self.handlers().add_item(params.as_ref()).await)
    }

    #[tool(
        name = "list_items",
        description = "List the goals, objectives and milestones of a plan, optionally filtered by kind."
    )]
    async fn list_items(&self, Parameters(params): Parameters<ListItems>) -> McpResult {
        reply(self.handlers().list_items(params.as_ref()).await)
    }

    #[tool(name = "show_item", description = "Show a goal, objective or milestone.")]
    async fn show_item(&self, Parameters(params): Parameters<ItemRef>) -> McpResult {
        reply(self.handlers().show_item(params.as_ref()).await)
    }

    #[tool(
        name = "delete_item",
        description = "Delete a goal, objective or milestone together with its dependencies. Tasks assigned to a deleted milestone are kept and detached."
    )]
    async fn delete_item(&self, Parameters(params): Parameters<ItemRef>) -> McpResult {
        reply(self.handlers().delete_item(params.as_ref()).await)
    }

    #[tool(
        name = "create_task",
        description = "Create a task in backlog status. Optional: description, milestone_id (must belong to the same plan), priority ('low', 'medium', 'high', 'critical'; default 'medium') and estimated_hours."
    )]
    async fn create_task(&self, Parameters(params): Parameters<CreateTask>) -> McpResult {
        reply(self.handlers().create_task(params.as_ref()).await)
    }

    #[tool(
        name = "list_tasks",
        description = "List the tasks of a plan in creation order, optionally filtered by status."
    )]
    async fn list_tasks(&self, Parameters(params): Parameters<ListTasks>) -> McpResult {
        reply(self.handlers().list_tasks(params.as_ref()).await)
    }

    #[tool(
        name = "show_task",
        description = "Show a task including timestamps, hours and its context log of notes, blockers and completion summaries."
    )]
    async fn show_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().show_task(params.as_ref()).await)
    }

    #[tool(
        name = "transition_task",
        description = "Move a task to any status its lifecycle allows: backlog, ready, in_progress, review, blocked, completed or cancelled. Use available_transitions to see the options."
    )]
    async fn transition_task(&self, Parameters(params): Parameters<TransitionTask>) -> McpResult {
        reply(self.handlers().transition_task(params.as_ref()).await)
    }

    #[tool(
        name = "start_task",
        description = "Start work on a task, moving it to in_progress. A backlog task is readied first. Optional notes are recorded in the context log."
    )]
    async fn start_task(&self, Parameters(params): Parameters<StartTask>) -> McpResult {
        reply(self.handlers().start_task(params.as_ref()).await)
    }

    #[tool(
        name = "complete_task",
        description = "Complete a task that is in review. summary describes what was accomplished and is recorded in the context log; actual_hours is optional."
    )]
    async fn complete_task(&self, Parameters(params): Parameters<CompleteTask>) -> McpResult {
        reply(self.handlers().complete_task(params.as_ref()).await)
    }

    #[tool(
        name = "block_task",
        description = "Block a task with a reason, which is recorded in the context log."
    )]
    async fn block_task(&self, Parameters(params): Parameters<BlockTask>) -> McpResult {
        reply(self.handlers().block_task(params.as_ref()).await)
    }

    #[tool(
        name = "unblock_task",
        description = "Resume a blocked task, moving it back to in_progress."
    )]
    async fn unblock_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().unblock_task(params.as_ref()).await)
    }

    #[tool(name = "cancel_task", description = "Cancel a task that is not yet resolved.")]
    async fn cancel_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().cancel_task(params.as_ref()).await)
    }

    #[tool(
        name = "available_transitions",
        description = "List the statuses a task may move to next. Empty for completed or cancelled tasks."
    )]
    async fn available_transitions(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().available_transitions(params.as_ref()).await)
    }

    #[tool(
        name = "delete_task",
        description = "Permanently delete a task together with its dependencies."
    )]
    async fn delete_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        reply(self.handlers().delete_task(params.as_ref()).await)
    }

    #[tool(
        name = "add_dependency",
        description = "Add a dependency from source to target. Both must exist in the same plan. dependency_type is 'blocks' (default), 'required_by' or 'related_to'. Self-dependencies, duplicates and blocking cycles are rejected."
    )]
    async fn add_dependency(&self, Parameters(params): Parameters<AddDependency>) -> McpResult {
        reply(self.handlers().add_dependency(params.as_ref()).await)
    }

    #[tool(
        name = "remove_dependency",
        description = "Remove every dependency edge from source to target."
    )]
    async fn remove_dependency(&self, Parameters(params): Parameters<DependencyEnds>) -> McpResult {
        reply(self.handlers().remove_dependency(params.as_ref()).await)
    }

    #[tool(
        name = "list_dependencies",
        description = "List what an entity depends on and what depends on it."
    )]
    async fn list_dependencies(&self, Parameters(params): Parameters<Entity>) -> McpResult {
        reply(self.handlers().list_dependencies(params.as_ref()).await)
    }

    #[tool(
        name = "get_blockers",
        description = "List the entities with a 'blocks' edge into this entity."
    )]
    async fn get_blockers(&self, Parameters(params): Parameters<Entity>) -> McpResult {
        reply(self.handlers().blockers(params.as_ref()).await)
    }

    #[tool(
        name = "get_blocked",
        description = "List the entities this entity blocks."
    )]
    async fn get_blocked(&self, Parameters(params): Parameters<Entity>) -> McpResult {
        reply(self.handlers().blocked(params.as_ref()).await)
    }

    #[tool(
        name = "dependency_chain",
        description = "Walk dependencies of every type breadth-first from an entity. direction is 'upstream' (what it depends on, default) or 'downstream' (what depends on it); max_depth defaults to 10."
    )]
    async fn dependency_chain(&self, Parameters(params): Parameters<DependencyChain>) -> McpResult {
        reply(self.handlers().dependency_chain(params.as_ref()).await)
    }

    #[tool(
        name = "would_create_cycle",
        description = "Check whether adding a blocking dependency from source to target would create a cycle."
    )]
    async fn would_create_cycle(&self, Parameters(params): Parameters<DependencyEnds>) -> McpResult {
        reply(self.handlers().would_create_cycle(params.as_ref()).await)
    }

    #[tool(
        name = "can_start",
        description = "Check whether every blocker of an entity is resolved, listing the ones that are not."
    )]
    async fn can_start(&self, Parameters(params): Parameters<Entity>) -> McpResult {
        reply(self.handlers().can_start(params.as_ref()).await)
    }

    #[tool(
        name = "count_dependencies",
        description = "Count the dependency edges touching an entity, split into outgoing and incoming."
    )]
    async fn count_dependencies(&self, Parameters(params): Parameters<Entity>) -> McpResult {
        reply(self.handlers().count_dependencies(params.as_ref()).await)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WaypointMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "waypoint".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WaypointMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Waypoint MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use waypoint_core::PlannerBuilder;

    use super::*;

    #[tokio::test]
    async fn test_every_operation_is_registered_as_a_tool() {
        let temp_dir = TempDir::new().unwrap();
        let planner = PlannerBuilder::new()
            .with_database_path(temp_dir.path().join("tools.db"))
            .build()
            .await
            .unwrap();
        let server = WaypointMcpServer::new(planner);

        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "create_plan",
            "transition_plan",
            "add_item",
            "start_task",
            "complete_task",
            "add_dependency",
            "dependency_chain",
            "would_create_cycle",
            "can_start",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
        assert_eq!(names.len(), 29);
        assert_eq!(server.get_info().server_info.name, "waypoint");
    }

    #[test]
    fn test_instructions_describe_blocker_resolution() {
        let text = INSTRUCTIONS;
        assert!(text.contains("a task once completed or cancelled"));
        assert!(text.contains("a plan once completed or archived"));
        assert!(text.contains("Goals, objectives and milestones never hold anything back"));
    }
}
