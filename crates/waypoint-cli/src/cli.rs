//! Command-line interface definitions and command handlers
//!
//! Each command takes a clap wrapper struct that converts into the matching
//! core parameter type:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! Core parameters stay free of clap derives, so the same types back the
//! MCP tools. Enumerated values (statuses, kinds, dependency types) pass
//! through as strings and are validated by the core, which keeps error
//! messages identical across interfaces.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use waypoint_core::{
    display::{
        Chain, CreateResult, DeleteResult, Items, OperationStatus, Plans, Tasks, Transitions,
        UpdateResult,
    },
    models::{Direction, EntityRef},
    params::*,
    Planner, Task,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Plan arguments
// ============================================================================

/// Create a new plan
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Title of the plan
    pub title: String,
    /// Optional description providing more context about the plan
    #[arg(short, long)]
    pub description: Option<String>,
    /// Working directory to associate with this plan
    #[arg(long)]
    pub directory: Option<String>,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan {
            title: val.title,
            description: val.description,
            directory: val.directory,
        }
    }
}

/// List plans, optionally restricted to one status
#[derive(Args)]
pub struct ListPlansArgs {
    /// Only show plans in this status (draft, active, completed, archived)
    #[arg(short, long)]
    pub status: Option<String>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans { status: val.status }
    }
}

/// Arguments for commands addressing a single plan or task by ID
#[derive(Args)]
pub struct IdArgs {
    /// Unique identifier
    pub id: String,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan in draft status
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its items and tasks
    #[command(alias = "s")]
    Show(IdArgs),
    /// Move a draft plan to active
    Activate(IdArgs),
    /// Mark an active plan as completed
    Complete(IdArgs),
    /// Archive a plan
    #[command(alias = "a")]
    Archive(IdArgs),
    /// Delete a plan with everything it contains
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Item arguments
// ============================================================================

/// Add a goal, objective or milestone to a plan
#[derive(Args)]
pub struct AddItemArgs {
    /// ID of the plan
    pub plan_id: String,
    /// Kind of item: goal, objective or milestone
    pub kind: String,
    /// Title of the item
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<AddItemArgs> for CreateItem {
    fn from(val: AddItemArgs) -> Self {
        CreateItem {
            plan_id: val.plan_id,
            kind: val.kind,
            title: val.title,
            description: val.description,
        }
    }
}

/// List the items of a plan
#[derive(Args)]
pub struct ListItemsArgs {
    /// ID of the plan
    pub plan_id: String,
    /// Only show items of this kind
    #[arg(short, long)]
    pub kind: Option<String>,
}

impl From<ListItemsArgs> for ListItems {
    fn from(val: ListItemsArgs) -> Self {
        ListItems {
            plan_id: val.plan_id,
            kind: val.kind,
        }
    }
}

/// Address an item by kind and ID
#[derive(Args)]
pub struct ItemRefArgs {
    /// Kind of item: goal, objective or milestone
    pub kind: String,
    /// ID of the item
    pub id: String,
}

impl From<ItemRefArgs> for ItemRef {
    fn from(val: ItemRefArgs) -> Self {
        ItemRef {
            kind: val.kind,
            id: val.id,
        }
    }
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add a goal, objective or milestone to a plan
    #[command(alias = "a")]
    Add(AddItemArgs),
    /// List the items of a plan
    #[command(aliases = ["l", "ls"])]
    List(ListItemsArgs),
    /// Show a single item
    #[command(alias = "s")]
    Show(ItemRefArgs),
    /// Delete an item and its dependencies
    #[command(aliases = ["d", "rm"])]
    Delete(ItemRefArgs),
}

// ============================================================================
// Task arguments
// ============================================================================

/// Create a task in backlog status
#[derive(Args)]
pub struct CreateTaskArgs {
    /// ID of the plan
    pub plan_id: String,
    /// Title of the task
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Milestone this task contributes to
    #[arg(short, long)]
    pub milestone: Option<String>,
    /// Priority: low, medium (default), high or critical
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Estimated effort in hours
    #[arg(short, long)]
    pub estimate: Option<f64>,
}

impl From<CreateTaskArgs> for CreateTask {
    fn from(val: CreateTaskArgs) -> Self {
        CreateTask {
            plan_id: val.plan_id,
            title: val.title,
            description: val.description,
            milestone_id: val.milestone,
            priority: val.priority,
            estimated_hours: val.estimate,
        }
    }
}

/// List the tasks of a plan
#[derive(Args)]
pub struct ListTasksArgs {
    /// ID of the plan
    pub plan_id: String,
    /// Only show tasks in this status
    #[arg(short, long)]
    pub status: Option<String>,
}

impl From<ListTasksArgs> for ListTasks {
    fn from(val: ListTasksArgs) -> Self {
        ListTasks {
            plan_id: val.plan_id,
            status: val.status,
        }
    }
}

/// Move a task to another status
#[derive(Args)]
pub struct TransitionTaskArgs {
    /// ID of the task
    pub id: String,
    /// Target status: backlog, ready, in_progress, review, blocked,
    /// completed or cancelled
    pub status: String,
}

impl From<TransitionTaskArgs> for TransitionTask {
    fn from(val: TransitionTaskArgs) -> Self {
        TransitionTask {
            id: val.id,
            status: val.status,
        }
    }
}

/// Start work on a task
#[derive(Args)]
pub struct StartTaskArgs {
    /// ID of the task
    pub id: String,
    /// Note to record in the task's context log
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<StartTaskArgs> for StartTask {
    fn from(val: StartTaskArgs) -> Self {
        StartTask {
            id: val.id,
            notes: val.notes,
        }
    }
}

/// Complete a task that is under review
#[derive(Args)]
pub struct CompleteTaskArgs {
    /// ID of the task
    pub id: String,
    /// What was accomplished
    pub summary: String,
    /// Hours actually spent
    #[arg(long)]
    pub hours: Option<f64>,
}

impl From<CompleteTaskArgs> for CompleteTask {
    fn from(val: CompleteTaskArgs) -> Self {
        CompleteTask {
            id: val.id,
            summary: val.summary,
            actual_hours: val.hours,
        }
    }
}

/// Block a task
#[derive(Args)]
pub struct BlockTaskArgs {
    /// ID of the task
    pub id: String,
    /// Why the task cannot proceed
    pub reason: String,
}

impl From<BlockTaskArgs> for BlockTask {
    fn from(val: BlockTaskArgs) -> Self {
        BlockTask {
            id: val.id,
            reason: val.reason,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task in backlog status
    #[command(alias = "c")]
    Create(CreateTaskArgs),
    /// List the tasks of a plan
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Show a task with its context log
    #[command(alias = "s")]
    Show(IdArgs),
    /// Move a task to any status the lifecycle allows
    #[command(alias = "mv")]
    Transition(TransitionTaskArgs),
    /// Start work on a task
    Start(StartTaskArgs),
    /// Complete a task that is under review
    Complete(CompleteTaskArgs),
    /// Block a task with a reason
    Block(BlockTaskArgs),
    /// Resume a blocked task
    Unblock(IdArgs),
    /// Cancel a task
    Cancel(IdArgs),
    /// Show which statuses a task may move to next
    Transitions(IdArgs),
    /// Delete a task and its dependencies
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Dependency arguments
// ============================================================================

/// Address any plan, goal, objective, milestone or task
#[derive(Args)]
pub struct EntityArgs {
    /// Entity kind: plan, goal, objective, milestone or task
    pub kind: String,
    /// ID of the entity
    pub id: String,
}

impl From<EntityArgs> for Entity {
    fn from(val: EntityArgs) -> Self {
        Entity {
            kind: val.kind,
            id: val.id,
        }
    }
}

/// Both ends of a dependency; the source must finish before the target
#[derive(Args)]
pub struct DependencyEndsArgs {
    /// Kind of the source entity
    pub source_kind: String,
    /// ID of the source entity
    pub source_id: String,
    /// Kind of the target entity
    pub target_kind: String,
    /// ID of the target entity
    pub target_id: String,
}

impl From<DependencyEndsArgs> for DependencyEnds {
    fn from(val: DependencyEndsArgs) -> Self {
        DependencyEnds {
            source_kind: val.source_kind,
            source_id: val.source_id,
            target_kind: val.target_kind,
            target_id: val.target_id,
        }
    }
}

/// Add a dependency edge
#[derive(Args)]
pub struct AddDependencyArgs {
    #[command(flatten)]
    pub ends: DependencyEndsArgs,
    /// Edge type: blocks (default), required_by or related_to
    #[arg(short = 't', long = "type")]
    pub dependency_type: Option<String>,
}

impl From<AddDependencyArgs> for AddDependency {
    fn from(val: AddDependencyArgs) -> Self {
        AddDependency {
            ends: val.ends.into(),
            dependency_type: val.dependency_type,
        }
    }
}

/// Walk the dependency chain of an entity
#[derive(Args)]
pub struct ChainArgs {
    #[command(flatten)]
    pub entity: EntityArgs,
    /// Follow what depends on the entity instead of what it depends on
    #[arg(long)]
    pub downstream: bool,
    /// Maximum number of hops to follow
    #[arg(long)]
    pub depth: Option<usize>,
}

impl From<ChainArgs> for DependencyChain {
    fn from(val: ChainArgs) -> Self {
        let direction = if val.downstream {
            Direction::Downstream
        } else {
            Direction::Upstream
        };
        DependencyChain {
            entity: val.entity.into(),
            direction: Some(direction.as_str().to_string()),
            max_depth: val.depth,
        }
    }
}

#[derive(Subcommand)]
pub enum DepCommands {
    /// Add a dependency; the source must be resolved before the target
    /// can start
    #[command(alias = "a")]
    Add(AddDependencyArgs),
    /// Remove every dependency from source to target
    #[command(aliases = ["rm", "d"])]
    Remove(DependencyEndsArgs),
    /// List what an entity depends on and what depends on it
    #[command(aliases = ["l", "ls"])]
    List(EntityArgs),
    /// Show the transitive dependencies of an entity, upstream by default
    Chain(ChainArgs),
    /// List the entities blocking this one
    Blockers(EntityArgs),
    /// List the entities this one blocks
    Blocked(EntityArgs),
    /// Check whether an entity can start
    Check(EntityArgs),
    /// Count the dependency edges touching an entity
    Count(EntityArgs),
    /// Check whether a blocking edge would create a cycle
    Cycle(DependencyEndsArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// CLI command handler
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .planner
                    .create_plan(&args.into())
                    .await
                    .context("Failed to create plan")?;
                self.renderer.show(&CreateResult::new(plan))
            }
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => {
                let params: Id = args.into();
                let plan = self
                    .planner
                    .get_plan(&params)
                    .await
                    .context("Failed to get plan")?
                    .with_context(|| format!("Plan with ID {} not found", params.id))?;
                self.renderer.show(&plan)
            }
            PlanCommands::Activate(args) => {
                let plan = self
                    .planner
                    .activate_plan(&args.into())
                    .await
                    .context("Failed to activate plan")?;
                self.renderer.show(&UpdateResult::with_changes(
                    plan,
                    vec!["Status: active".to_string()],
                ))
            }
            PlanCommands::Complete(args) => {
                let plan = self
                    .planner
                    .complete_plan(&args.into())
                    .await
                    .context("Failed to complete plan")?;
                self.renderer.show(&UpdateResult::with_changes(
                    plan,
                    vec!["Status: completed".to_string()],
                ))
            }
            PlanCommands::Archive(args) => {
                let plan = self
                    .planner
                    .archive_plan(&args.into())
                    .await
                    .context("Failed to archive plan")?;
                self.renderer.show(&OperationStatus::success(format!(
                    "Archived plan '{}' (ID: {})",
                    plan.title, plan.id
                )))
            }
            PlanCommands::Delete(args) => {
                let plan = self
                    .planner
                    .delete_plan(&args.into())
                    .await
                    .context("Failed to delete plan")?;
                self.renderer.show(&DeleteResult::new(plan))
            }
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let plans = self
            .planner
            .list_plans(params)
            .await
            .context("Failed to list plans")?;
        let title = match &params.status {
            Some(status) => format!("# Plans ({status})\n\n"),
            None => "# Plans\n\n".to_string(),
        };
        self.renderer.render(&format!("{title}{}", Plans(plans)))
    }

    pub async fn handle_item_command(&self, command: ItemCommands) -> Result<()> {
        match command {
            ItemCommands::Add(args) => {
                let item = self
                    .planner
                    .create_item(&args.into())
                    .await
                    .context("Failed to add item")?;
                self.renderer.show(&CreateResult::new(item))
            }
            ItemCommands::List(args) => {
                let items = self
                    .planner
                    .list_items(&args.into())
                    .await
                    .context("Failed to list items")?;
                self.renderer.show(&Items(items))
            }
            ItemCommands::Show(args) => {
                let params: ItemRef = args.into();
                let item = self
                    .planner
                    .get_item(&params)
                    .await
                    .context("Failed to get item")?
                    .with_context(|| format!("{} with ID {} not found", params.kind, params.id))?;
                self.renderer.render(&format!("{item}\n"))
            }
            ItemCommands::Delete(args) => {
                let item = self
                    .planner
                    .delete_item(&args.into())
                    .await
                    .context("Failed to delete item")?;
                self.renderer.show(&DeleteResult::new(item))
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Create(args) => {
                let task = self
                    .planner
                    .create_task(&args.into())
                    .await
                    .context("Failed to create task")?;
                self.renderer.show(&CreateResult::new(task))
            }
            TaskCommands::List(args) => {
                let tasks = self
                    .planner
                    .list_tasks(&args.into())
                    .await
                    .context("Failed to list tasks")?;
                self.renderer.show(&Tasks(tasks))
            }
            TaskCommands::Show(args) => {
                let params: Id = args.into();
                let task = self
                    .planner
                    .get_task(&params)
                    .await
                    .context("Failed to get task")?
                    .with_context(|| format!("Task with ID {} not found", params.id))?;
                self.renderer.show(&task)
            }
            TaskCommands::Transition(args) => {
                let task = self
                    .planner
                    .transition_task(&args.into())
                    .await
                    .context("Failed to transition task")?;
                self.show_status_change(task)
            }
            TaskCommands::Start(args) => {
                let task = self
                    .planner
                    .start_task(&args.into())
                    .await
                    .context("Failed to start task")?;
                self.show_status_change(task)
            }
            TaskCommands::Complete(args) => {
                let task = self
                    .planner
                    .complete_task(&args.into())
                    .await
                    .context("Failed to complete task")?;
                self.show_status_change(task)
            }
            TaskCommands::Block(args) => {
                let task = self
                    .planner
                    .block_task(&args.into())
                    .await
                    .context("Failed to block task")?;
                self.show_status_change(task)
            }
            TaskCommands::Unblock(args) => {
                let task = self
                    .planner
                    .unblock_task(&args.into())
                    .await
                    .context("Failed to unblock task")?;
                self.show_status_change(task)
            }
            TaskCommands::Cancel(args) => {
                let task = self
                    .planner
                    .cancel_task(&args.into())
                    .await
                    .context("Failed to cancel task")?;
                self.show_status_change(task)
            }
            TaskCommands::Transitions(args) => {
                let params: Id = args.into();
                let statuses = self
                    .planner
                    .available_transitions(&params)
                    .await
                    .context("Failed to look up transitions")?;
                self.renderer.show(&Transitions {
                    task_id: params.id,
                    statuses,
                })
            }
            TaskCommands::Delete(args) => {
                let task = self
                    .planner
                    .delete_task(&args.into())
                    .await
                    .context("Failed to delete task")?;
                self.renderer.show(&DeleteResult::new(task))
            }
        }
    }

    fn render_entities(&self, heading: &str, entities: &[EntityRef]) -> Result<()> {
        let mut out = format!("# {heading}\n\n");
        if entities.is_empty() {
            out.push_str("None.\n");
        }
        for entity in entities {
            out.push_str(&format!("- {entity}\n"));
        }
        self.renderer.render(&out)
    }

    fn show_status_change(&self, task: Task) -> Result<()> {
        let change = format!("Status: {}", task.status);
        self.renderer
            .show(&UpdateResult::with_changes(task, vec![change]))
    }

    pub async fn handle_dep_command(&self, command: DepCommands) -> Result<()> {
        match command {
            DepCommands::Add(args) => {
                let dependency = self
                    .planner
                    .add_dependency(&args.into())
                    .await
                    .context("Failed to add dependency")?;
                self.renderer.render(&format!("Added dependency: {dependency}\n"))
            }
            DepCommands::Remove(args) => {
                let params: DependencyEnds = args.into();
                self.planner
                    .remove_dependency(&params)
                    .await
                    .context("Failed to remove dependency")?;
                self.renderer.show(&OperationStatus::success(format!(
                    "Removed dependency {}:{} -> {}:{}",
                    params.source_kind, params.source_id, params.target_kind, params.target_id
                )))
            }
            DepCommands::List(args) => {
                let listing = self
                    .planner
                    .list_dependencies(&args.into())
                    .await
                    .context("Failed to list dependencies")?;
                self.renderer.show(&listing)
            }
            DepCommands::Chain(args) => {
                let params: DependencyChain = args.into();
                let (origin, direction, _) = params.validate()?;
                let entries = self
                    .planner
                    .dependency_chain(&params)
                    .await
                    .context("Failed to walk dependency chain")?;
                self.renderer.show(&Chain {
                    origin,
                    direction,
                    entries,
                })
            }
            DepCommands::Blockers(args) => {
                let params: Entity = args.into();
                let blockers = self
                    .planner
                    .blockers(&params)
                    .await
                    .context("Failed to get blockers")?;
                self.render_entities(
                    &format!("Blockers of {}:{}", params.kind, params.id),
                    &blockers,
                )
            }
            DepCommands::Blocked(args) => {
                let params: Entity = args.into();
                let blocked = self
                    .planner
                    .blocked(&params)
                    .await
                    .context("Failed to get blocked entities")?;
                self.render_entities(
                    &format!("Blocked by {}:{}", params.kind, params.id),
                    &blocked,
                )
            }
            DepCommands::Count(args) => {
                let params: Entity = args.into();
                let count = self
                    .planner
                    .count_dependencies(&params)
                    .await
                    .context("Failed to count dependencies")?;
                self.renderer.render(&format!(
                    "{}:{} has {} dependencies ({} as source, {} as target)\n",
                    params.kind,
                    params.id,
                    count.total(),
                    count.as_source,
                    count.as_target
                ))
            }
            DepCommands::Check(args) => {
                let check = self
                    .planner
                    .can_start(&args.into())
                    .await
                    .context("Failed to check blockers")?;
                self.renderer.show(&check)
            }
            DepCommands::Cycle(args) => {
                let cycle = self
                    .planner
                    .would_create_cycle(&args.into())
                    .await
                    .context("Failed to check for cycles")?;
                let status = if cycle {
                    OperationStatus::failure("Adding this dependency would create a cycle")
                } else {
                    OperationStatus::success("No cycle: the dependency can be added")
                };
                self.renderer.show(&status)
            }
        }
    }
}
