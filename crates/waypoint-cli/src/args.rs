use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DepCommands, ItemCommands, PlanCommands, TaskCommands};

/// Plan, task and dependency tracker
///
/// Waypoint organizes work into plans that hold goals, objectives,
/// milestones and tasks. Any of these can block any other within the same
/// plan; tasks move through a fixed lifecycle from backlog to completion.
/// Run `wp serve` to expose the same operations to AI assistants over MCP.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waypoint/waypoint.db
    #[arg(long, global = true, env = "WAYPOINT_DATABASE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// Without a command, `wp` lists all plans.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage goals, objectives and milestones
    #[command(alias = "i")]
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Manage tasks and their lifecycle
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage dependencies between plans, items and tasks
    #[command(alias = "d")]
    Dep {
        #[command(subcommand)]
        command: DepCommands,
    },
    /// Start the MCP server
    Serve,
}
