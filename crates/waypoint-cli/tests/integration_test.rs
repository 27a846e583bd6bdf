//! Integration tests comparing CLI output with the core Display
//! implementations it is built on.

use std::{path::Path, process::Command};

use tempfile::TempDir;
use waypoint_core::{
    display::{Plans, Tasks},
    params::{Id, ListPlans, ListTasks},
    Planner, PlannerBuilder,
};

async fn open_planner(db_path: &Path) -> Planner {
    PlannerBuilder::new()
        .with_database_path(db_path)
        .build()
        .await
        .expect("Failed to create planner")
}

/// Run a CLI command and capture its output
fn run_cli_command(db_path: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_wp"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .args(args)
        .env_remove("WAYPOINT_DATABASE")
        .output()
        .expect("Failed to run CLI command");
    assert!(output.status.success(), "wp {args:?} failed");
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_show_plan_matches_display() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    run_cli_command(
        &db_path,
        &["plan", "create", "Consistency", "-d", "Same text everywhere"],
    );
    let planner = open_planner(&db_path).await;
    let plan = planner
        .list_plans(&ListPlans::default())
        .await
        .unwrap()
        .remove(0);

    let cli_output = run_cli_command(&db_path, &["plan", "show", &plan.id]);
    let shown = planner
        .get_plan(&Id {
            id: plan.id.clone(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cli_output, shown.to_string());
}

#[tokio::test]
async fn test_list_output_matches_display() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    run_cli_command(&db_path, &["plan", "create", "First"]);
    run_cli_command(&db_path, &["plan", "create", "Second"]);
    let planner = open_planner(&db_path).await;
    let plans = planner.list_plans(&ListPlans::default()).await.unwrap();
    let plan_id = plans[0].id.clone();

    let cli_output = run_cli_command(&db_path, &["plan", "list"]);
    assert_eq!(cli_output, format!("# Plans\n\n{}", Plans(plans)));

    run_cli_command(&db_path, &["task", "create", &plan_id, "Alpha"]);
    run_cli_command(&db_path, &["task", "create", &plan_id, "Beta"]);
    let tasks = planner
        .list_tasks(&ListTasks {
            plan_id: plan_id.clone(),
            status: None,
        })
        .await
        .unwrap();
    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Alpha", "Beta"]);

    let cli_output = run_cli_command(&db_path, &["task", "list", &plan_id]);
    assert_eq!(cli_output, Tasks(tasks).to_string());
}

#[tokio::test]
async fn test_cli_writes_are_visible_to_planner() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    run_cli_command(&db_path, &["plan", "create", "Shared"]);
    let planner = open_planner(&db_path).await;
    let plan_id = planner
        .list_plans(&ListPlans::default())
        .await
        .unwrap()
        .remove(0)
        .id;
    run_cli_command(&db_path, &["task", "create", &plan_id, "Shared task"]);
    let task = planner
        .list_tasks(&ListTasks {
            plan_id,
            status: None,
        })
        .await
        .unwrap()
        .remove(0);

    run_cli_command(&db_path, &["task", "start", &task.id]);
    let task = planner
        .get_task(&Id { id: task.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, waypoint_core::TaskStatus::InProgress);
    assert!(task.started_at.is_some());
}
