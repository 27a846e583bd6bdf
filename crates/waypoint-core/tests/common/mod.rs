#![allow(dead_code)]

use tempfile::TempDir;
use waypoint_core::{
    params::{CreatePlan, CreateTask},
    Planner, PlannerBuilder,
};

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

pub async fn create_plan(planner: &Planner, title: &str) -> String {
    planner
        .create_plan(&CreatePlan {
            title: title.to_string(),
            description: None,
            directory: None,
        })
        .await
        .expect("Failed to create plan")
        .id
}

pub async fn create_task(planner: &Planner, plan_id: &str, title: &str) -> String {
    planner
        .create_task(&CreateTask {
            plan_id: plan_id.to_string(),
            title: title.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create task")
        .id
}
