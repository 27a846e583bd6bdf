//! Tests for the planner module.

use tempfile::TempDir;

use super::*;
use crate::{
    models::{DependencyType, EntityKind, PlanStatus, TaskStatus},
    params::{
        AddDependency, CreateItem, CreatePlan, CreateTask, DependencyEnds, Entity, Id, ItemRef,
        ListItems, ListPlans, TransitionPlan, TransitionTask,
    },
};

/// Helper function to create a test planner
async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

async fn create_plan(planner: &Planner, title: &str) -> String {
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

async fn create_task(planner: &Planner, plan_id: &str, title: &str) -> String {
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

fn ends(source_kind: &str, source_id: &str, target_kind: &str, target_id: &str) -> DependencyEnds {
    DependencyEnds {
        source_kind: source_kind.to_string(),
        source_id: source_id.to_string(),
        target_kind: target_kind.to_string(),
        target_id: target_id.to_string(),
    }
}

fn blocks(source: &str, target: &str) -> AddDependency {
    AddDependency {
        ends: ends("task", source, "task", target),
        dependency_type: None,
    }
}

#[tokio::test]
async fn test_plan_lifecycle() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Release").await;
    let id = Id {
        id: plan_id.clone(),
    };

    let err = planner.complete_plan(&id).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid transition from draft to completed");

    assert_eq!(
        planner.activate_plan(&id).await.unwrap().status,
        PlanStatus::Active
    );
    assert_eq!(
        planner.complete_plan(&id).await.unwrap().status,
        PlanStatus::Completed
    );
    assert_eq!(
        planner.archive_plan(&id).await.unwrap().status,
        PlanStatus::Archived
    );
    assert!(planner.archive_plan(&id).await.is_err());

    let archived = planner
        .list_plans(&ListPlans {
            status: Some("archived".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
}

#[tokio::test]
async fn test_transition_plan_rejects_unknown_status() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Release").await;

    let err = planner
        .transition_plan(&TransitionPlan {
            id: plan_id,
            status: "paused".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_get_plan_loads_contents() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Release").await;

    planner
        .create_item(&CreateItem {
            plan_id: plan_id.clone(),
            kind: "milestone".to_string(),
            title: "Beta".to_string(),
            description: None,
        })
        .await
        .unwrap();
    create_task(&planner, &plan_id, "Cut branch").await;

    let plan = planner
        .get_plan(&Id { id: plan_id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.tasks.len(), 1);
    assert_eq!(plan.tasks[0].status, TaskStatus::Backlog);
}

#[tokio::test]
async fn test_list_items_on_missing_plan() {
    let (_temp_dir, planner) = create_test_planner().await;
    let err = planner
        .list_items(&ListItems {
            plan_id: "missing".to_string(),
            kind: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

#[tokio::test]
async fn test_add_dependency_validation_order() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let a = create_task(&planner, &plan_id, "A").await;

    let err = planner.add_dependency(&blocks(&a, &a)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invariant violation: An entity cannot depend on itself"
    );

    let err = planner
        .add_dependency(&blocks(&a, "missing"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Task with ID missing not found");

    let other_plan = create_plan(&planner, "Other").await;
    let foreign = create_task(&planner, &other_plan, "Foreign").await;
    let err = planner
        .add_dependency(&blocks(&a, &foreign))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must belong to the same plan"));

    let b = create_task(&planner, &plan_id, "B").await;
    planner.add_dependency(&blocks(&a, &b)).await.unwrap();
    let err = planner.add_dependency(&blocks(&a, &b)).await.unwrap_err();
    assert_eq!(err.to_string(), "Invariant violation: Dependency already exists");

    let err = planner.add_dependency(&blocks(&b, &a)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invariant violation: Adding this dependency would create a cycle"
    );
}

#[tokio::test]
async fn test_non_blocking_edges_skip_cycle_check() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let a = create_task(&planner, &plan_id, "A").await;
    let b = create_task(&planner, &plan_id, "B").await;

    planner.add_dependency(&blocks(&a, &b)).await.unwrap();
    let related = planner
        .add_dependency(&AddDependency {
            ends: ends("task", &b, "task", &a),
            dependency_type: Some("related_to".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(related.dependency_type, DependencyType::RelatedTo);
}

#[tokio::test]
async fn test_plan_can_block_its_own_task() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let task = create_task(&planner, &plan_id, "T").await;

    planner
        .add_dependency(&AddDependency {
            ends: ends("plan", &plan_id, "task", &task),
            dependency_type: None,
        })
        .await
        .unwrap();

    let check = planner
        .can_start(&Entity {
            kind: "task".to_string(),
            id: task,
        })
        .await
        .unwrap();
    assert!(!check.startable);
    assert_eq!(check.unresolved[0].kind, EntityKind::Plan);
}

#[tokio::test]
async fn test_milestone_blocker_counts_as_resolved() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let milestone = planner
        .create_item(&CreateItem {
            plan_id: plan_id.clone(),
            kind: "milestone".to_string(),
            title: "M1".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let task = create_task(&planner, &plan_id, "T").await;

    planner
        .add_dependency(&AddDependency {
            ends: ends("milestone", &milestone.id, "task", &task),
            dependency_type: None,
        })
        .await
        .unwrap();

    let check = planner
        .can_start(&Entity {
            kind: "task".to_string(),
            id: task,
        })
        .await
        .unwrap();
    assert!(check.startable);
}

#[tokio::test]
async fn test_remove_dependency() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let a = create_task(&planner, &plan_id, "A").await;
    let b = create_task(&planner, &plan_id, "B").await;

    planner.add_dependency(&blocks(&a, &b)).await.unwrap();
    planner
        .remove_dependency(&ends("task", &a, "task", &b))
        .await
        .unwrap();

    let err = planner
        .remove_dependency(&ends("task", &a, "task", &b))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

#[tokio::test]
async fn test_deleting_entities_removes_their_edges() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let a = create_task(&planner, &plan_id, "A").await;
    let b = create_task(&planner, &plan_id, "B").await;
    let milestone = planner
        .create_item(&CreateItem {
            plan_id: plan_id.clone(),
            kind: "milestone".to_string(),
            title: "M1".to_string(),
            description: None,
        })
        .await
        .unwrap();

    planner.add_dependency(&blocks(&a, &b)).await.unwrap();
    planner
        .add_dependency(&AddDependency {
            ends: ends("milestone", &milestone.id, "task", &b),
            dependency_type: None,
        })
        .await
        .unwrap();

    let b_entity = Entity {
        kind: "task".to_string(),
        id: b.clone(),
    };
    assert_eq!(planner.count_dependencies(&b_entity).await.unwrap().as_target, 2);

    planner.delete_task(&Id { id: a }).await.unwrap();
    assert_eq!(planner.count_dependencies(&b_entity).await.unwrap().as_target, 1);

    planner
        .delete_item(&ItemRef {
            kind: "milestone".to_string(),
            id: milestone.id,
        })
        .await
        .unwrap();
    assert_eq!(planner.count_dependencies(&b_entity).await.unwrap().total(), 0);
}

#[tokio::test]
async fn test_transition_task_through_planner() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan_id = create_plan(&planner, "Plan").await;
    let task = create_task(&planner, &plan_id, "T").await;

    let ready = planner
        .transition_task(&TransitionTask {
            id: task.clone(),
            status: "ready".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ready.status, TaskStatus::Ready);

    let transitions = planner
        .available_transitions(&Id { id: task })
        .await
        .unwrap();
    assert_eq!(
        transitions,
        vec![TaskStatus::InProgress, TaskStatus::Cancelled]
    );
}
