use tempfile::NamedTempFile;
use waypoint_core::{
    models::{DependencyType, Direction, EntityKind, EntityRef, ItemKind, PlanStatus, TaskPriority},
    Database, DependencyGraph, PlannerError,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn task(db: &mut Database, plan_id: &str, title: &str) -> EntityRef {
    db.create_task(plan_id, title, None, None, TaskPriority::Medium, None)
        .expect("Failed to create task")
        .entity_ref()
}

#[test]
fn test_database_reopens_existing_file() {
    let (temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Persistent", None, None).unwrap();
    drop(db);

    let reopened = Database::new(temp_file.path()).expect("Failed to reopen database");
    let fetched = reopened.get_plan(&plan.id).unwrap().unwrap();
    assert_eq!(fetched.title, "Persistent");
    assert_eq!(fetched.status, PlanStatus::Draft);
}

#[test]
fn test_milestone_link_survives_reopen() {
    let (temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Release", None, None).unwrap();
    let milestone = db
        .create_item(ItemKind::Milestone, &plan.id, "Beta", None)
        .unwrap();
    let task = db
        .create_task(
            &plan.id,
            "Ship beta",
            None,
            Some(&milestone.id),
            TaskPriority::High,
            None,
        )
        .unwrap();
    drop(db);

    let reopened = Database::new(temp_file.path()).expect("Failed to reopen database");
    let fetched = reopened.get_task(&task.id).unwrap().unwrap();
    assert_eq!(fetched.milestone_id.as_deref(), Some(milestone.id.as_str()));
}

#[test]
fn test_list_plans_in_creation_order() {
    let (_temp_file, mut db) = create_test_db();
    for title in ["First", "Second", "Third"] {
        db.create_plan(title, None, None).unwrap();
    }

    let titles: Vec<_> = db
        .list_plans(None)
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, ["First", "Second", "Third"]);
    assert!(db.list_plans(Some(PlanStatus::Active)).unwrap().is_empty());
}

#[test]
fn test_entity_plan_scope() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let goal = db
        .create_item(ItemKind::Goal, &plan.id, "Ship it", None)
        .unwrap();
    let t = task(&mut db, &plan.id, "T");

    assert_eq!(
        db.entity_plan_id(&plan.entity_ref()).unwrap(),
        Some(plan.id.clone())
    );
    assert_eq!(
        db.entity_plan_id(&goal.entity_ref()).unwrap(),
        Some(plan.id.clone())
    );
    assert_eq!(db.entity_plan_id(&t).unwrap(), Some(plan.id.clone()));
    assert_eq!(db.entity_plan_id(&EntityRef::task("missing")).unwrap(), None);
}

#[test]
fn test_cycle_scenario_closing_a_triangle() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let a = task(&mut db, &plan.id, "A");
    let b = task(&mut db, &plan.id, "B");
    let c = task(&mut db, &plan.id, "C");

    db.create_dependency(&a, &b, DependencyType::Blocks).unwrap();
    db.create_dependency(&b, &c, DependencyType::Blocks).unwrap();

    assert!(db.would_create_cycle(&c, &a).unwrap());
    assert!(!db.would_create_cycle(&a, &c).unwrap());
}

#[test]
fn test_cycle_check_ignores_non_blocking_edges() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let a = task(&mut db, &plan.id, "A");
    let b = task(&mut db, &plan.id, "B");

    db.create_dependency(&a, &b, DependencyType::RelatedTo).unwrap();
    assert!(!db.would_create_cycle(&b, &a).unwrap());

    // the chain still walks the related edge
    let chain = db
        .dependency_chain(&b, Direction::Upstream, 10)
        .unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].entity, a);
}

#[test]
fn test_chain_properties_on_a_diamond() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let top = task(&mut db, &plan.id, "top");
    let left = task(&mut db, &plan.id, "left");
    let right = task(&mut db, &plan.id, "right");
    let bottom = task(&mut db, &plan.id, "bottom");
    let tail = task(&mut db, &plan.id, "tail");

    for (s, t) in [
        (&top, &left),
        (&top, &right),
        (&left, &bottom),
        (&right, &bottom),
        (&bottom, &tail),
    ] {
        db.create_dependency(s, t, DependencyType::Blocks).unwrap();
    }

    let chain = db
        .dependency_chain(&top, Direction::Downstream, 10)
        .unwrap();
    let depths: Vec<_> = chain.iter().map(|e| e.depth).collect();
    assert_eq!(depths, [1, 1, 2, 3]);
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    assert!(chain.iter().all(|e| e.entity != top));

    let mut unique: Vec<_> = chain.iter().map(|e| e.entity.clone()).collect();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), chain.len());

    let shallow = db
        .dependency_chain(&top, Direction::Downstream, 2)
        .unwrap();
    assert!(shallow.iter().all(|e| e.depth <= 2));
    assert!(!shallow.iter().any(|e| e.entity == tail));

    let upstream = db
        .dependency_chain(&tail, Direction::Upstream, 10)
        .unwrap();
    assert_eq!(upstream.last().unwrap().entity, top);
}

#[test]
fn test_delete_plan_removes_every_touching_edge() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let milestone = db
        .create_item(ItemKind::Milestone, &plan.id, "M", None)
        .unwrap();
    let a = task(&mut db, &plan.id, "A");
    let b = task(&mut db, &plan.id, "B");

    db.create_dependency(&a, &b, DependencyType::Blocks).unwrap();
    db.create_dependency(&milestone.entity_ref(), &a, DependencyType::Blocks)
        .unwrap();
    db.create_dependency(&plan.entity_ref(), &b, DependencyType::RelatedTo)
        .unwrap();

    db.delete_plan(&plan.id).unwrap();

    for entity in [&a, &b, &milestone.entity_ref(), &plan.entity_ref()] {
        assert_eq!(db.count_dependencies(entity).unwrap().total(), 0);
    }
    assert!(db.get_task(&a.id).unwrap().is_none());
    assert!(db.get_item(ItemKind::Milestone, &milestone.id).unwrap().is_none());
}

#[test]
fn test_deleting_milestone_detaches_tasks() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let milestone = db
        .create_item(ItemKind::Milestone, &plan.id, "M", None)
        .unwrap();
    let t = db
        .create_task(
            &plan.id,
            "T",
            None,
            Some(&milestone.id),
            TaskPriority::Low,
            None,
        )
        .unwrap();

    db.delete_item(ItemKind::Milestone, &milestone.id).unwrap();
    let t = db.get_task(&t.id).unwrap().unwrap();
    assert_eq!(t.milestone_id, None);
}

#[test]
fn test_set_plan_status_on_missing_plan() {
    let (_temp_file, mut db) = create_test_db();
    let err = db
        .set_plan_status("missing", PlanStatus::Active)
        .unwrap_err();
    match err {
        PlannerError::NotFound { kind, id } => {
            assert_eq!(kind, EntityKind::Plan.label());
            assert_eq!(id, "missing");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_entity_resolved() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Plan", None, None).unwrap();
    let t = task(&mut db, &plan.id, "T");

    assert!(!db.entity_resolved(&t).unwrap());
    assert!(!db.entity_resolved(&plan.entity_ref()).unwrap());

    db.set_task_status(&t.id, waypoint_core::TaskStatus::Cancelled)
        .unwrap();
    assert!(db.entity_resolved(&t).unwrap());
    assert!(db.entity_resolved(&EntityRef::task("gone")).unwrap());
}
