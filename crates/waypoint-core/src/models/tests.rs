use jiff::Timestamp;

use super::*;

#[test]
fn test_enum_round_trip_through_storage_names() {
    for kind in EntityKind::ALL {
        assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
    }
    for status in [
        TaskStatus::Backlog,
        TaskStatus::Ready,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Blocked,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ] {
        assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
    }
}

#[test]
fn test_parsing_is_case_insensitive_but_closed() {
    assert_eq!("TASK".parse::<EntityKind>().unwrap(), EntityKind::Task);
    assert_eq!("InProgress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    assert_eq!(
        "epic".parse::<EntityKind>().unwrap_err(),
        "Invalid entity kind: epic"
    );
    assert!("paused".parse::<PlanStatus>().is_err());
    assert!("urgent".parse::<TaskPriority>().is_err());
    assert!("sideways".parse::<Direction>().is_err());
}

#[test]
fn test_item_kind_only_covers_statusless_kinds() {
    assert_eq!("goal".parse::<ItemKind>().unwrap(), ItemKind::Goal);
    assert_eq!(ItemKind::Milestone.entity_kind(), EntityKind::Milestone);
    assert!(ItemKind::try_from(EntityKind::Plan).is_err());
    assert!("task".parse::<ItemKind>().is_err());
}

#[test]
fn test_entity_ref_identity_includes_kind() {
    let task = EntityRef::task("42");
    let milestone = EntityRef::new(EntityKind::Milestone, "42");
    assert_ne!(task, milestone);
    assert_eq!(task, EntityRef::new(EntityKind::Task, "42".to_string()));
    assert_eq!(milestone.to_string(), "milestone:42");
}

#[test]
fn test_resolved_statuses() {
    assert!(TaskStatus::Completed.is_resolved());
    assert!(TaskStatus::Cancelled.is_resolved());
    assert!(!TaskStatus::Review.is_resolved());
    assert!(PlanStatus::Archived.is_resolved());
    assert!(!PlanStatus::Active.is_resolved());
}

#[test]
fn test_serde_uses_snake_case_names() {
    assert_eq!(
        serde_json::to_string(&TaskStatus::InProgress).unwrap(),
        "\"in_progress\""
    );
    assert_eq!(
        serde_json::to_string(&DependencyType::RequiredBy).unwrap(),
        "\"required_by\""
    );

    let entity: EntityRef = serde_json::from_str(r#"{"kind":"goal","id":"g1"}"#).unwrap();
    assert_eq!(entity, EntityRef::new(EntityKind::Goal, "g1"));
}

#[test]
fn test_context_entries_serialize_for_storage() {
    let entry = ContextEntry {
        kind: ContextKind::Blocker,
        message: "Waiting on review".to_string(),
        recorded_at: Timestamp::from_second(1_700_000_000).unwrap(),
    };
    let json = serde_json::to_string(&vec![entry.clone()]).unwrap();
    let parsed: Vec<ContextEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, vec![entry]);
}

#[test]
fn test_edge_count_total() {
    let count = EdgeCount {
        as_source: 2,
        as_target: 3,
    };
    assert_eq!(count.total(), 5);
    assert_eq!(EdgeCount::default().total(), 0);
}
