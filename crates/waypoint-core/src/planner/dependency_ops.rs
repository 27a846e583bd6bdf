//! Dependency operations for the Planner.
//!
//! The edge store accepts whatever it is given. Structural rules are checked
//! here, before anything is written, in a fixed order: self-reference,
//! existence, plan scope, duplicates, then cycles. The first failing rule
//! decides the error.

use super::Planner;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    graph::DependencyGraph,
    models::{
        ChainEntry, Dependency, DependencyType, EdgeCount, EntityDependencies, EntityRef,
        StartCheck,
    },
    params::{AddDependency, DependencyChain, DependencyEnds, Entity},
};

fn require_entity(db: &Database, entity: &EntityRef) -> Result<()> {
    if db.entity_exists(entity)? {
        Ok(())
    } else {
        Err(PlannerError::not_found(entity.kind, &entity.id))
    }
}

/// Checks every structural rule a new edge must satisfy.
pub(crate) fn validate_new_dependency(
    db: &Database,
    source: &EntityRef,
    target: &EntityRef,
    dependency_type: DependencyType,
) -> Result<()> {
    if source == target {
        return Err(PlannerError::invariant("An entity cannot depend on itself"));
    }

    require_entity(db, source)?;
    require_entity(db, target)?;

    let source_plan = db.entity_plan_id(source)?;
    let target_plan = db.entity_plan_id(target)?;
    if source_plan != target_plan {
        return Err(PlannerError::invariant(format!(
            "{source} and {target} must belong to the same plan"
        )));
    }

    if db.dependency_exists(source, target)? {
        return Err(PlannerError::invariant("Dependency already exists"));
    }

    if dependency_type == DependencyType::Blocks && db.would_create_cycle(source, target)? {
        return Err(PlannerError::invariant(
            "Adding this dependency would create a cycle",
        ));
    }

    Ok(())
}

/// Whether every blocker of `entity` has resolved.
pub(crate) fn check_can_start(db: &Database, entity: &EntityRef) -> Result<StartCheck> {
    require_entity(db, entity)?;

    let mut unresolved = Vec::new();
    for blocker in db.blockers(entity)? {
        if !db.entity_resolved(&blocker)? {
            unresolved.push(blocker);
        }
    }

    Ok(StartCheck {
        entity: entity.clone(),
        startable: unresolved.is_empty(),
        unresolved,
    })
}

impl Planner {
    /// Adds a dependency edge after validating it.
    pub async fn add_dependency(&self, params: &AddDependency) -> Result<Dependency> {
        let (source, target, dependency_type) = params.validate()?;

        self.with_db(move |db| {
            validate_new_dependency(db, &source, &target, dependency_type)?;
            db.create_dependency(&source, &target, dependency_type)
        })
        .await
    }

    /// Removes the edge `source -> target`.
    pub async fn remove_dependency(&self, params: &DependencyEnds) -> Result<()> {
        let (source, target) = params.validate()?;

        self.with_db(move |db| match db.delete_dependency(&source, &target)? {
            0 => Err(PlannerError::NotFound {
                kind: "Dependency".to_string(),
                id: format!("{source} -> {target}"),
            }),
            _ => Ok(()),
        })
        .await
    }

    /// Every edge touching an entity.
    pub async fn list_dependencies(&self, params: &Entity) -> Result<EntityDependencies> {
        let entity = params.validate()?;

        self.with_db(move |db| {
            require_entity(db, &entity)?;
            let outgoing = db.find_by_source(&entity, &[])?;
            let incoming = db.find_by_target(&entity, &[])?;
            Ok(EntityDependencies {
                entity,
                outgoing,
                incoming,
            })
        })
        .await
    }

    /// Entities that block the given one.
    pub async fn blockers(&self, params: &Entity) -> Result<Vec<EntityRef>> {
        let entity = params.validate()?;
        self.with_db(move |db| db.blockers(&entity)).await
    }

    /// Entities blocked by the given one.
    pub async fn blocked(&self, params: &Entity) -> Result<Vec<EntityRef>> {
        let entity = params.validate()?;
        self.with_db(move |db| db.blocked(&entity)).await
    }

    /// Transitive dependencies of an entity in one direction.
    pub async fn dependency_chain(&self, params: &DependencyChain) -> Result<Vec<ChainEntry>> {
        let (origin, direction, max_depth) = params.validate()?;

        self.with_db(move |db| {
            require_entity(db, &origin)?;
            db.dependency_chain(&origin, direction, max_depth)
        })
        .await
    }

    /// Whether adding a `blocks` edge `source -> target` would close a cycle.
    pub async fn would_create_cycle(&self, params: &DependencyEnds) -> Result<bool> {
        let (source, target) = params.validate()?;
        self.with_db(move |db| db.would_create_cycle(&source, &target))
            .await
    }

    /// Whether every blocker of an entity has resolved.
    pub async fn can_start(&self, params: &Entity) -> Result<StartCheck> {
        let entity = params.validate()?;
        self.with_db(move |db| check_can_start(db, &entity)).await
    }

    /// Number of edges touching an entity on each side.
    pub async fn count_dependencies(&self, params: &Entity) -> Result<EdgeCount> {
        let entity = params.validate()?;
        self.with_db(move |db| db.count_dependencies(&entity)).await
    }
}
