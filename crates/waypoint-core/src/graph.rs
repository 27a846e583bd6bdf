//! Dependency graph queries built from point lookups.
//!
//! No graph is ever materialized in memory. Every traversal step asks the
//! underlying edge store for the edges touching one node, so a breadth-first
//! search costs one round-trip per frontier node. That is fine for the few
//! hundred entities a plan usually holds.
//!
//! [`DependencyGraph`] only requires the two edge lookups; blocker queries,
//! cycle detection and chain traversal are provided on top of them. The
//! SQLite [`Database`](crate::db::Database) implements it, and so can any
//! test double.

use std::collections::{HashSet, VecDeque};

use crate::{
    error::Result,
    models::{ChainEntry, Dependency, DependencyType, Direction, EntityRef},
};

/// Default hop limit for [`DependencyGraph::dependency_chain`].
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Read access to directed dependency edges.
pub trait DependencyGraph {
    /// Edges whose source is `entity`, oldest first. An empty filter matches
    /// every dependency type.
    fn find_by_source(
        &self,
        entity: &EntityRef,
        types: &[DependencyType],
    ) -> Result<Vec<Dependency>>;

    /// Edges whose target is `entity`, oldest first. An empty filter matches
    /// every dependency type.
    fn find_by_target(
        &self,
        entity: &EntityRef,
        types: &[DependencyType],
    ) -> Result<Vec<Dependency>>;

    /// Entities that block `entity`.
    fn blockers(&self, entity: &EntityRef) -> Result<Vec<EntityRef>> {
        Ok(self
            .find_by_target(entity, &[DependencyType::Blocks])?
            .into_iter()
            .map(|dep| dep.source)
            .collect())
    }

    /// Entities blocked by `entity`.
    fn blocked(&self, entity: &EntityRef) -> Result<Vec<EntityRef>> {
        Ok(self
            .find_by_source(entity, &[DependencyType::Blocks])?
            .into_iter()
            .map(|dep| dep.target)
            .collect())
    }

    /// Returns true if adding `source -> target` would close a cycle.
    ///
    /// Searches breadth-first from `source` backwards along existing `blocks`
    /// edges; reaching `target` means `target` already (transitively) blocks
    /// `source`. Other dependency types never form cycles.
    fn would_create_cycle(&self, source: &EntityRef, target: &EntityRef) -> Result<bool> {
        if source == target {
            return Ok(true);
        }

        let mut visited: HashSet<EntityRef> = HashSet::new();
        let mut queue: VecDeque<EntityRef> = VecDeque::new();
        visited.insert(source.clone());
        queue.push_back(source.clone());

        while let Some(current) = queue.pop_front() {
            if &current == target {
                return Ok(true);
            }

            for blocker in self.blockers(&current)? {
                if visited.insert(blocker.clone()) {
                    queue.push_back(blocker);
                }
            }
        }

        Ok(false)
    }

    /// Breadth-first list of everything reachable from `origin`.
    ///
    /// Upstream follows edges into `origin` (what it depends on), downstream
    /// follows edges out of it. All dependency types are followed. Each
    /// entity appears once, at the depth it was first reached; nothing beyond
    /// `max_depth` hops is returned. The origin itself is not listed.
    fn dependency_chain(
        &self,
        origin: &EntityRef,
        direction: Direction,
        max_depth: usize,
    ) -> Result<Vec<ChainEntry>> {
        let mut chain = Vec::new();
        let mut visited: HashSet<EntityRef> = HashSet::new();
        let mut queue: VecDeque<(EntityRef, usize)> = VecDeque::new();
        visited.insert(origin.clone());
        queue.push_back((origin.clone(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            let neighbours = match direction {
                Direction::Upstream => self
                    .find_by_target(&current, &[])?
                    .into_iter()
                    .map(|dep| (dep.source, dep.dependency_type))
                    .collect::<Vec<_>>(),
                Direction::Downstream => self
                    .find_by_source(&current, &[])?
                    .into_iter()
                    .map(|dep| (dep.target, dep.dependency_type))
                    .collect(),
            };

            for (entity, dependency_type) in neighbours {
                if !visited.insert(entity.clone()) {
                    continue;
                }
                chain.push(ChainEntry {
                    entity: entity.clone(),
                    depth: depth + 1,
                    dependency_type,
                });
                queue.push_back((entity, depth + 1));
            }
        }

        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use jiff::Timestamp;

    use super::*;
    use crate::models::EntityKind;

    /// In-memory edge list that counts lookups.
    #[derive(Default)]
    struct MemoryGraph {
        edges: Vec<Dependency>,
        lookups: Cell<usize>,
    }

    impl MemoryGraph {
        fn link(&mut self, source: &str, target: &str, dependency_type: DependencyType) {
            self.edges.push(Dependency {
                id: format!("{source}->{target}"),
                source: EntityRef::task(source),
                target: EntityRef::task(target),
                dependency_type,
                created_at: Timestamp::UNIX_EPOCH,
            });
        }

        fn blocks(&mut self, source: &str, target: &str) {
            self.link(source, target, DependencyType::Blocks);
        }

        fn select(
            &self,
            types: &[DependencyType],
            pick: impl Fn(&Dependency) -> bool,
        ) -> Vec<Dependency> {
            self.lookups.set(self.lookups.get() + 1);
            self.edges
                .iter()
                .filter(|dep| pick(dep))
                .filter(|dep| types.is_empty() || types.contains(&dep.dependency_type))
                .cloned()
                .collect()
        }
    }

    impl DependencyGraph for MemoryGraph {
        fn find_by_source(
            &self,
            entity: &EntityRef,
            types: &[DependencyType],
        ) -> Result<Vec<Dependency>> {
            Ok(self.select(types, |dep| &dep.source == entity))
        }

        fn find_by_target(
            &self,
            entity: &EntityRef,
            types: &[DependencyType],
        ) -> Result<Vec<Dependency>> {
            Ok(self.select(types, |dep| &dep.target == entity))
        }
    }

    fn task(id: &str) -> EntityRef {
        EntityRef::task(id)
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let graph = MemoryGraph::default();
        assert!(graph.would_create_cycle(&task("a"), &task("a")).unwrap());
    }

    #[test]
    fn test_closing_a_chain_is_a_cycle() {
        let mut graph = MemoryGraph::default();
        graph.blocks("a", "b");
        graph.blocks("b", "c");

        assert!(graph.would_create_cycle(&task("c"), &task("a")).unwrap());
        assert!(!graph.would_create_cycle(&task("a"), &task("c")).unwrap());
    }

    #[test]
    fn test_same_id_different_kind_is_not_a_cycle() {
        let graph = MemoryGraph::default();
        let plan = EntityRef::new(EntityKind::Plan, "x");
        let item = EntityRef::new(EntityKind::Milestone, "x");
        assert!(!graph.would_create_cycle(&plan, &item).unwrap());
    }

    #[test]
    fn test_non_blocking_edges_do_not_form_cycles() {
        let mut graph = MemoryGraph::default();
        graph.link("a", "b", DependencyType::RelatedTo);
        graph.link("b", "c", DependencyType::RequiredBy);

        assert!(!graph.would_create_cycle(&task("c"), &task("a")).unwrap());
    }

    #[test]
    fn test_diamond_visits_shared_ancestor_once() {
        let mut graph = MemoryGraph::default();
        graph.blocks("root", "left");
        graph.blocks("root", "right");
        graph.blocks("left", "sink");
        graph.blocks("right", "sink");

        assert!(!graph.would_create_cycle(&task("sink"), &task("other")).unwrap());
        // sink, left, right, root: one lookup each
        assert_eq!(graph.lookups.get(), 4);
    }

    #[test]
    fn test_blockers_and_blocked() {
        let mut graph = MemoryGraph::default();
        graph.blocks("a", "c");
        graph.blocks("b", "c");
        graph.link("d", "c", DependencyType::RelatedTo);

        assert_eq!(graph.blockers(&task("c")).unwrap(), vec![task("a"), task("b")]);
        assert_eq!(graph.blocked(&task("a")).unwrap(), vec![task("c")]);
        assert!(graph.blocked(&task("d")).unwrap().is_empty());
    }

    #[test]
    fn test_upstream_chain_follows_all_types_with_depths() {
        let mut graph = MemoryGraph::default();
        graph.blocks("a", "b");
        graph.link("b", "c", DependencyType::RelatedTo);
        graph.blocks("a", "c");

        let chain = graph
            .dependency_chain(&task("c"), Direction::Upstream, DEFAULT_MAX_DEPTH)
            .unwrap();

        assert_eq!(
            chain,
            vec![
                ChainEntry {
                    entity: task("b"),
                    depth: 1,
                    dependency_type: DependencyType::RelatedTo,
                },
                ChainEntry {
                    entity: task("a"),
                    depth: 1,
                    dependency_type: DependencyType::Blocks,
                },
            ]
        );
    }

    #[test]
    fn test_chain_respects_max_depth() {
        let mut graph = MemoryGraph::default();
        for (source, target) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")] {
            graph.blocks(source, target);
        }

        let chain = graph
            .dependency_chain(&task("a"), Direction::Downstream, 2)
            .unwrap();

        let ids: Vec<_> = chain.iter().map(|e| e.entity.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
        assert!(chain.iter().all(|e| e.depth <= 2));
    }

    #[test]
    fn test_chain_is_breadth_first_without_duplicates() {
        let mut graph = MemoryGraph::default();
        graph.blocks("a", "b");
        graph.blocks("a", "c");
        graph.blocks("b", "d");
        graph.blocks("c", "d");
        graph.blocks("d", "a");

        let chain = graph
            .dependency_chain(&task("a"), Direction::Downstream, DEFAULT_MAX_DEPTH)
            .unwrap();

        let depths: Vec<_> = chain.iter().map(|e| e.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));

        let unique: HashSet<_> = chain.iter().map(|e| &e.entity).collect();
        assert_eq!(unique.len(), chain.len());
        assert!(!unique.contains(&task("a")));
        assert_eq!(chain.len(), 3);
    }
}
