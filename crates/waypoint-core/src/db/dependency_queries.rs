//! Dependency edge storage.
//!
//! Each method here is a single statement against the `dependencies` table.
//! Structural checks (self-loops, duplicates, cycles, plan scope) belong to
//! the caller, see [`crate::planner::dependency_ops`].

use jiff::Timestamp;
use rusqlite::{params, params_from_iter, Connection};

use super::utils::{enum_column, new_id, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result},
    graph::DependencyGraph,
    models::{Dependency, DependencyType, EdgeCount, EntityRef},
};

const DEPENDENCY_COLUMNS: &str =
    "id, source_kind, source_id, target_kind, target_id, dependency_type, created_at";
const INSERT_DEPENDENCY_SQL: &str = "INSERT INTO dependencies (id, source_kind, source_id, target_kind, target_id, dependency_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const CHECK_DEPENDENCY_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM dependencies WHERE source_kind = ?1 AND source_id = ?2 AND target_kind = ?3 AND target_id = ?4)";
const DELETE_DEPENDENCY_SQL: &str = "DELETE FROM dependencies WHERE source_kind = ?1 AND source_id = ?2 AND target_kind = ?3 AND target_id = ?4";
const DELETE_ENTITY_DEPENDENCIES_SQL: &str = "DELETE FROM dependencies WHERE (source_kind = ?1 AND source_id = ?2) OR (target_kind = ?1 AND target_id = ?2)";
const COUNT_AS_SOURCE_SQL: &str =
    "SELECT COUNT(*) FROM dependencies WHERE source_kind = ?1 AND source_id = ?2";
const COUNT_AS_TARGET_SQL: &str =
    "SELECT COUNT(*) FROM dependencies WHERE target_kind = ?1 AND target_id = ?2";

/// Which end of an edge a lookup matches on.
#[derive(Clone, Copy)]
enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Endpoint::Source => ("source_kind", "source_id"),
            Endpoint::Target => ("target_kind", "target_id"),
        }
    }
}

impl super::Database {
    fn build_dependency_from_row(row: &rusqlite::Row) -> rusqlite::Result<Dependency> {
        Ok(Dependency {
            id: row.get(0)?,
            source: EntityRef::new(enum_column(row, 1)?, row.get::<_, String>(2)?),
            target: EntityRef::new(enum_column(row, 3)?, row.get::<_, String>(4)?),
            dependency_type: enum_column(row, 5)?,
            created_at: timestamp_column(row, 6)?,
        })
    }

    /// Inserts an edge as-is. Callers validate first.
    pub fn create_dependency(
        &mut self,
        source: &EntityRef,
        target: &EntityRef,
        dependency_type: DependencyType,
    ) -> Result<Dependency> {
        let id = new_id();
        let now = Timestamp::now();

        self.connection
            .execute(
                INSERT_DEPENDENCY_SQL,
                params![
                    &id,
                    source.kind.as_str(),
                    &source.id,
                    target.kind.as_str(),
                    &target.id,
                    dependency_type.as_str(),
                    now.to_string()
                ],
            )
            .db_context("Failed to insert dependency")?;

        log::debug!("Created {dependency_type} dependency {source} -> {target}");

        Ok(Dependency {
            id,
            source: source.clone(),
            target: target.clone(),
            dependency_type,
            created_at: now,
        })
    }

    /// Exact-edge membership check. Direction matters.
    pub fn dependency_exists(&self, source: &EntityRef, target: &EntityRef) -> Result<bool> {
        self.connection
            .query_row(
                CHECK_DEPENDENCY_EXISTS_SQL,
                params![source.kind.as_str(), &source.id, target.kind.as_str(), &target.id],
                |row| row.get(0),
            )
            .db_context("Failed to check dependency existence")
    }

    fn find_dependencies(
        &self,
        endpoint: Endpoint,
        entity: &EntityRef,
        types: &[DependencyType],
    ) -> Result<Vec<Dependency>> {
        let (kind_column, id_column) = endpoint.columns();
        let mut sql = format!(
            "SELECT {DEPENDENCY_COLUMNS} FROM dependencies WHERE {kind_column} = ?1 AND {id_column} = ?2"
        );
        if !types.is_empty() {
            let placeholders = (0..types.len())
                .map(|i| format!("?{}", i + 3))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" AND dependency_type IN ({placeholders})"));
        }
        sql.push_str(" ORDER BY rowid");

        let values = [entity.kind.as_str(), entity.id.as_str()]
            .into_iter()
            .chain(types.iter().map(|t| t.as_str()));

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let dependencies = stmt
            .query_map(params_from_iter(values), Self::build_dependency_from_row)
            .db_context("Failed to query dependencies")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch dependencies")?;

        Ok(dependencies)
    }

    /// Removes the edge `source -> target`, returning rows affected.
    pub fn delete_dependency(&mut self, source: &EntityRef, target: &EntityRef) -> Result<usize> {
        self.connection
            .execute(
                DELETE_DEPENDENCY_SQL,
                params![source.kind.as_str(), &source.id, target.kind.as_str(), &target.id],
            )
            .db_context("Failed to delete dependency")
    }

    /// Removes every edge touching `entity`, returning rows affected.
    pub fn delete_dependencies_for_entity(&mut self, entity: &EntityRef) -> Result<usize> {
        Self::delete_edges_in(&self.connection, entity)
    }

    /// Edge removal usable inside a caller's transaction.
    pub(crate) fn delete_edges_in(connection: &Connection, entity: &EntityRef) -> Result<usize> {
        connection
            .execute(
                DELETE_ENTITY_DEPENDENCIES_SQL,
                params![entity.kind.as_str(), &entity.id],
            )
            .db_context("Failed to delete entity dependencies")
    }

    /// Number of edges with `entity` as source and as target.
    pub fn count_dependencies(&self, entity: &EntityRef) -> Result<EdgeCount> {
        let count = |sql: &str| -> Result<usize> {
            self.connection
                .query_row(sql, params![entity.kind.as_str(), &entity.id], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
                .db_context("Failed to count dependencies")
        };

        Ok(EdgeCount {
            as_source: count(COUNT_AS_SOURCE_SQL)?,
            as_target: count(COUNT_AS_TARGET_SQL)?,
        })
    }
}

impl DependencyGraph for super::Database {
    fn find_by_source(
        &self,
        entity: &EntityRef,
        types: &[DependencyType],
    ) -> Result<Vec<Dependency>> {
        self.find_dependencies(Endpoint::Source, entity, types)
    }

    fn find_by_target(
        &self,
        entity: &EntityRef,
        types: &[DependencyType],
    ) -> Result<Vec<Dependency>> {
        self.find_dependencies(Endpoint::Target, entity, types)
    }
}
