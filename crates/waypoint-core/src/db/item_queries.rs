//! Goal, objective and milestone CRUD.
//!
//! The three kinds live in separate tables with identical columns, so every
//! query is built from the table name of the requested [`ItemKind`].

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::utils::{new_id, timestamp_column};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{EntityKind, ItemKind, PlanItem},
};

const ITEM_KINDS: [ItemKind; 3] = [ItemKind::Goal, ItemKind::Objective, ItemKind::Milestone];

impl super::Database {
    fn build_item_from_row(kind: ItemKind, row: &rusqlite::Row) -> rusqlite::Result<PlanItem> {
        Ok(PlanItem {
            id: row.get(0)?,
            kind,
            plan_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            created_at: timestamp_column(row, 4)?,
            updated_at: timestamp_column(row, 5)?,
        })
    }

    /// Adds a goal, objective or milestone to an existing plan.
    pub fn create_item(
        &mut self,
        kind: ItemKind,
        plan_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<PlanItem> {
        if !self.plan_exists(plan_id)? {
            return Err(PlannerError::not_found(EntityKind::Plan, plan_id));
        }

        let id = new_id();
        let now = Timestamp::now();
        let now_str = now.to_string();
        let sql = format!(
            "INSERT INTO {} (id, plan_id, title, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            kind.entity_kind().table()
        );

        self.connection
            .execute(
                &sql,
                params![&id, plan_id, title, description, &now_str, &now_str],
            )
            .db_context("Failed to insert plan item")?;

        Ok(PlanItem {
            id,
            kind,
            plan_id: plan_id.into(),
            title: title.into(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a single item of the given kind.
    pub fn get_item(&self, kind: ItemKind, id: &str) -> Result<Option<PlanItem>> {
        let sql = format!(
            "SELECT id, plan_id, title, description, created_at, updated_at FROM {} WHERE id = ?1",
            kind.entity_kind().table()
        );

        self.connection
            .query_row(&sql, params![id], |row| Self::build_item_from_row(kind, row))
            .optional()
            .db_context("Failed to query plan item")
    }

    /// Lists a plan's items, all kinds unless one is given, grouped by kind
    /// and oldest first within a kind.
    pub fn list_items(&self, plan_id: &str, kind: Option<ItemKind>) -> Result<Vec<PlanItem>> {
        let kinds: Vec<ItemKind> = match kind {
            Some(kind) => vec![kind],
            None => ITEM_KINDS.to_vec(),
        };

        let mut items = Vec::new();
        for kind in kinds {
            let sql = format!(
                "SELECT id, plan_id, title, description, created_at, updated_at FROM {} WHERE plan_id = ?1 ORDER BY rowid",
                kind.entity_kind().table()
            );
            let mut stmt = self
                .connection
                .prepare(&sql)
                .db_context("Failed to prepare query")?;
            let rows = stmt
                .query_map(params![plan_id], |row| Self::build_item_from_row(kind, row))
                .db_context("Failed to query plan items")?;
            for row in rows {
                items.push(row.db_context("Failed to fetch plan item")?);
            }
        }

        Ok(items)
    }

    /// Deletes an item together with every dependency edge touching it.
    pub fn delete_item(&mut self, kind: ItemKind, id: &str) -> Result<PlanItem> {
        let item = self
            .get_item(kind, id)?
            .ok_or_else(|| PlannerError::not_found(kind.entity_kind(), id))?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let removed = Self::delete_edges_in(&tx, &item.entity_ref())?;
        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.entity_kind().table()),
            params![id],
        )
        .db_context("Failed to delete plan item")?;

        tx.commit().db_context("Failed to commit transaction")?;

        log::debug!("Deleted {kind} {id} and {removed} dependencies");
        Ok(item)
    }
}
