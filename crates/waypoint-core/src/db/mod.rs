//! Database operations and SQLite management.
//!
//! This module is the entity store behind the planner: plain CRUD for plans,
//! plan items and tasks, plus the dependency edge table that the graph engine
//! in [`crate::graph`] queries. It performs no lifecycle validation of its
//! own; status changes go through [`crate::orchestrator`] and
//! [`crate::lifecycle`].

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod dependency_queries;
pub mod entity_queries;
pub mod item_queries;
pub mod migrations;
pub mod plan_queries;
pub mod task_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database, mostly useful in tests.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
