//! SQLite storage layer for Orbit.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - A key-value table holding one JSON document per collection
//!
//! # Submodules
//!
//! - [`collections`] - Load/save of the objective and journal collections
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Key-value SQLite storage

pub mod collections;
pub mod schema;
pub mod sqlite;

pub use collections::{
    load_entries, load_objectives, save_collections, save_entries, save_objectives, ENTRIES_KEY,
    OBJECTIVES_KEY,
};
pub use sqlite::SqliteStorage;
