//! Persistence adapter for the two Orbit collections.
//!
//! Objectives and journal entries are each stored as one JSON array under
//! a fixed key. Loading never fails: a missing, unreadable or corrupt value
//! starts the session from an empty collection. Saving always rewrites the
//! whole collection.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{JournalEntry, Objective};
use crate::storage::sqlite::SqliteStorage;

/// Key holding the objective list.
pub const OBJECTIVES_KEY: &str = "orbit_okrs";

/// Key holding the journal entry list.
pub const ENTRIES_KEY: &str = "orbit_entries";

/// Load the objective list, recomputing each cached progress score.
#[must_use]
pub fn load_objectives(storage: &SqliteStorage) -> Vec<Objective> {
    let mut objectives: Vec<Objective> = load_collection(storage, OBJECTIVES_KEY);
    for objective in &mut objectives {
        objective.refresh_progress();
    }
    objectives
}

/// Load the journal entry list.
#[must_use]
pub fn load_entries(storage: &SqliteStorage) -> Vec<JournalEntry> {
    load_collection(storage, ENTRIES_KEY)
}

/// Overwrite the stored objective list.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_objectives(storage: &mut SqliteStorage, objectives: &[Objective]) -> Result<()> {
    save_collections(storage, Some(objectives), None)
}

/// Overwrite the stored journal entry list.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_entries(storage: &mut SqliteStorage, entries: &[JournalEntry]) -> Result<()> {
    save_collections(storage, None, Some(entries))
}

/// Overwrite whichever collections are given, atomically.
///
/// # Errors
///
/// Returns an error if serialization or the write fails. On error neither
/// collection changes.
pub fn save_collections(
    storage: &mut SqliteStorage,
    objectives: Option<&[Objective]>,
    entries: Option<&[JournalEntry]>,
) -> Result<()> {
    let mut values = Vec::with_capacity(2);
    if let Some(objectives) = objectives {
        values.push((OBJECTIVES_KEY, serde_json::to_string(objectives)?));
    }
    if let Some(entries) = entries {
        values.push((ENTRIES_KEY, serde_json::to_string(entries)?));
    }
    if values.is_empty() {
        return Ok(());
    }
    storage.set_values(&values)?;
    tracing::debug!(keys = values.len(), "saved collections");
    Ok(())
}

fn load_collection<T: DeserializeOwned>(storage: &SqliteStorage, key: &str) -> Vec<T> {
    let raw = match storage.get_value(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored collection, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored collection is not valid JSON, starting empty");
            Vec::new()
        }
    }
}
