//! Workspace: the controller that owns storage and the current state.
//!
//! Commands read [`Workspace::state`], compute the next [`AppState`] with
//! its mutation methods, and hand it to [`Workspace::commit`], which writes
//! every collection that changed in one transaction before swapping the
//! state in.

use std::path::Path;

use crate::error::Result;
use crate::state::AppState;
use crate::storage::{self, SqliteStorage};

/// Storage handle plus the state loaded from it.
#[derive(Debug)]
pub struct Workspace {
    storage: SqliteStorage,
    state: AppState,
}

impl Workspace {
    /// Open the database at `path` and load both collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened. Unreadable
    /// collections load as empty instead of failing.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_storage(SqliteStorage::open(path)?))
    }

    /// Open an in-memory workspace (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_storage(SqliteStorage::open_memory()?))
    }

    /// Wrap an already-open storage handle.
    #[must_use]
    pub fn from_storage(storage: SqliteStorage) -> Self {
        let state = AppState::new(
            storage::load_objectives(&storage),
            storage::load_entries(&storage),
        );
        tracing::debug!(
            objectives = state.objectives().len(),
            entries = state.entries().len(),
            "loaded workspace"
        );
        Self { storage, state }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Persist the collections that differ from the current state, then
    /// make `next` current.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails. Nothing is stored and the current
    /// state is unchanged.
    pub fn commit(&mut self, next: AppState) -> Result<()> {
        let objectives =
            (next.objectives() != self.state.objectives()).then_some(next.objectives());
        let entries = (next.entries() != self.state.entries()).then_some(next.entries());
        storage::save_collections(&mut self.storage, objectives, entries)?;
        self.state = next;
        Ok(())
    }
}
