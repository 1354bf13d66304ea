//! Initialize the Orbit database.
//!
//! Creates `~/.orbit/data/orbit.db` (or the `--db` / test-mode path) and
//! applies the schema. Every other command requires this to have run.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    recreated: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the database exists and
/// `force` is not set, or an error if it cannot be created.
pub fn execute(force: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(|p| p.as_path()))
        .ok_or_else(|| Error::Config("Could not determine the Orbit directory".to_string()))?;

    let exists = db_path.exists();
    if exists && !force {
        return Err(Error::AlreadyInitialized { path: db_path });
    }

    if crate::is_dry_run() {
        println!("Would create database: {}", db_path.display());
        return Ok(());
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if exists {
        remove_database(&db_path)?;
    }

    // Opening applies the schema
    SqliteStorage::open(&db_path)?;

    if json {
        let output = InitOutput {
            database: db_path,
            recreated: exists,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Initialized Orbit database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: orbit objective create \"Run a marathon\" --period annual");
    }

    Ok(())
}

/// Delete a database file with its WAL side files.
fn remove_database(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}
