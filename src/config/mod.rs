//! Configuration management.
//!
//! This module resolves where Orbit keeps its files. Everything lives under
//! `~/.orbit/`:
//! - **Database**: `~/.orbit/data/orbit.db`
//! - **Test database**: `~/.orbit/test/orbit.db` when `ORBIT_TEST_DB` is set
//! - **Settings**: `~/.orbit/config.json` (see [`crate::advisor::config`])

use std::path::{Path, PathBuf};

/// Get the global Orbit directory location (`~/.orbit/`).
#[must_use]
pub fn global_orbit_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".orbit"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `ORBIT_TEST_DB=1` (or any truthy value).
/// This redirects all database operations to an isolated test database.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("ORBIT_TEST_DB").is_ok_and(|v| is_truthy(&v))
}

/// Interpret an environment flag. Empty, `0`, `false`, `no` and `off` are false.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
}

/// Get the test database path (`~/.orbit/test/orbit.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_orbit_dir().map(|dir| dir.join("test").join("orbit.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag, which also reads `ORBIT_DB`)
/// 2. `ORBIT_TEST_DB` → the test database
/// 3. `~/.orbit/data/orbit.db`
///
/// Returns `None` only when no home directory can be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_orbit_dir().map(|dir| dir.join("data").join("orbit.db"))
}
