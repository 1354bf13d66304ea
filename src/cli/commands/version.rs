//! Version command implementation.

use crate::advisor::config::DEFAULT_MODEL;
use crate::error::Result;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    build: &'static str,
    schema_version: i32,
    default_model: &'static str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        schema_version: CURRENT_SCHEMA_VERSION,
        default_model: DEFAULT_MODEL,
    };

    if json {
        return super::print_json(&output);
    }

    println!(
        "orbit {} ({}, schema v{}, advisor model {})",
        output.version, output.build, output.schema_version, output.default_model
    );
    Ok(())
}
