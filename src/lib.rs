//! Orbit CLI - Plan. Act. Reflect.
//!
//! Objectives with measurable key results, a daily journal with mood and
//! energy ratings, and an AI advisor that drafts entries, gives feedback
//! and proposes key result updates for review.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Objective, KeyResult, JournalEntry, suggestions)
//! - [`state`] - Application state and its mutation protocol
//! - [`workspace`] - State bound to its store, with commit-on-change
//! - [`storage`] - SQLite key-value store for the persisted collections
//! - [`advisor`] - Gemini advisory client with deterministic fallbacks
//! - [`compose`] - Journal entry composition and submission
//! - [`review`] - Review of suggested key result updates
//! - [`calendar`] - Simulated calendar provider
//! - [`dashboard`] - Aggregate statistics and insights
//! - [`config`] - Paths and environment
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod advisor;
pub mod calendar;
pub mod cli;
pub mod compose;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod review;
pub mod state;
pub mod storage;
pub mod validate;
pub mod workspace;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, create/mutate commands print only the new or changed ID.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global dry-run flag for `--dry-run`.
///
/// When set, mutate commands print what they would change and write nothing.
/// Advisor calls that only read still run.
pub static DRY_RUN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if dry-run mode is active.
#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
