//! Data models for Orbit.
//!
//! This module contains all domain models:
//! - Objective, KeyResult (with the progress calculator)
//! - JournalEntry
//! - AiUpdateSuggestion and the advisor snapshots
//! - CalendarEvent

pub mod calendar;
pub mod journal;
pub mod objective;
pub mod suggestion;

pub use calendar::CalendarEvent;
pub use journal::{most_recent, JournalEntry};
pub use objective::{calculate_progress, KeyResult, KrStatus, Objective, Period};
pub use suggestion::{AiUpdateSuggestion, KeyResultSnapshot, ObjectiveSnapshot};
