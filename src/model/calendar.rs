//! Calendar event model.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A time block from the (simulated) calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
