//! Simulated calendar integration.
//!
//! There is no real calendar API behind this client: `connect` always
//! succeeds and `fetch_events` returns a fixed weekday or weekend schedule
//! after a short artificial delay.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::model::CalendarEvent;

/// Simulated consent delay for [`CalendarClient::connect`].
pub const CONNECT_DELAY: Duration = Duration::from_millis(1500);

/// Simulated latency for [`CalendarClient::fetch_events`].
pub const FETCH_DELAY: Duration = Duration::from_millis(800);

/// Formatted schedule when there are no events.
pub const NO_EVENTS: &str = "No events scheduled for this day.";

/// Sample agenda for trying schedule drafting without a calendar.
pub const DEMO_SCHEDULE: &str = "9:00 AM - Weekly Team Sync\n\
10:30 AM - Client Project Review\n\
12:00 PM - Lunch with Sarah\n\
2:00 PM - Deep Work: Q2 Planning\n\
4:30 PM - Gym Session";

/// (id, title, start offset, end offset); offsets are minutes after 09:00.
type Slot = (&'static str, &'static str, i64, i64);

const WEEKDAY_SLOTS: [Slot; 5] = [
    ("1", "Team Standup", 0, 30),
    ("2", "Deep Work: Product Strategy", 60, 180),
    ("3", "Lunch Break", 210, 270),
    ("4", "Client Sync", 300, 360),
    ("5", "Wrap up & Planning", 450, 480),
];

const WEEKEND_SLOTS: [Slot; 4] = [
    ("w1", "Morning Run", 0, 60),
    ("w2", "Brunch with Family", 120, 240),
    ("w3", "Grocery Shopping", 300, 360),
    ("w4", "Relaxation & Reading", 420, 540),
];

/// Calendar client with configurable simulated delays.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    connect_delay: Duration,
    fetch_delay: Duration,
    connected: bool,
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarClient {
    /// Client with the standard simulated delays.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delays(CONNECT_DELAY, FETCH_DELAY)
    }

    /// Client that answers immediately.
    #[must_use]
    pub fn instant() -> Self {
        Self::with_delays(Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub fn with_delays(connect_delay: Duration, fetch_delay: Duration) -> Self {
        Self {
            connect_delay,
            fetch_delay,
            connected: false,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Simulate the consent flow. Always succeeds.
    pub async fn connect(&mut self) -> bool {
        tokio::time::sleep(self.connect_delay).await;
        self.connected = true;
        tracing::debug!("calendar connected");
        true
    }

    /// Events for `date`: the weekend schedule on Saturday and Sunday,
    /// otherwise the weekday schedule.
    pub async fn fetch_events(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        tokio::time::sleep(self.fetch_delay).await;
        schedule_for(date)
    }
}

/// The fixed schedule for a date, without delay.
#[must_use]
pub fn schedule_for(date: NaiveDate) -> Vec<CalendarEvent> {
    let slots: &[Slot] = match date.weekday() {
        Weekday::Sat | Weekday::Sun => &WEEKEND_SLOTS,
        _ => &WEEKDAY_SLOTS,
    };

    let anchor = date.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN));
    slots
        .iter()
        .map(|&(id, title, start, end)| CalendarEvent {
            id: id.to_string(),
            title: title.to_string(),
            start: anchor + chrono::Duration::minutes(start),
            end: anchor + chrono::Duration::minutes(end),
        })
        .collect()
}

/// One `"h:mm AM - Title"` line per event, or [`NO_EVENTS`].
#[must_use]
pub fn format_for_prompt(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return NO_EVENTS.to_string();
    }

    events
        .iter()
        .map(|e| format!("{} - {}", format_time(e.start), e.title))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}
