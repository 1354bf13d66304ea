//! Journal entry model.
//!
//! Entries are append-only: once created they are never edited, and the AI
//! feedback is attached at creation time.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A daily reflection with mood and energy ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Unique identifier (UUID format)
    pub id: String,

    /// RFC 3339 UTC timestamp: the chosen local date at the save-time clock
    pub date: String,

    /// Free text
    pub content: String,

    /// Mood rating, 1-10
    pub mood: u8,

    /// Energy rating, 1-10
    pub energy: u8,

    /// Feedback from the advisor, set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,

    /// Free-form tags (kept for compatibility, unused)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl JournalEntry {
    /// Create an entry dated `date` at the time-of-day of `now`.
    pub fn new(
        date: NaiveDate,
        now: DateTime<Local>,
        content: impl Into<String>,
        mood: u8,
        energy: u8,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: entry_timestamp(date, now),
            content: content.into(),
            mood,
            energy,
            ai_feedback: None,
            tags: None,
        }
    }

    /// Attach the advisor feedback.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.ai_feedback = Some(feedback.into());
        self
    }

    /// Parse the stored timestamp back into local time.
    #[must_use]
    pub fn local_datetime(&self) -> Option<DateTime<Local>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Local))
    }

    /// Local calendar date of the entry, if the timestamp parses.
    #[must_use]
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_datetime().map(|dt| dt.date_naive())
    }
}

/// The `limit` most recent entries by timestamp, newest first.
///
/// Entries with the same timestamp keep recording order, latest first.
/// Unparsable timestamps sort last.
#[must_use]
pub fn most_recent(entries: &[JournalEntry], limit: usize) -> Vec<&JournalEntry> {
    let mut recent: Vec<&JournalEntry> = entries.iter().rev().collect();
    recent.sort_by_key(|e| std::cmp::Reverse(e.local_datetime()));
    recent.truncate(limit);
    recent
}

/// Combine a calendar date with the local time-of-day of `now`.
///
/// Local times that do not exist (DST gaps) fall back to `now` itself.
fn entry_timestamp(date: NaiveDate, now: DateTime<Local>) -> String {
    let naive = date.and_time(now.time());
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or(now);
    local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_entry_keeps_chosen_date_and_clock_time() {
        let now = Local::now();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let entry = JournalEntry::new(date, now, "Shipped the release", 8, 6);

        assert!(entry.date.ends_with('Z'));
        let local = entry.local_datetime().unwrap();
        assert_eq!(local.date_naive(), date);
        assert_eq!(local.hour(), now.hour());
        assert_eq!(local.minute(), now.minute());
        assert!(entry.ai_feedback.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let entry = JournalEntry::new(date, Local::now(), "text", 5, 4).with_feedback("Nice");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["aiFeedback"], "Nice");
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_most_recent_orders_by_date_not_insertion() {
        let now = Local::now();
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let entries = vec![
            JournalEntry::new(day(3), now, "third", 5, 5),
            JournalEntry::new(day(1), now, "first", 5, 5),
            JournalEntry::new(day(2), now, "second", 5, 5),
        ];

        let recent: Vec<&str> = most_recent(&entries, 2)
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(recent, vec!["third", "second"]);
        assert_eq!(most_recent(&entries, 10).len(), 3);
        assert!(most_recent(&[], 5).is_empty());
    }

    #[test]
    fn test_tags_survive_round_trip() {
        let raw = r#"{"id":"e1","date":"2024-01-02T10:00:00.000Z","content":"x","mood":7,"energy":7,"tags":["run"]}"#;
        let entry: JournalEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.tags, Some(vec!["run".to_string()]));
        let back: JournalEntry =
            serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
        assert_eq!(back, entry);
    }
}
