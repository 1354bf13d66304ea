//! Prompt text and response schemas for each advisory operation.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::model::{most_recent, JournalEntry, Objective, ObjectiveSnapshot};

/// Entries included in the insights prompt.
pub const INSIGHT_ENTRY_COUNT: usize = 5;

pub fn suggest_key_results(objective_title: &str) -> String {
    format!(
        "Suggest 3 measurable Key Results (KRs) for the following personal objective: \
         \"{objective_title}\". Return only the text of the KRs."
    )
}

pub fn key_results_schema() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn analyze_journal_entry(content: &str, mood: u8, energy: u8) -> String {
    format!(
        "Analyze this journal entry: \"{content}\".\n\
         The user reported Mood: {mood}/10 and Energy: {energy}/10.\n\
         Provide a short, supportive, and insightful feedback summary (max 3 sentences).\n\
         Focus on patterns or encouragement."
    )
}

pub fn draft_journal_from_schedule(schedule: &str) -> String {
    format!(
        "Role: You are a thoughtful personal assistant helping the user reflect on their day.\n\
         Task: Draft a daily journal entry based on the user's schedule/agenda for the day.\n\
         \n\
         User's Schedule:\n\
         \"{schedule}\"\n\
         \n\
         Instructions:\n\
         1. Write in the first person (\"I\").\n\
         2. Create a narrative flow of the day based on the events.\n\
         3. For each key event/meeting, add a reflective placeholder or question about how it went \
         (e.g., \"The 10am sync with the team was [productive/challenging]...\").\n\
         4. Keep the tone natural, reflective, and slightly structured.\n\
         5. Do not invent specific outcomes or decisions, just frame the entry around the events occurring.\n\
         6. Keep it under 200 words."
    )
}

/// Prompt for progress detection. Fails only if the snapshot cannot be encoded.
pub fn suggest_okr_updates(entry_content: &str, snapshot: &[ObjectiveSnapshot]) -> Result<String> {
    let okrs = serde_json::to_string_pretty(snapshot)?;
    Ok(format!(
        "Based on the user's journal entry below, detect if they made progress on any of their Key Results.\n\
         \n\
         Journal Entry: \"{entry_content}\"\n\
         \n\
         Current OKRs:\n\
         {okrs}\n\
         \n\
         Return a list of suggestions where the 'suggestedValue' is the NEW TOTAL value (not just the increment).\n\
         If no clear progress is detected, return an empty array."
    ))
}

pub fn okr_updates_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "objectiveId": { "type": "STRING" },
                "keyResultId": { "type": "STRING" },
                "suggestedValue": { "type": "NUMBER" },
                "reasoning": { "type": "STRING" }
            },
            "required": ["objectiveId", "keyResultId", "suggestedValue", "reasoning"]
        }
    })
}

#[derive(Serialize)]
struct EntrySummary<'a> {
    date: &'a str,
    mood: u8,
    text: &'a str,
}

#[derive(Serialize)]
struct ProgressSummary<'a> {
    title: &'a str,
    progress: u8,
}

/// Insights over the most recent entries and every objective's progress.
pub fn generate_insights(entries: &[JournalEntry], objectives: &[Objective]) -> Result<String> {
    let recent: Vec<EntrySummary<'_>> = most_recent(entries, INSIGHT_ENTRY_COUNT)
        .into_iter()
        .map(|e| EntrySummary {
            date: &e.date,
            mood: e.mood,
            text: &e.content,
        })
        .collect();
    let progress: Vec<ProgressSummary<'_>> = objectives
        .iter()
        .map(|o| ProgressSummary {
            title: &o.title,
            progress: o.progress(),
        })
        .collect();

    Ok(format!(
        "Analyze the last {INSIGHT_ENTRY_COUNT} journal entries and current OKR progress.\n\
         Identify one major positive trend and one area for improvement.\n\
         Keep it concise.\n\
         \n\
         Entries: {}\n\
         OKR Progress: {}",
        serde_json::to_string(&recent)?,
        serde_json::to_string(&progress)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyResult, Period};
    use chrono::{Local, NaiveDate};

    #[test]
    fn test_okr_prompt_embeds_snapshot_ids() {
        let objective = Objective::new("Run a marathon", Period::Annual)
            .with_id("obj-1")
            .with_key_results(vec![KeyResult::new("Distance", 42.0, "km").with_id("kr-1")]);
        let prompt =
            suggest_okr_updates("Ran 10km", &[ObjectiveSnapshot::from(&objective)]).unwrap();

        assert!(prompt.contains("\"Ran 10km\""));
        assert!(prompt.contains("\"id\": \"obj-1\""));
        assert!(prompt.contains("\"id\": \"kr-1\""));
        assert!(prompt.contains("NEW TOTAL"));
        assert!(!prompt.contains("\"progress\""));
    }

    #[test]
    fn test_insights_prompt_uses_most_recent_entries() {
        let now = Local::now();
        let entries: Vec<JournalEntry> = (1..=7)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
                JournalEntry::new(date, now, format!("day {d}"), 5, 5)
            })
            .collect();
        let objectives = vec![Objective::new("Read", Period::Q1)];

        let prompt = generate_insights(&entries, &objectives).unwrap();
        assert!(prompt.contains("day 7"));
        assert!(prompt.contains("day 3"));
        assert!(!prompt.contains("day 2"));
        assert!(prompt.contains(r#"{"title":"Read","progress":0}"#));
    }

    #[test]
    fn test_schemas_require_all_suggestion_fields() {
        let schema = okr_updates_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(key_results_schema()["items"]["type"], "STRING");
    }
}
