//! Dashboard statistics over objectives and journal entries.

use serde::Serialize;

use crate::advisor::{Advice, AdvisoryProvider, Advisor};
use crate::model::most_recent;
use crate::state::AppState;

/// Entries shown in the mood/energy trend.
pub const TREND_WINDOW: usize = 14;

/// Shown instead of insights until there is something to analyze.
pub const INSIGHTS_PLACEHOLDER: &str = "Add more goals and journal entries to unlock \
personalized AI insights about your performance patterns.";

/// One point of the mood/energy trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Short local date, e.g. `May 5`
    pub label: String,
    pub mood: u8,
    pub energy: u8,
}

/// Aggregate figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_objectives: usize,
    pub completed_objectives: usize,
    pub active_objectives: usize,
    pub average_progress: u8,
    /// Energy of the most recent entry
    pub recent_energy: Option<u8>,
    /// Oldest first
    pub trend: Vec<TrendPoint>,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(state: &AppState) -> Self {
        let objectives = state.objectives();
        let total = objectives.len();
        let completed = objectives.iter().filter(|o| o.is_complete()).count();

        let average_progress = if total == 0 {
            0
        } else {
            let sum: f64 = objectives.iter().map(|o| f64::from(o.progress())).sum();
            rounded_mean(sum, total)
        };

        let recent = most_recent(state.entries(), TREND_WINDOW);
        let recent_energy = recent.first().map(|e| e.energy);
        let trend = recent
            .iter()
            .rev()
            .map(|e| TrendPoint {
                label: e
                    .local_date()
                    .map_or_else(|| "?".to_string(), |d| d.format("%b %-d").to_string()),
                mood: e.mood,
                energy: e.energy,
            })
            .collect();

        Self {
            total_objectives: total,
            completed_objectives: completed,
            active_objectives: total - completed,
            average_progress,
            recent_energy,
            trend,
        }
    }
}

/// Whether there is enough data to ask for insights.
#[must_use]
pub fn insights_ready(state: &AppState) -> bool {
    !state.entries().is_empty() && !state.objectives().is_empty()
}

/// Ask the advisor for insights, or `None` when [`insights_ready`] is false.
pub async fn insights<P: AdvisoryProvider>(
    advisor: &Advisor<P>,
    state: &AppState,
) -> Option<Advice<String>> {
    if !insights_ready(state) {
        return None;
    }
    Some(
        advisor
            .generate_insights(state.entries(), state.objectives())
            .await,
    )
}

/// Mean of `sum` over `count` items, rounded into 0-100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn rounded_mean(sum: f64, count: usize) -> u8 {
    (sum / count as f64).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::mock::ScriptedProvider;
    use crate::advisor::FALLBACK_INSIGHTS;
    use crate::model::{JournalEntry, KeyResult, Objective, Period};
    use chrono::{Local, NaiveDate};

    fn objective(title: &str, current: f64) -> Objective {
        Objective::new(title, Period::Q1)
            .with_key_results(vec![KeyResult::new("kr", 100.0, "%").with_current(current)])
    }

    fn entry(day: u32, energy: u8) -> JournalEntry {
        let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        JournalEntry::new(date, Local::now(), format!("day {day}"), 6, energy)
    }

    #[test]
    fn test_empty_state() {
        let stats = DashboardStats::compute(&AppState::default());
        assert_eq!(stats.total_objectives, 0);
        assert_eq!(stats.average_progress, 0);
        assert_eq!(stats.recent_energy, None);
        assert!(stats.trend.is_empty());
        assert!(!insights_ready(&AppState::default()));
    }

    #[test]
    fn test_counts_and_average() {
        let state = AppState::new(
            vec![objective("a", 100.0), objective("b", 25.0), objective("c", 0.0)],
            Vec::new(),
        );
        let stats = DashboardStats::compute(&state);
        assert_eq!(stats.total_objectives, 3);
        assert_eq!(stats.completed_objectives, 1);
        assert_eq!(stats.active_objectives, 2);
        // (100 + 25 + 0) / 3 = 41.67
        assert_eq!(stats.average_progress, 42);
    }

    #[test]
    fn test_rounded_mean_stays_in_range() {
        assert_eq!(rounded_mean(125.0, 3), 42);
        assert_eq!(rounded_mean(250.0, 2), 100);
        assert_eq!(rounded_mean(1.0, 2), 1);
    }

    #[test]
    fn test_trend_window_and_recent_energy() {
        // Recorded out of date order; the latest date is day 20
        let mut entries: Vec<JournalEntry> = (1..=19).map(|d| entry(d, 5)).collect();
        entries.insert(3, entry(20, 9));
        let state = AppState::new(Vec::new(), entries);

        let stats = DashboardStats::compute(&state);
        assert_eq!(stats.recent_energy, Some(9));
        assert_eq!(stats.trend.len(), TREND_WINDOW);
        assert_eq!(stats.trend.first().unwrap().label, "May 7");
        assert_eq!(stats.trend.last().unwrap().label, "May 20");
    }

    #[tokio::test]
    async fn test_insights_need_entries_and_objectives() {
        let advisor: Advisor<ScriptedProvider> = Advisor::unconfigured();

        let only_goals = AppState::new(vec![objective("a", 0.0)], Vec::new());
        assert!(insights(&advisor, &only_goals).await.is_none());

        let both = AppState::new(vec![objective("a", 0.0)], vec![entry(1, 5)]);
        let advice = insights(&advisor, &both).await.unwrap();
        assert_eq!(advice.value(), FALLBACK_INSIGHTS);
    }

    #[tokio::test]
    async fn test_live_insights() {
        let advisor = Advisor::new(ScriptedProvider::new().reply("Mood rises after runs."));
        let state = AppState::new(vec![objective("a", 50.0)], vec![entry(2, 8)]);
        let advice = insights(&advisor, &state).await.unwrap();
        assert_eq!(advice, Advice::Live("Mood rises after runs.".to_string()));
    }
}
