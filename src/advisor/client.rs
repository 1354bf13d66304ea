//! The advisory client: five operations, each with a fixed fallback.
//!
//! No operation ever returns an error. A missing credential and a failed
//! call both produce the operation's fallback value, tagged with the reason.

use serde::de::DeserializeOwned;

use super::advice::Advice;
use super::config::resolve_advisor;
use super::gemini::GeminiProvider;
use super::prompts;
use super::provider::{AdvisoryProvider, ProviderInfo};
use crate::error::{Error, Result};
use crate::model::{AiUpdateSuggestion, JournalEntry, Objective, ObjectiveSnapshot};

/// Fallback key-result drafts.
pub const FALLBACK_KEY_RESULTS: [&str; 3] =
    ["Set specific target", "Achieve milestone X", "Maintain metric Y"];

/// Fallback journal feedback.
pub const FALLBACK_FEEDBACK: &str = "Keep going! Reflection is key to progress.";

/// Feedback used when the model replies with nothing.
pub const EMPTY_FEEDBACK: &str = "Great entry!";

/// Fallback insights text.
pub const FALLBACK_INSIGHTS: &str = "No insights available.";

/// AI advisory client over a provider. Without a provider every call falls back.
pub struct Advisor<P> {
    provider: Option<P>,
}

impl<P: AdvisoryProvider> Advisor<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An advisor with no credential.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_info(&self) -> Option<ProviderInfo> {
        self.provider.as_ref().map(AdvisoryProvider::info)
    }

    /// Draft three measurable key results for an objective title.
    ///
    /// Ideas are trimmed and blank ones dropped.
    pub async fn suggest_key_results(&self, objective_title: &str) -> Advice<Vec<String>> {
        let fallback = || {
            FALLBACK_KEY_RESULTS
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        let prompt = prompts::suggest_key_results(objective_title);
        self.json_call("suggest_key_results", Ok(prompt), &prompts::key_results_schema(), fallback)
            .await
            .map(|ideas: Vec<String>| {
                ideas
                    .into_iter()
                    .map(|idea| idea.trim().to_string())
                    .filter(|idea| !idea.is_empty())
                    .collect()
            })
    }

    /// Short supportive feedback on a journal entry.
    pub async fn analyze_journal_entry(&self, content: &str, mood: u8, energy: u8) -> Advice<String> {
        let prompt = prompts::analyze_journal_entry(content, mood, energy);
        self.text_call("analyze_journal_entry", Ok(prompt), FALLBACK_FEEDBACK, EMPTY_FEEDBACK)
            .await
    }

    /// First-person journal draft framed around a schedule. Falls back to empty.
    pub async fn draft_journal_from_schedule(&self, schedule: &str) -> Advice<String> {
        let prompt = prompts::draft_journal_from_schedule(schedule);
        self.text_call("draft_journal_from_schedule", Ok(prompt), "", "")
            .await
    }

    /// Detect key-result progress described in an entry.
    ///
    /// Suggested values are new totals. Falls back to no suggestions.
    pub async fn suggest_okr_updates(
        &self,
        entry_content: &str,
        snapshot: &[ObjectiveSnapshot],
    ) -> Advice<Vec<AiUpdateSuggestion>> {
        let prompt = prompts::suggest_okr_updates(entry_content, snapshot);
        self.json_call("suggest_okr_updates", prompt, &prompts::okr_updates_schema(), Vec::new)
            .await
    }

    /// One positive trend and one area for improvement.
    pub async fn generate_insights(
        &self,
        entries: &[JournalEntry],
        objectives: &[Objective],
    ) -> Advice<String> {
        let prompt = prompts::generate_insights(entries, objectives);
        self.text_call("generate_insights", prompt, FALLBACK_INSIGHTS, FALLBACK_INSIGHTS)
            .await
    }

    async fn text_call(
        &self,
        operation: &'static str,
        prompt: Result<String>,
        fallback: &str,
        when_empty: &str,
    ) -> Advice<String> {
        let Some(provider) = &self.provider else {
            return Advice::unconfigured(fallback.to_string());
        };

        let reply = match prompt {
            Ok(prompt) => provider.generate_text(&prompt).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(text) if text.trim().is_empty() => Advice::Live(when_empty.to_string()),
            Ok(text) => Advice::Live(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(operation, error = %e, "advisor call failed, using fallback");
                Advice::failed(fallback.to_string(), e)
            }
        }
    }

    async fn json_call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        prompt: Result<String>,
        schema: &serde_json::Value,
        fallback: impl FnOnce() -> T,
    ) -> Advice<T> {
        let Some(provider) = &self.provider else {
            return Advice::unconfigured(fallback());
        };

        let parsed = match prompt {
            Ok(prompt) => provider
                .generate_json(&prompt, schema)
                .await
                .and_then(|text| parse_json_reply(&text)),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(value) => Advice::Live(value),
            Err(e) => {
                tracing::warn!(operation, error = %e, "advisor call failed, using fallback");
                Advice::failed(fallback(), e)
            }
        }
    }
}

fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Advisor("empty reply".into()));
    }
    serde_json::from_str(text).map_err(|e| Error::Advisor(format!("unparsable reply: {e}")))
}

/// Create the advisor from configuration.
///
/// Returns an unconfigured advisor when the advisor is disabled or no API
/// key is set.
pub fn create_advisor() -> Advisor<GeminiProvider> {
    let resolved = resolve_advisor();

    if !resolved.enabled {
        tracing::debug!("advisor disabled");
        return Advisor::unconfigured();
    }

    match resolved.api_key {
        Some(key) => {
            tracing::debug!(model = %resolved.model, "advisor configured");
            Advisor::new(GeminiProvider::with_config(
                Some(resolved.endpoint),
                Some(resolved.model),
                key,
            ))
        }
        None => {
            tracing::debug!("no API key, advisor unconfigured");
            Advisor::unconfigured()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::advice::FallbackReason;
    use crate::advisor::mock::ScriptedProvider;

    fn unconfigured() -> Advisor<ScriptedProvider> {
        Advisor::unconfigured()
    }

    #[tokio::test]
    async fn test_unconfigured_fallbacks() {
        let advisor = unconfigured();
        assert!(!advisor.is_configured());

        let krs = advisor.suggest_key_results("Run").await;
        assert_eq!(krs.reason(), Some(&FallbackReason::Unconfigured));
        assert_eq!(krs.value().len(), 3);
        assert_eq!(krs.value()[0], "Set specific target");

        let feedback = advisor.analyze_journal_entry("text", 7, 7).await;
        assert_eq!(feedback.value(), FALLBACK_FEEDBACK);

        let draft = advisor.draft_journal_from_schedule("9:00 AM - Standup").await;
        assert!(draft.is_fallback());
        assert!(draft.value().is_empty());

        let updates = advisor.suggest_okr_updates("text", &[]).await;
        assert!(updates.is_fallback());
        assert!(updates.value().is_empty());

        let insights = advisor.generate_insights(&[], &[]).await;
        assert_eq!(insights.value(), FALLBACK_INSIGHTS);
    }

    #[tokio::test]
    async fn test_failed_call_uses_same_fallback() {
        let advisor = Advisor::new(ScriptedProvider::new().fail("boom").fail("boom"));

        let feedback = advisor.analyze_journal_entry("text", 3, 4).await;
        assert_eq!(feedback.value(), FALLBACK_FEEDBACK);
        assert!(matches!(feedback.reason(), Some(FallbackReason::CallFailed(msg)) if msg.contains("boom")));

        let krs = advisor.suggest_key_results("Run").await;
        assert_eq!(krs.into_value().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_analysis_reply_is_great_entry() {
        let advisor = Advisor::new(ScriptedProvider::new().reply("   "));
        let feedback = advisor.analyze_journal_entry("text", 7, 7).await;
        assert_eq!(feedback, Advice::Live(EMPTY_FEEDBACK.to_string()));
    }

    #[tokio::test]
    async fn test_live_key_results() {
        let provider = ScriptedProvider::new().reply(r#"["Run 500 km","Finish a half","Stretch daily"]"#);
        let advisor = Advisor::new(provider.clone());

        let krs = advisor.suggest_key_results("Run a marathon").await;
        assert_eq!(krs.value().len(), 3);
        assert!(!krs.is_fallback());
        assert!(provider.prompts()[0].contains("\"Run a marathon\""));
    }

    #[tokio::test]
    async fn test_blank_key_result_ideas_are_dropped() {
        let advisor =
            Advisor::new(ScriptedProvider::new().reply(r#"["Run 500 km", "", "  Stretch daily "]"#));

        let krs = advisor.suggest_key_results("Run a marathon").await;
        assert_eq!(
            krs,
            Advice::Live(vec!["Run 500 km".to_string(), "Stretch daily".to_string()])
        );
    }

    #[tokio::test]
    async fn test_unparsable_json_falls_back() {
        let advisor = Advisor::new(ScriptedProvider::new().reply("not json").reply(""));

        let updates = advisor.suggest_okr_updates("ran", &[]).await;
        assert!(updates.is_fallback());
        assert!(updates.value().is_empty());

        let krs = advisor.suggest_key_results("Run").await;
        assert!(krs.is_fallback());
        assert_eq!(krs.value()[2], "Maintain metric Y");
    }

    #[tokio::test]
    async fn test_live_okr_updates() {
        let reply = r#"[{"objectiveId":"o1","keyResultId":"k1","suggestedValue":21,"reasoning":"Ran 21km"}]"#;
        let advisor = Advisor::new(ScriptedProvider::new().reply(reply));

        let updates = advisor.suggest_okr_updates("ran", &[]).await.into_value();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].targets("o1", "k1"));
        assert!((updates[0].suggested_value - 21.0).abs() < f64::EPSILON);
    }
}
