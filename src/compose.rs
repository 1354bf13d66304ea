//! Journal entry composition.
//!
//! An [`EntryDraft`] moves through Drafting → Analyzing → Created on each
//! submit attempt. Submitting asks the advisor for feedback, appends the
//! entry, and (when objectives exist) asks for key-result updates, which
//! come back as a [`SuggestionReview`].
//!
//! Schedule drafting is ticketed: only the most recently requested draft
//! may change the content.

use chrono::{DateTime, Local, NaiveDate};

use crate::advisor::{Advice, AdvisoryProvider, Advisor};
use crate::error::{Error, Result};
use crate::model::JournalEntry;
use crate::review::SuggestionReview;
use crate::state::AppState;
use crate::validate::validate_rating;

/// Default mood and energy rating.
pub const DEFAULT_RATING: u8 = 7;

/// Where a draft is in its submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposePhase {
    Drafting,
    Analyzing,
    /// `degraded` is set when the feedback is a fallback.
    Created { degraded: bool },
}

/// Handle for one schedule-drafting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftTicket(u64);

/// A journal entry being written.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub content: String,
    pub mood: u8,
    pub energy: u8,
    phase: ComposePhase,
    generation: u64,
}

impl EntryDraft {
    /// Empty draft for `date` with default ratings.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            content: String::new(),
            mood: DEFAULT_RATING,
            energy: DEFAULT_RATING,
            phase: ComposePhase::Drafting,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_ratings(mut self, mood: u8, energy: u8) -> Self {
        self.mood = mood;
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn phase(&self) -> ComposePhase {
        self.phase
    }

    /// Start a schedule-drafting request. Supersedes any earlier ticket.
    pub fn begin_schedule_draft(&mut self) -> DraftTicket {
        self.generation += 1;
        DraftTicket(self.generation)
    }

    /// Append a drafted text, if `ticket` is still the latest request.
    ///
    /// Existing content is kept and separated from the draft by a blank
    /// line. Empty drafts change nothing. Returns whether the content
    /// changed.
    pub fn apply_schedule_draft(&mut self, ticket: DraftTicket, text: &str) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, latest = self.generation, "discarding superseded draft");
            return false;
        }

        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        if self.content.trim().is_empty() {
            self.content = text.to_string();
        } else {
            self.content = format!("{}\n\n{text}", self.content.trim_end());
        }
        true
    }
}

/// Draft from a schedule and append the result to `draft`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `schedule` is blank. Advisor
/// failures are not errors; they yield an empty fallback draft.
pub async fn draft_from_schedule<P: AdvisoryProvider>(
    advisor: &Advisor<P>,
    draft: &mut EntryDraft,
    schedule: &str,
) -> Result<Advice<String>> {
    if schedule.trim().is_empty() {
        return Err(Error::InvalidArgument("schedule text is empty".into()));
    }

    let ticket = draft.begin_schedule_draft();
    let text = advisor.draft_journal_from_schedule(schedule).await;
    draft.apply_schedule_draft(ticket, text.value());
    Ok(text)
}

/// The result of a successful submit.
#[derive(Debug, Clone)]
pub struct Submission {
    /// State with the new entry appended; commit it.
    pub state: AppState,
    pub entry: JournalEntry,
    pub feedback: Advice<String>,
    /// Open when the advisor proposed updates to existing key results.
    pub review: Option<SuggestionReview>,
}

/// Submit `draft`: validate, analyze, create the entry, look for progress.
///
/// On a validation error the draft stays in Drafting and nothing is
/// created. Advisor failures never fail the submit.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for blank content or a rating
/// outside 1-10.
pub async fn submit_entry<P: AdvisoryProvider>(
    advisor: &Advisor<P>,
    state: &AppState,
    draft: &mut EntryDraft,
    now: DateTime<Local>,
) -> Result<Submission> {
    if draft.content.trim().is_empty() {
        return Err(Error::InvalidArgument("journal entry content is empty".into()));
    }
    let mood = validate_rating("mood", draft.mood)?;
    let energy = validate_rating("energy", draft.energy)?;

    draft.phase = ComposePhase::Analyzing;
    let feedback = advisor
        .analyze_journal_entry(&draft.content, mood, energy)
        .await;

    let entry = JournalEntry::new(draft.date, now, draft.content.clone(), mood, energy)
        .with_feedback(feedback.value().clone());
    let next = state.add_entry(entry.clone());

    let review = if next.objectives().is_empty() {
        None
    } else {
        let updates = advisor
            .suggest_okr_updates(&draft.content, &next.snapshot())
            .await;
        SuggestionReview::open(updates.into_value(), &next)
    };

    draft.phase = ComposePhase::Created {
        degraded: feedback.is_fallback(),
    };
    tracing::debug!(entry_id = %entry.id, degraded = feedback.is_fallback(), "journal entry created");

    Ok(Submission {
        state: next,
        entry,
        feedback,
        review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::mock::ScriptedProvider;
    use crate::advisor::{FallbackReason, FALLBACK_FEEDBACK};
    use crate::model::{KeyResult, Objective, Period};
    use crate::review::Acceptance;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn marathon_state() -> AppState {
        let objective = Objective::new("Run a marathon", Period::Annual)
            .with_id("o1")
            .with_key_results(vec![
                KeyResult::new("Distance", 42.0, "km").with_id("kr1"),
                KeyResult::new("Long runs", 10.0, "runs").with_id("kr2"),
            ]);
        AppState::new(vec![objective], Vec::new())
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut draft = EntryDraft::new(today());
        let first = draft.begin_schedule_draft();
        let second = draft.begin_schedule_draft();

        assert!(draft.apply_schedule_draft(second, "Second draft"));
        assert!(!draft.apply_schedule_draft(first, "First draft"));
        assert_eq!(draft.content, "Second draft");
    }

    #[test]
    fn test_draft_appends_with_blank_line() {
        let mut draft = EntryDraft::new(today()).with_content("Morning notes");
        let ticket = draft.begin_schedule_draft();
        assert!(draft.apply_schedule_draft(ticket, "I started with the standup."));
        assert_eq!(draft.content, "Morning notes\n\nI started with the standup.");
    }

    #[test]
    fn test_empty_draft_leaves_content() {
        let mut draft = EntryDraft::new(today()).with_content("Keep me");
        let ticket = draft.begin_schedule_draft();
        assert!(!draft.apply_schedule_draft(ticket, "  "));
        assert_eq!(draft.content, "Keep me");
    }

    #[tokio::test]
    async fn test_draft_from_blank_schedule_rejected() {
        let advisor: Advisor<ScriptedProvider> = Advisor::unconfigured();
        let mut draft = EntryDraft::new(today());
        let err = draft_from_schedule(&advisor, &mut draft, " \n").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_draft_from_schedule_live() {
        let advisor = Advisor::new(ScriptedProvider::new().reply("I began the day at standup."));
        let mut draft = EntryDraft::new(today());
        let advice = draft_from_schedule(&advisor, &mut draft, "9:00 AM - Team Standup")
            .await
            .unwrap();
        assert!(!advice.is_fallback());
        assert_eq!(draft.content, "I began the day at standup.");
    }

    #[tokio::test]
    async fn test_blank_content_stays_drafting() {
        let advisor: Advisor<ScriptedProvider> = Advisor::unconfigured();
        let state = AppState::default();
        let mut draft = EntryDraft::new(today()).with_content("   ");

        let err = submit_entry(&advisor, &state, &mut draft, Local::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(draft.phase(), ComposePhase::Drafting);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_rejected() {
        let advisor: Advisor<ScriptedProvider> = Advisor::unconfigured();
        let mut draft = EntryDraft::new(today()).with_content("text").with_ratings(11, 5);
        let err = submit_entry(&advisor, &AppState::default(), &mut draft, Local::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_submit_degrades_without_review() {
        let advisor: Advisor<ScriptedProvider> = Advisor::unconfigured();
        let state = marathon_state();
        let mut draft = EntryDraft::new(today()).with_content("Ran 10km today");

        let submission = submit_entry(&advisor, &state, &mut draft, Local::now())
            .await
            .unwrap();

        assert_eq!(submission.feedback.value(), FALLBACK_FEEDBACK);
        assert_eq!(submission.feedback.reason(), Some(&FallbackReason::Unconfigured));
        assert!(submission.review.is_none());
        assert_eq!(submission.state.entries().len(), 1);
        assert_eq!(
            submission.state.entries()[0].ai_feedback.as_deref(),
            Some(FALLBACK_FEEDBACK)
        );
        assert_eq!(draft.phase(), ComposePhase::Created { degraded: true });
        assert!(state.entries().is_empty());
    }

    #[tokio::test]
    async fn test_live_submit_opens_review() {
        let provider = ScriptedProvider::new()
            .reply("Great consistency this week.")
            .reply(
                r#"[{"objectiveId":"o1","keyResultId":"kr1","suggestedValue":21,"reasoning":"half marathon"},
                    {"objectiveId":"o1","keyResultId":"nope","suggestedValue":1,"reasoning":"stale"}]"#,
            );
        let advisor = Advisor::new(provider.clone());
        let state = marathon_state();
        let mut draft = EntryDraft::new(today()).with_content("Ran a half marathon");

        let submission = submit_entry(&advisor, &state, &mut draft, Local::now())
            .await
            .unwrap();

        assert_eq!(submission.feedback, Advice::Live("Great consistency this week.".into()));
        assert_eq!(draft.phase(), ComposePhase::Created { degraded: false });
        assert!(provider.prompts()[1].contains("\"id\": \"kr1\""));

        let mut review = submission.review.unwrap();
        assert_eq!(review.pending().len(), 1);
        let Acceptance::Applied(next) = review
            .accept(&submission.state, "o1", "kr1", None)
            .unwrap()
        else {
            panic!("expected applied");
        };
        assert_eq!(next.objective("o1").unwrap().progress(), 25);
        assert_eq!(next.entries().len(), 1);
        assert!(!review.is_open());
    }

    #[tokio::test]
    async fn test_no_objectives_skips_update_call() {
        let provider = ScriptedProvider::new().reply("Nice.");
        let advisor = Advisor::new(provider.clone());
        let mut draft = EntryDraft::new(today()).with_content("Quiet day");

        let submission = submit_entry(&advisor, &AppState::default(), &mut draft, Local::now())
            .await
            .unwrap();
        assert!(submission.review.is_none());
        assert_eq!(provider.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_call_still_creates_entry() {
        let advisor = Advisor::new(ScriptedProvider::new().reply("Good.").fail("timeout"));
        let mut draft = EntryDraft::new(today()).with_content("Ran");

        let submission = submit_entry(&advisor, &marathon_state(), &mut draft, Local::now())
            .await
            .unwrap();
        assert!(submission.review.is_none());
        assert_eq!(submission.state.entries().len(), 1);
    }
}
