//! Review of pending AI update suggestions.
//!
//! A review holds the suggestions produced for one journal entry. Each one
//! is identified by its `(objective_id, key_result_id)` pair and is either
//! accepted (applied to the state, possibly with an edited value) or
//! discarded with the rest by [`SuggestionReview::dismiss`]. The review
//! closes when nothing is left.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::AiUpdateSuggestion;
use crate::state::AppState;

/// A pending suggestion joined with the live titles and value it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub objective_id: String,
    pub key_result_id: String,
    pub objective_title: String,
    pub key_result_title: String,
    pub current_value: f64,
    pub suggested_value: f64,
    pub unit: String,
    pub reasoning: String,
}

/// Outcome of accepting one suggestion.
#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance {
    /// The key result was updated; commit this state.
    Applied(AppState),
    /// The referenced key result no longer exists; nothing changed.
    Dropped,
}

/// The set of suggestions awaiting a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionReview {
    pending: Vec<AiUpdateSuggestion>,
}

impl SuggestionReview {
    /// Open a review over `suggestions`.
    ///
    /// Suggestions that reference a missing objective or key result are
    /// dropped, as are repeats of an earlier pair. Returns `None` when
    /// nothing is left to review.
    #[must_use]
    pub fn open(suggestions: Vec<AiUpdateSuggestion>, state: &AppState) -> Option<Self> {
        let mut pending: Vec<AiUpdateSuggestion> = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            let exists = state
                .key_result(&suggestion.objective_id, &suggestion.key_result_id)
                .is_some();
            let repeat = pending
                .iter()
                .any(|p| p.targets(&suggestion.objective_id, &suggestion.key_result_id));
            if !exists {
                tracing::debug!(
                    objective_id = %suggestion.objective_id,
                    key_result_id = %suggestion.key_result_id,
                    "dropping suggestion for unknown key result"
                );
            } else if !repeat {
                pending.push(suggestion);
            }
        }

        if pending.is_empty() {
            None
        } else {
            Some(Self { pending })
        }
    }

    pub fn is_open(&self) -> bool {
        !self.pending.is_empty()
    }

    /// All pending suggestions, including any that have gone stale.
    pub fn pending(&self) -> &[AiUpdateSuggestion] {
        &self.pending
    }

    /// Pending suggestions whose key result still exists in `state`.
    #[must_use]
    pub fn visible(&self, state: &AppState) -> Vec<ReviewItem> {
        self.pending
            .iter()
            .filter_map(|s| {
                let objective = state.objective(&s.objective_id)?;
                let kr = objective.key_result(&s.key_result_id)?;
                Some(ReviewItem {
                    objective_id: s.objective_id.clone(),
                    key_result_id: s.key_result_id.clone(),
                    objective_title: objective.title.clone(),
                    key_result_title: kr.title.clone(),
                    current_value: kr.current_value,
                    suggested_value: s.suggested_value,
                    unit: kr.unit.clone(),
                    reasoning: s.reasoning.clone(),
                })
            })
            .collect()
    }

    /// Accept the suggestion for the given pair, optionally with an edited value.
    ///
    /// The suggestion leaves the pending set either way. If its key result
    /// has disappeared from `state` it is dropped without being applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SuggestionNotFound`] if no pending suggestion has
    /// this pair, or [`Error::InvalidArgument`] for a non-finite value.
    pub fn accept(
        &mut self,
        state: &AppState,
        objective_id: &str,
        key_result_id: &str,
        value: Option<f64>,
    ) -> Result<Acceptance> {
        let index = self
            .pending
            .iter()
            .position(|s| s.targets(objective_id, key_result_id))
            .ok_or_else(|| Error::SuggestionNotFound {
                objective_id: objective_id.to_string(),
                key_result_id: key_result_id.to_string(),
            })?;

        let value = value.unwrap_or(self.pending[index].suggested_value);
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!("value must be a number, got {value}")));
        }

        let suggestion = self.pending.remove(index);
        if state.key_result(objective_id, key_result_id).is_none() {
            tracing::debug!(objective_id, key_result_id, "accepted suggestion went stale, dropped");
            return Ok(Acceptance::Dropped);
        }

        Ok(Acceptance::Applied(state.apply_suggestion(&suggestion, value)?))
    }

    /// Discard every remaining suggestion.
    pub fn dismiss(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyResult, Objective, Period};

    fn suggestion(obj: &str, kr: &str, value: f64) -> AiUpdateSuggestion {
        AiUpdateSuggestion {
            objective_id: obj.into(),
            key_result_id: kr.into(),
            suggested_value: value,
            reasoning: "mentioned in entry".into(),
        }
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
    fn test_open_filters_unknown_and_repeated_pairs() {
        let state = marathon_state();
        let review = SuggestionReview::open(
            vec![
                suggestion("o1", "kr1", 21.0),
                suggestion("o1", "missing", 3.0),
                suggestion("gone", "kr1", 3.0),
                suggestion("o1", "kr1", 30.0),
            ],
            &state,
        )
        .unwrap();

        assert_eq!(review.pending().len(), 1);
        assert!((review.pending()[0].suggested_value - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_with_nothing_valid_is_none() {
        let state = marathon_state();
        assert!(SuggestionReview::open(vec![], &state).is_none());
        assert!(SuggestionReview::open(vec![suggestion("x", "y", 1.0)], &state).is_none());
    }

    #[test]
    fn test_accept_one_leaves_other_pending() {
        let state = marathon_state();
        let mut review = SuggestionReview::open(
            vec![suggestion("o1", "kr1", 21.0), suggestion("o1", "kr2", 4.0)],
            &state,
        )
        .unwrap();

        let Acceptance::Applied(next) = review.accept(&state, "o1", "kr1", None).unwrap() else {
            panic!("expected applied");
        };

        let kr1 = next.key_result("o1", "kr1").unwrap();
        assert!((kr1.current_value - 21.0).abs() < f64::EPSILON);
        assert!(next.key_result("o1", "kr2").unwrap().current_value.abs() < f64::EPSILON);
        assert!(review.is_open());
        assert_eq!(review.pending().len(), 1);
        assert_eq!(review.pending()[0].key_result_id, "kr2");
        // (50 + 0) / 2
        assert_eq!(next.objective("o1").unwrap().progress(), 25);
    }

    #[test]
    fn test_accept_removes_only_matching_pair() {
        let shared_kr = |title: &str| {
            Objective::new(title, Period::Q1)
                .with_key_results(vec![KeyResult::new("Sessions", 10.0, "sessions").with_id("kr1")])
        };
        let state = AppState::new(
            vec![shared_kr("Swim").with_id("o1"), shared_kr("Climb").with_id("o2")],
            Vec::new(),
        );
        let mut review = SuggestionReview::open(
            vec![suggestion("o1", "kr1", 5.0), suggestion("o2", "kr1", 8.0)],
            &state,
        )
        .unwrap();
        assert_eq!(review.pending().len(), 2);

        let Acceptance::Applied(next) = review.accept(&state, "o1", "kr1", None).unwrap() else {
            panic!("expected applied");
        };

        assert!((next.key_result("o1", "kr1").unwrap().current_value - 5.0).abs() < f64::EPSILON);
        assert!(next.key_result("o2", "kr1").unwrap().current_value.abs() < f64::EPSILON);
        assert_eq!(review.pending().len(), 1);
        assert_eq!(review.pending()[0].objective_id, "o2");
        assert_eq!(review.visible(&next)[0].objective_title, "Climb");
    }

    #[test]
    fn test_accept_with_edited_value() {
        let state = marathon_state();
        let mut review =
            SuggestionReview::open(vec![suggestion("o1", "kr1", 21.0)], &state).unwrap();

        let Acceptance::Applied(next) = review.accept(&state, "o1", "kr1", Some(42.0)).unwrap()
        else {
            panic!("expected applied");
        };
        assert_eq!(next.objective("o1").unwrap().progress(), 50);
        assert!(!review.is_open());
    }

    #[test]
    fn test_accept_stale_suggestion_is_dropped() {
        let state = marathon_state();
        let mut review = SuggestionReview::open(
            vec![suggestion("o1", "kr1", 21.0), suggestion("o1", "kr2", 4.0)],
            &state,
        )
        .unwrap();

        let later = state.delete_key_result("o1", "kr1").unwrap();
        assert_eq!(review.visible(&later).len(), 1);

        let outcome = review.accept(&later, "o1", "kr1", None).unwrap();
        assert_eq!(outcome, Acceptance::Dropped);
        assert_eq!(review.pending().len(), 1);
    }

    #[test]
    fn test_accept_unknown_pair_errors() {
        let state = marathon_state();
        let mut review =
            SuggestionReview::open(vec![suggestion("o1", "kr1", 21.0)], &state).unwrap();

        let err = review.accept(&state, "o1", "kr2", None).unwrap_err();
        assert!(matches!(err, Error::SuggestionNotFound { .. }));

        let err = review.accept(&state, "o1", "kr1", Some(f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(review.is_open());
    }

    #[test]
    fn test_dismiss_closes_review() {
        let state = marathon_state();
        let mut review = SuggestionReview::open(
            vec![suggestion("o1", "kr1", 21.0), suggestion("o1", "kr2", 4.0)],
            &state,
        )
        .unwrap();
        review.dismiss();
        assert!(!review.is_open());
        assert!(review.visible(&state).is_empty());
    }

    #[test]
    fn test_visible_joins_live_titles() {
        let state = marathon_state();
        let review = SuggestionReview::open(vec![suggestion("o1", "kr2", 4.0)], &state).unwrap();
        let items = review.visible(&state);
        assert_eq!(items[0].objective_title, "Run a marathon");
        assert_eq!(items[0].key_result_title, "Long runs");
        assert_eq!(items[0].unit, "runs");
    }
}
