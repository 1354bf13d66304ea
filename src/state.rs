//! Application state and the objective/key-result mutation protocol.
//!
//! [`AppState`] holds the two collections. Every mutation method borrows
//! the current state and returns the next one, so a failed mutation leaves
//! nothing half-applied and callers decide when to commit.
//!
//! Key results are only ever changed through [`Objective::set_key_results`],
//! which recomputes the objective's progress in the same step.

use crate::error::{Error, Result};
use crate::model::{
    AiUpdateSuggestion, JournalEntry, KeyResult, KrStatus, Objective, ObjectiveSnapshot, Period,
};
use crate::validate::{find_similar_ids, require_title};

/// Fields for a new key result.
#[derive(Debug, Clone)]
pub struct KeyResultDraft {
    pub title: String,
    pub target_value: f64,
    pub unit: String,
}

/// Optional field changes for an existing key result.
#[derive(Debug, Clone, Default)]
pub struct KeyResultEdit {
    pub title: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<KrStatus>,
}

/// The in-memory model: objectives and journal entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    objectives: Vec<Objective>,
    entries: Vec<JournalEntry>,
}

impl AppState {
    /// Build a state from loaded collections.
    #[must_use]
    pub fn new(objectives: Vec<Objective>, entries: Vec<JournalEntry>) -> Self {
        Self {
            objectives,
            entries,
        }
    }

    /// Objectives in creation order.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Journal entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Look up an objective by exact id.
    #[must_use]
    pub fn objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Look up a key result by its `(objective_id, key_result_id)` pair.
    #[must_use]
    pub fn key_result(&self, objective_id: &str, key_result_id: &str) -> Option<&KeyResult> {
        self.objective(objective_id)
            .and_then(|o| o.key_result(key_result_id))
    }

    /// Simplified objectives for the advisor prompt.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ObjectiveSnapshot> {
        self.objectives.iter().map(ObjectiveSnapshot::from).collect()
    }

    // ── Id resolution ────────────────────────────────────────

    /// Resolve an objective id from an exact id or a unique prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousId`] when several objectives share the
    /// prefix, or a not-found error carrying similar ids.
    pub fn resolve_objective_id(&self, input: &str) -> Result<String> {
        let ids: Vec<String> = self.objectives.iter().map(|o| o.id.clone()).collect();
        resolve_id(input, &ids).map_err(|miss| match miss {
            IdMiss::Ambiguous(matches) => Error::AmbiguousId {
                id: input.to_string(),
                matches,
            },
            IdMiss::NotFound => {
                let similar = find_similar_ids(input, &ids, 3);
                if similar.is_empty() {
                    Error::ObjectiveNotFound {
                        id: input.to_string(),
                    }
                } else {
                    Error::ObjectiveNotFoundSimilar {
                        id: input.to_string(),
                        similar,
                    }
                }
            }
        })
    }

    /// Resolve a key result id within an objective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousId`] or [`Error::KeyResultNotFound`].
    pub fn resolve_key_result_id(&self, objective_id: &str, input: &str) -> Result<String> {
        let objective = self.require_objective(objective_id)?;
        let ids: Vec<String> = objective
            .key_results()
            .iter()
            .map(|kr| kr.id.clone())
            .collect();
        resolve_id(input, &ids).map_err(|miss| match miss {
            IdMiss::Ambiguous(matches) => Error::AmbiguousId {
                id: input.to_string(),
                matches,
            },
            IdMiss::NotFound => Error::KeyResultNotFound {
                objective_id: objective_id.to_string(),
                id: input.to_string(),
            },
        })
    }

    // ── Objective operations ─────────────────────────────────

    /// Add a new objective with no key results.
    ///
    /// Returns the next state and the new objective's id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredField`] if the title is blank.
    pub fn create_objective(
        &self,
        title: &str,
        period: Period,
        description: Option<&str>,
    ) -> Result<(Self, String)> {
        let title = require_title("title", title)?;
        let mut objective = Objective::new(title, period);
        if let Some(d) = description.map(str::trim).filter(|d| !d.is_empty()) {
            objective = objective.with_description(d);
        }
        let id = objective.id.clone();

        let mut next = self.clone();
        next.objectives.push(objective);
        Ok((next, id))
    }

    /// Change an objective's title. Progress is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredField`] or [`Error::ObjectiveNotFound`].
    pub fn rename_objective(&self, id: &str, title: &str) -> Result<Self> {
        let title = require_title("title", title)?;
        self.update_objective(id, |o| {
            o.title = title;
            Ok(())
        })
    }

    /// Remove an objective and all of its key results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectiveNotFound`] if no objective has this id.
    pub fn delete_objective(&self, id: &str) -> Result<Self> {
        self.require_objective(id)?;
        let mut next = self.clone();
        next.objectives.retain(|o| o.id != id);
        Ok(next)
    }

    // ── Key result operations ────────────────────────────────

    /// Append a key result to an objective.
    ///
    /// Returns the next state and the new key result's id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredField`] or [`Error::ObjectiveNotFound`].
    pub fn add_key_result(&self, objective_id: &str, draft: KeyResultDraft) -> Result<(Self, String)> {
        let title = require_title("key result title", &draft.title)?;
        let key_result = KeyResult::new(title, draft.target_value, draft.unit);
        let id = key_result.id.clone();

        let next = self.update_key_results(objective_id, |krs| {
            krs.push(key_result);
            Ok(())
        })?;
        Ok((next, id))
    }

    /// Change a key result's title, target, unit or status.
    ///
    /// # Errors
    ///
    /// Returns a not-found error, or [`Error::RequiredField`] for a blank title.
    pub fn edit_key_result(
        &self,
        objective_id: &str,
        key_result_id: &str,
        edit: KeyResultEdit,
    ) -> Result<Self> {
        let title = edit
            .title
            .as_deref()
            .map(|t| require_title("key result title", t))
            .transpose()?;

        self.update_key_result(objective_id, key_result_id, |kr| {
            if let Some(title) = title {
                kr.title = title;
            }
            if let Some(target) = edit.target_value {
                kr.target_value = target;
            }
            if let Some(unit) = edit.unit {
                kr.unit = unit;
            }
            if let Some(status) = edit.status {
                kr.status = status;
            }
        })
    }

    /// Set a key result's current value.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown objective or key result.
    pub fn set_key_result_value(
        &self,
        objective_id: &str,
        key_result_id: &str,
        value: f64,
    ) -> Result<Self> {
        self.update_key_result(objective_id, key_result_id, |kr| kr.current_value = value)
    }

    /// Remove a key result from its objective.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown objective or key result.
    pub fn delete_key_result(&self, objective_id: &str, key_result_id: &str) -> Result<Self> {
        self.update_key_results(objective_id, |krs| {
            let before = krs.len();
            krs.retain(|kr| kr.id != key_result_id);
            if krs.len() == before {
                return Err(Error::KeyResultNotFound {
                    objective_id: objective_id.to_string(),
                    id: key_result_id.to_string(),
                });
            }
            Ok(())
        })
    }

    /// Apply an accepted suggestion with the (possibly edited) value.
    ///
    /// Only the named key result changes.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the suggestion's target no longer exists.
    pub fn apply_suggestion(&self, suggestion: &AiUpdateSuggestion, value: f64) -> Result<Self> {
        self.set_key_result_value(&suggestion.objective_id, &suggestion.key_result_id, value)
    }

    // ── Journal ──────────────────────────────────────────────

    /// Append a journal entry.
    #[must_use]
    pub fn add_entry(&self, entry: JournalEntry) -> Self {
        let mut next = self.clone();
        next.entries.push(entry);
        next
    }

    // ── Internals ────────────────────────────────────────────

    fn require_objective(&self, id: &str) -> Result<&Objective> {
        self.objective(id).ok_or_else(|| Error::ObjectiveNotFound { id: id.to_string() })
    }

    fn update_objective<F>(&self, id: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Objective) -> Result<()>,
    {
        let mut next = self.clone();
        let objective = next
            .objectives
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::ObjectiveNotFound { id: id.to_string() })?;
        f(objective)?;
        Ok(next)
    }

    /// The single path through which key results change.
    fn update_key_results<F>(&self, objective_id: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Vec<KeyResult>) -> Result<()>,
    {
        self.update_objective(objective_id, |o| {
            let mut krs = o.key_results().to_vec();
            f(&mut krs)?;
            o.set_key_results(krs);
            Ok(())
        })
    }

    fn update_key_result<F>(&self, objective_id: &str, key_result_id: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&mut KeyResult),
    {
        self.update_key_results(objective_id, |krs| {
            let kr = krs
                .iter_mut()
                .find(|kr| kr.id == key_result_id)
                .ok_or_else(|| Error::KeyResultNotFound {
                    objective_id: objective_id.to_string(),
                    id: key_result_id.to_string(),
                })?;
            f(kr);
            Ok(())
        })
    }
}

enum IdMiss {
    Ambiguous(Vec<String>),
    NotFound,
}

/// Exact match wins; otherwise a unique prefix.
fn resolve_id(input: &str, ids: &[String]) -> std::result::Result<String, IdMiss> {
    let input = input.trim();
    if let Some(id) = ids.iter().find(|id| id.as_str() == input) {
        return Ok(id.clone());
    }
    if input.is_empty() {
        return Err(IdMiss::NotFound);
    }

    let matches: Vec<String> = ids
        .iter()
        .filter(|id| id.starts_with(input))
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(IdMiss::NotFound),
        1 => Ok(matches.into_iter().next().unwrap_or_default()),
        _ => Err(IdMiss::Ambiguous(matches)),
    }
}
