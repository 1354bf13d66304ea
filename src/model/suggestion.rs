//! Advisor-facing models: update suggestions and objective snapshots.

use serde::{Deserialize, Serialize};

use super::objective::Objective;

/// A proposed new total value for one key result.
///
/// Identity is the `(objective_id, key_result_id)` pair. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiUpdateSuggestion {
    pub objective_id: String,
    pub key_result_id: String,
    /// New total, not a delta
    pub suggested_value: f64,
    pub reasoning: String,
}

impl AiUpdateSuggestion {
    /// Whether this suggestion targets the given pair.
    #[must_use]
    pub fn targets(&self, objective_id: &str, key_result_id: &str) -> bool {
        self.objective_id == objective_id && self.key_result_id == key_result_id
    }
}

/// Simplified key result sent to the advisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyResultSnapshot {
    pub id: String,
    pub title: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
}

/// Simplified objective sent to the advisor: ids, titles and values only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveSnapshot {
    pub id: String,
    pub title: String,
    pub krs: Vec<KeyResultSnapshot>,
}

impl From<&Objective> for ObjectiveSnapshot {
    fn from(o: &Objective) -> Self {
        Self {
            id: o.id.clone(),
            title: o.title.clone(),
            krs: o
                .key_results()
                .iter()
                .map(|kr| KeyResultSnapshot {
                    id: kr.id.clone(),
                    title: kr.title.clone(),
                    current: kr.current_value,
                    target: kr.target_value,
                    unit: kr.unit.clone(),
                })
                .collect(),
        }
    }
}
