//! Objective and key result models.
//!
//! An objective owns an ordered list of key results and a cached progress
//! score. The score is derived: the list can only be replaced through
//! [`Objective::set_key_results`], which recomputes it, so no caller can
//! leave the two out of sync.

use serde::{Deserialize, Serialize};

/// Planning period an objective belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    Q1,
    Q2,
    Q3,
    Q4,
    H1,
    H2,
    #[serde(rename = "ANNUAL")]
    Annual,
}

impl Period {
    /// All periods in display order.
    pub const ALL: [Self; 7] = [
        Self::Q1,
        Self::Q2,
        Self::Q3,
        Self::Q4,
        Self::H1,
        Self::H2,
        Self::Annual,
    ];

    /// Get the string representation for storage and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::Annual => "ANNUAL",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key result status. Set by the user, never derived from values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KrStatus {
    #[default]
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Behind")]
    Behind,
    #[serde(rename = "Completed")]
    Completed,
}

impl KrStatus {
    /// Human-readable label (also the persisted value).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Behind => "Behind",
            Self::Completed => "Completed",
        }
    }

    /// Snake-case form accepted on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::Behind => "behind",
            Self::Completed => "completed",
        }
    }
}

/// A measurable result tracked toward an objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    /// Unique identifier (UUID format)
    pub id: String,

    /// What is being measured
    pub title: String,

    /// Value reached so far
    pub current_value: f64,

    /// Value that counts as done (zero is treated as 1)
    pub target_value: f64,

    /// Display unit, e.g. "km" or "%"
    pub unit: String,

    /// User-set status
    #[serde(default)]
    pub status: KrStatus,
}

impl KeyResult {
    /// Create a key result starting from zero.
    pub fn new(title: impl Into<String>, target_value: f64, unit: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            current_value: 0.0,
            target_value,
            unit: unit.into(),
            status: KrStatus::OnTrack,
        }
    }

    /// Set the id (used by tests and imports that carry their own ids).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the current value.
    #[must_use]
    pub fn with_current(mut self, value: f64) -> Self {
        self.current_value = value;
        self
    }

    /// Completion percentage in `[0, 100]`.
    ///
    /// A zero target counts as 1. NaN contributes 0.
    #[must_use]
    pub fn percent_complete(&self) -> f64 {
        let target = if self.target_value == 0.0 {
            1.0
        } else {
            self.target_value
        };
        let percent = self.current_value / target * 100.0;
        if percent.is_nan() {
            return 0.0;
        }
        percent.clamp(0.0, 100.0)
    }
}

/// Average completion of a set of key results, rounded to an integer.
///
/// Unweighted mean of [`KeyResult::percent_complete`]; 0 when empty.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn calculate_progress(key_results: &[KeyResult]) -> u8 {
    if key_results.is_empty() {
        return 0;
    }
    let total: f64 = key_results.iter().map(KeyResult::percent_complete).sum();
    (total / key_results.len() as f64).round().clamp(0.0, 100.0) as u8
}

/// A goal for a period, decomposed into key results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    /// Unique identifier (UUID format)
    pub id: String,

    /// Objective title
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Planning period
    pub period: Period,

    #[serde(default)]
    key_results: Vec<KeyResult>,

    #[serde(default)]
    progress: u8,
}

impl Objective {
    /// Create an objective with no key results.
    pub fn new(title: impl Into<String>, period: Period) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            period,
            key_results: Vec::new(),
            progress: 0,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Replace the key results at construction time.
    #[must_use]
    pub fn with_key_results(mut self, key_results: Vec<KeyResult>) -> Self {
        self.set_key_results(key_results);
        self
    }

    /// Key results in display order.
    #[must_use]
    pub fn key_results(&self) -> &[KeyResult] {
        &self.key_results
    }

    /// Look up a key result by id.
    #[must_use]
    pub fn key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == id)
    }

    /// Cached progress score, 0-100.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether every key result is at or beyond its target.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Replace the key results and recompute progress.
    pub fn set_key_results(&mut self, key_results: Vec<KeyResult>) {
        self.key_results = key_results;
        self.progress = calculate_progress(&self.key_results);
    }

    /// Recompute the cached progress after loading from storage.
    pub(crate) fn refresh_progress(&mut self) {
        self.progress = calculate_progress(&self.key_results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kr(current: f64, target: f64) -> KeyResult {
        KeyResult::new("kr", target, "u").with_current(current)
    }

    #[test]
    fn test_empty_progress_is_zero() {
        assert_eq!(calculate_progress(&[]), 0);
        assert_eq!(Objective::new("Empty", Period::Q1).progress(), 0);
    }

    #[test]
    fn test_zero_target_counts_as_one() {
        assert_eq!(calculate_progress(&[kr(0.0, 0.0)]), 0);
        assert_eq!(calculate_progress(&[kr(1.0, 0.0)]), 100);
        assert!((kr(0.5, 0.0).percent_complete() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_current_contributes_zero() {
        assert_eq!(calculate_progress(&[kr(-10.0, 100.0)]), 0);
        assert_eq!(calculate_progress(&[kr(-10.0, 100.0), kr(100.0, 100.0)]), 50);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        assert_eq!(calculate_progress(&[kr(500.0, 100.0)]), 100);
    }

    #[test]
    fn test_nan_contributes_zero() {
        assert_eq!(calculate_progress(&[kr(f64::NAN, 10.0)]), 0);
    }

    #[test]
    fn test_unweighted_mean() {
        // One key result done, one untouched: simple mean regardless of magnitude
        let krs = [kr(1.0, 1.0), kr(0.0, 1_000_000.0)];
        assert_eq!(calculate_progress(&krs), 50);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // (100 + 0 + 0) / 3 = 33.33
        assert_eq!(calculate_progress(&[kr(1.0, 1.0), kr(0.0, 1.0), kr(0.0, 1.0)]), 33);
        // (100 + 100 + 0) / 3 = 66.67
        assert_eq!(calculate_progress(&[kr(1.0, 1.0), kr(1.0, 1.0), kr(0.0, 1.0)]), 67);
        // 12.5 rounds up
        assert_eq!(calculate_progress(&[kr(1.0, 8.0)]), 13);
    }

    #[test]
    fn test_marathon_progression() {
        let mut objective = Objective::new("Run a marathon", Period::Annual)
            .with_key_results(vec![KeyResult::new("Distance", 42.0, "km")]);
        assert_eq!(objective.progress(), 0);

        let mut krs = objective.key_results().to_vec();
        krs[0].current_value = 21.0;
        objective.set_key_results(krs);
        assert_eq!(objective.progress(), 50);

        let mut krs = objective.key_results().to_vec();
        krs[0].current_value = 42.0;
        objective.set_key_results(krs);
        assert_eq!(objective.progress(), 100);
        assert!(objective.is_complete());
    }

    #[test]
    fn test_serialized_field_names() {
        let objective = Objective::new("Read more", Period::Annual)
            .with_id("obj1")
            .with_key_results(vec![KeyResult::new("Books", 12.0, "books").with_id("kr1")]);
        let json = serde_json::to_value(&objective).unwrap();

        assert_eq!(json["period"], "ANNUAL");
        assert_eq!(json["keyResults"][0]["targetValue"], 12.0);
        assert_eq!(json["keyResults"][0]["currentValue"], 0.0);
        assert_eq!(json["keyResults"][0]["status"], "On Track");
        assert_eq!(json["progress"], 0);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_period_round_trip() {
        for period in Period::ALL {
            let json = serde_json::to_string(&period).unwrap();
            assert_eq!(json, format!("\"{}\"", period.as_str()));
            let back: Period = serde_json::from_str(&json).unwrap();
            assert_eq!(back, period);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Period::default(), Period::Q1);
        assert_eq!(KrStatus::default(), KrStatus::OnTrack);
        assert_eq!(serde_json::to_string(&KrStatus::default()).unwrap(), "\"On Track\"");
    }
}
