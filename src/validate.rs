//! Input validation and intent detection for command-line ergonomics.
//!
//! Provides O(1) validation sets and synonym maps so users can type
//! periods and statuses loosely. Three-tier resolution: exact match →
//! synonym lookup → error with suggestion.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{KrStatus, Period};

// ── Valid value sets (O(1) lookups) ──────────────────────────

pub static VALID_PERIODS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    ["q1", "q2", "q3", "q4", "h1", "h2", "annual"]
        .into_iter()
        .collect()
});

pub static VALID_STATUSES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    ["on_track", "at_risk", "behind", "completed"]
        .into_iter()
        .collect()
});

// ── Synonym maps (typo recovery) ─────────────────────────────

pub static PERIOD_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("year", "annual"),
        ("yearly", "annual"),
        ("annually", "annual"),
        ("fy", "annual"),
        ("1h", "h1"),
        ("2h", "h2"),
        ("first-half", "h1"),
        ("second-half", "h2"),
        ("quarter1", "q1"),
        ("quarter2", "q2"),
        ("quarter3", "q3"),
        ("quarter4", "q4"),
    ]
    .into_iter()
    .collect()
});

pub static STATUS_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("on-track", "on_track"),
        ("ontrack", "on_track"),
        ("ok", "on_track"),
        ("good", "on_track"),
        ("at-risk", "at_risk"),
        ("risk", "at_risk"),
        ("risky", "at_risk"),
        ("late", "behind"),
        ("delayed", "behind"),
        ("off_track", "behind"),
        ("done", "completed"),
        ("complete", "completed"),
        ("finished", "completed"),
    ]
    .into_iter()
    .collect()
});

/// Normalize a period string via exact match or synonym lookup.
///
/// # Errors
///
/// Returns [`Error::InvalidPeriod`] with the closest suggestion, if any.
pub fn normalize_period(input: &str) -> Result<Period> {
    let lower = input.trim().to_lowercase();

    let canonical = if VALID_PERIODS.contains(lower.as_str()) {
        lower.as_str()
    } else if let Some(&canonical) = PERIOD_SYNONYMS.get(lower.as_str()) {
        canonical
    } else {
        let suggestion = find_closest_match(&lower, &VALID_PERIODS, &PERIOD_SYNONYMS)
            .map(|s| s.to_uppercase());
        return Err(Error::InvalidPeriod {
            value: input.to_string(),
            suggestion,
        });
    };

    Ok(match canonical {
        "q1" => Period::Q1,
        "q2" => Period::Q2,
        "q3" => Period::Q3,
        "q4" => Period::Q4,
        "h1" => Period::H1,
        "h2" => Period::H2,
        _ => Period::Annual,
    })
}

/// Normalize a key result status via exact match or synonym lookup.
///
/// Accepts the snake-case form, the display label ("On Track") and synonyms.
///
/// # Errors
///
/// Returns [`Error::InvalidStatus`] with the closest suggestion, if any.
pub fn normalize_kr_status(input: &str) -> Result<KrStatus> {
    let lower = input.trim().to_lowercase().replace(' ', "_");

    let canonical = if VALID_STATUSES.contains(lower.as_str()) {
        lower.as_str()
    } else if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        canonical
    } else {
        let suggestion = find_closest_match(&lower, &VALID_STATUSES, &STATUS_SYNONYMS);
        return Err(Error::InvalidStatus {
            value: input.to_string(),
            suggestion,
        });
    };

    Ok(match canonical {
        "at_risk" => KrStatus::AtRisk,
        "behind" => KrStatus::Behind,
        "completed" => KrStatus::Completed,
        _ => KrStatus::OnTrack,
    })
}

/// Check a 1-10 rating such as mood or energy.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] naming the field when out of range.
pub fn validate_rating(field: &str, value: u8) -> Result<u8> {
    if (1..=10).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!(
            "{field} must be between 1 and 10, got {value}"
        )))
    }
}

/// Require a non-blank title, returning it trimmed.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] when the input is empty or whitespace.
pub fn require_title(field: &'static str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(Error::RequiredField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find the closest matching value across valid set and synonyms.
fn find_closest_match(
    input: &str,
    valid: &HashSet<&str>,
    synonyms: &HashMap<&str, &str>,
) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for &v in valid.iter().chain(synonyms.keys()) {
        let dist = levenshtein_distance(input, v);
        if dist <= 2 && best.is_none_or(|(_, d)| dist < d) {
            // For synonyms, show what it maps to
            let shown = synonyms.get(v).copied().unwrap_or(v);
            best = Some((shown, dist));
        }
    }

    best.map(|(v, _)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing IDs similar to the searched ID.
///
/// Compares against the same-length prefix of each id, so a mistyped short
/// prefix still finds its UUID. Returns up to `max` suggestions with edit
/// distance ≤ 3, sorted by distance then alphabetically.
pub fn find_similar_ids(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let len = searched.chars().count();
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| {
            let prefix: String = id.chars().take(len).collect();
            (levenshtein_distance(searched, &prefix), id.as_str())
        })
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_period() {
        assert_eq!(normalize_period("Q1").unwrap(), Period::Q1);
        assert_eq!(normalize_period("h2").unwrap(), Period::H2);
        assert_eq!(normalize_period("ANNUAL").unwrap(), Period::Annual);
        assert_eq!(normalize_period("yearly").unwrap(), Period::Annual);
        assert!(normalize_period("Q5").is_err());
    }

    #[test]
    fn test_period_suggestion() {
        match normalize_period("anual") {
            Err(Error::InvalidPeriod { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("ANNUAL"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_kr_status() {
        assert_eq!(normalize_kr_status("on_track").unwrap(), KrStatus::OnTrack);
        assert_eq!(normalize_kr_status("At Risk").unwrap(), KrStatus::AtRisk);
        assert_eq!(normalize_kr_status("late").unwrap(), KrStatus::Behind);
        assert_eq!(normalize_kr_status("done").unwrap(), KrStatus::Completed);
        assert!(normalize_kr_status("nonsense").is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert_eq!(validate_rating("mood", 1).unwrap(), 1);
        assert_eq!(validate_rating("mood", 10).unwrap(), 10);
        assert!(validate_rating("mood", 0).is_err());
        assert!(validate_rating("energy", 11).is_err());
    }

    #[test]
    fn test_require_title() {
        assert_eq!(require_title("title", "  Run  ").unwrap(), "Run");
        assert!(matches!(
            require_title("title", "   "),
            Err(Error::RequiredField { field: "title" })
        ));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_ids() {
        let ids = vec![
            "a1b2c3d4-0000".to_string(),
            "a1b3c3d4-0000".to_string(),
            "ffffffff-0000".to_string(),
        ];
        let result = find_similar_ids("a1b2c3d5", &ids, 3);
        assert_eq!(result.first().map(String::as_str), Some("a1b2c3d4-0000"));
        assert!(!result.contains(&"ffffffff-0000".to_string()));
    }
}
