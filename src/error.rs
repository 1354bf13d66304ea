//! Error types for Orbit CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Advisory failures never surface here as command errors: the advisor
//! converts them into fallback values (see [`crate::advisor::Advice`]).
//! [`Error::Advisor`] exists so providers can report what went wrong
//! before the advisor swallows it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Orbit operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    ObjectiveNotFound,
    KeyResultNotFound,
    SuggestionNotFound,
    AmbiguousId,

    // Validation (exit 4)
    InvalidPeriod,
    InvalidStatus,
    InvalidArgument,
    RequiredField,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Advisor (exit 9)
    AdvisorError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ObjectiveNotFound => "OBJECTIVE_NOT_FOUND",
            Self::KeyResultNotFound => "KEY_RESULT_NOT_FOUND",
            Self::SuggestionNotFound => "SUGGESTION_NOT_FOUND",
            Self::AmbiguousId => "AMBIGUOUS_ID",
            Self::InvalidPeriod => "INVALID_PERIOD",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::AdvisorError => "ADVISOR_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-9).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::ObjectiveNotFound
            | Self::KeyResultNotFound
            | Self::SuggestionNotFound
            | Self::AmbiguousId => 3,
            Self::InvalidPeriod
            | Self::InvalidStatus
            | Self::InvalidArgument
            | Self::RequiredField => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::AdvisorError => 9,
        }
    }

    /// Whether a caller should retry with corrected input.
    ///
    /// True for validation errors and ambiguous IDs. False for not-found,
    /// I/O, or internal errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidPeriod
                | Self::InvalidStatus
                | Self::InvalidArgument
                | Self::RequiredField
                | Self::AmbiguousId
                | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Orbit operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `orbit init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Objective not found: {id}")]
    ObjectiveNotFound { id: String },

    #[error("Objective not found: {id} (did you mean: {}?)", similar.join(", "))]
    ObjectiveNotFoundSimilar { id: String, similar: Vec<String> },

    #[error("Key result not found: {id} (objective {objective_id})")]
    KeyResultNotFound { objective_id: String, id: String },

    #[error("No pending suggestion for key result {key_result_id} (objective {objective_id})")]
    SuggestionNotFound {
        objective_id: String,
        key_result_id: String,
    },

    #[error("Ambiguous ID '{id}' matches: {}", matches.join(", "))]
    AmbiguousId { id: String, matches: Vec<String> },

    #[error("Invalid period: {value}")]
    InvalidPeriod {
        value: String,
        suggestion: Option<String>,
    },

    #[error("Invalid key result status: {value}")]
    InvalidStatus {
        value: String,
        suggestion: Option<String>,
    },

    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ObjectiveNotFound { .. } | Self::ObjectiveNotFoundSimilar { .. } => {
                ErrorCode::ObjectiveNotFound
            }
            Self::KeyResultNotFound { .. } => ErrorCode::KeyResultNotFound,
            Self::SuggestionNotFound { .. } => ErrorCode::SuggestionNotFound,
            Self::AmbiguousId { .. } => ErrorCode::AmbiguousId,
            Self::InvalidPeriod { .. } => ErrorCode::InvalidPeriod,
            Self::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Advisor(_) => ErrorCode::AdvisorError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `orbit init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::ObjectiveNotFound { id } => Some(format!(
                "No objective with ID '{id}'. Use `orbit objective list` to see your objectives."
            )),
            Self::ObjectiveNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::KeyResultNotFound { objective_id, .. } => Some(format!(
                "Use `orbit objective show {objective_id}` to list its key results."
            )),

            Self::AmbiguousId { .. } => {
                Some("Use a longer prefix to select a single item.".to_string())
            }

            Self::InvalidPeriod { suggestion, .. } => {
                let mut hint = "Valid periods: Q1, Q2, Q3, Q4, H1, H2, ANNUAL".to_string();
                if let Some(s) = suggestion {
                    hint.push_str(&format!(". Did you mean: {s}?"));
                }
                Some(hint)
            }

            Self::InvalidStatus { suggestion, .. } => {
                let mut hint =
                    "Valid statuses: on_track, at_risk, behind, completed. \
                     Synonyms: done→completed, risk→at_risk, late→behind"
                        .to_string();
                if let Some(s) = suggestion {
                    hint.push_str(&format!(". Did you mean: {s}?"));
                }
                Some(hint)
            }

            Self::InvalidArgument(msg) => {
                if msg.contains("mood") || msg.contains("energy") {
                    Some("Mood and energy are rated from 1 to 10".to_string())
                } else if msg.contains("date") {
                    Some("Dates use the YYYY-MM-DD format".to_string())
                } else {
                    None
                }
            }

            Self::SuggestionNotFound { .. }
            | Self::RequiredField { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Advisor(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::NotInitialized.exit_code(), 2);
        assert_eq!(
            Error::ObjectiveNotFound { id: "x".into() }.exit_code(),
            3
        );
        assert_eq!(Error::InvalidArgument("mood".into()).exit_code(), 4);
        assert_eq!(Error::Advisor("boom".into()).exit_code(), 9);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::InvalidPeriod {
            value: "q5".into(),
            suggestion: Some("Q1".into()),
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "INVALID_PERIOD");
        assert_eq!(json["error"]["retryable"], true);
        assert!(json["error"]["hint"].as_str().unwrap().contains("Q1"));
    }

    #[test]
    fn test_similar_ids_in_message() {
        let err = Error::ObjectiveNotFoundSimilar {
            id: "abcd".into(),
            similar: vec!["abce".into(), "abdd".into()],
        };
        assert_eq!(
            err.to_string(),
            "Objective not found: abcd (did you mean: abce, abdd?)"
        );
    }
}
