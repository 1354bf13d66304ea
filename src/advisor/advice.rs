//! Typed outcome of an advisory call.

use serde::Serialize;

/// Why an advisory call produced its fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No credential configured, or the advisor is disabled.
    Unconfigured,
    /// The provider returned an error or an unusable reply.
    CallFailed(String),
}

/// Result of an advisory call: a real answer or a degraded fallback.
///
/// Both variants carry a usable value, so callers can always proceed;
/// tests and output can still tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice<T> {
    Live(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Advice<T> {
    /// Fallback for a missing credential.
    pub fn unconfigured(value: T) -> Self {
        Self::Fallback {
            value,
            reason: FallbackReason::Unconfigured,
        }
    }

    /// Fallback after a failed call.
    pub fn failed(value: T, error: impl std::fmt::Display) -> Self {
        Self::Fallback {
            value,
            reason: FallbackReason::CallFailed(error.to_string()),
        }
    }

    /// Borrow the value regardless of provenance.
    pub fn value(&self) -> &T {
        match self {
            Self::Live(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Take the value regardless of provenance.
    pub fn into_value(self) -> T {
        match self {
            Self::Live(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Transform the value, keeping its provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Advice<U> {
        match self {
            Self::Live(value) => Advice::Live(f(value)),
            Self::Fallback { value, reason } => Advice::Fallback {
                value: f(value),
                reason,
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The fallback reason, if any.
    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Live(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}
