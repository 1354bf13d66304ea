//! Command implementations.

pub mod advisor;
pub mod calendar;
pub mod completions;
pub mod dashboard;
pub mod init;
pub mod journal;
pub mod kr;
pub mod objective;
pub mod version;

use std::future::Future;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde::Serialize;

use crate::advisor::{Advice, FallbackReason};
use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::workspace::Workspace;

/// Open the workspace at the resolved database path.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] if the database does not exist.
pub(crate) fn open_workspace(db_path: Option<&PathBuf>) -> Result<Workspace> {
    let db_path = resolve_db_path(db_path.map(|p| p.as_path())).ok_or(Error::NotInitialized)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    Workspace::open(&db_path)
}

/// Run a future to completion on a fresh runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    Ok(rt.block_on(future))
}

/// Parse `--date` (YYYY-MM-DD), defaulting to today.
pub(crate) fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        None => Ok(Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            Error::InvalidArgument(format!("invalid date '{raw}', expected YYYY-MM-DD"))
        }),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// First eight characters of an id, for tables.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Format a value without a trailing `.0`.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Progress bar like `[██████░░░░]  60%`.
pub(crate) fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = usize::from(percent) * width / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
    let bar = if percent >= 100 {
        bar.green()
    } else if percent >= 50 {
        bar.cyan()
    } else {
        bar.yellow()
    };
    format!("[{bar}] {percent:>3}%")
}

/// Where an advisory value came from, for JSON output.
#[derive(Serialize)]
pub(crate) struct AdviceSource {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<FallbackReason>,
}

impl AdviceSource {
    pub(crate) fn of<T>(advice: &Advice<T>) -> Self {
        Self {
            source: if advice.is_fallback() { "fallback" } else { "live" },
            reason: advice.reason().cloned(),
        }
    }
}

/// A dimmed note explaining a fallback, for human output.
pub(crate) fn fallback_note<T>(advice: &Advice<T>) -> Option<String> {
    match advice.reason()? {
        FallbackReason::Unconfigured => {
            Some("(advisor offline: set GEMINI_API_KEY for AI suggestions)".dimmed().to_string())
        }
        FallbackReason::CallFailed(_) => {
            Some("(advisor unavailable, showing default text)".dimmed().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date(Some("29/02/2024")), Err(Error::InvalidArgument(_))));
        assert!(parse_date(None).is_ok());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-3.0), "-3");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_progress_bar_fill() {
        colored::control::set_override(false);
        assert_eq!(progress_bar(50, 10), "[█████░░░░░]  50%");
        assert_eq!(progress_bar(100, 4), "[████] 100%");
        assert_eq!(progress_bar(0, 4), "[░░░░]   0%");
    }
}
