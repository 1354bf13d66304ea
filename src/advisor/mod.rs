//! AI advisory client.
//!
//! Wraps a generative language model behind five operations: key-result
//! drafting, journal feedback, schedule-to-journal drafting, progress-update
//! detection and insights. Every operation returns an [`Advice`], which
//! always carries a usable value, so a missing key or a failed call degrades
//! the result instead of failing the command.
//!
//! # Provider
//!
//! [`GeminiProvider`] calls the Gemini `generateContent` REST API. Settings
//! come from `~/.orbit/config.json`, with environment overrides:
//!
//! - `GEMINI_API_KEY` / `API_KEY`: credential (no key → fallbacks only)
//! - `ORBIT_MODEL`: model name (default `gemini-2.5-flash`)
//! - `ORBIT_ADVISOR_ENDPOINT`: API base URL
//! - `ORBIT_ADVISOR_ENABLED`: set to `0` to disable all calls

mod advice;
mod client;
pub mod config;
mod gemini;
#[cfg(test)]
pub(crate) mod mock;
mod prompts;
mod provider;

pub use advice::{Advice, FallbackReason};
pub use client::{
    create_advisor, Advisor, EMPTY_FEEDBACK, FALLBACK_FEEDBACK, FALLBACK_INSIGHTS,
    FALLBACK_KEY_RESULTS,
};
pub use gemini::GeminiProvider;
pub use provider::{AdvisoryProvider, ProviderInfo};
