//! Advisory provider trait.
//!
//! A provider turns a prompt into raw reply text. Parsing the reply and
//! substituting fallbacks is the job of [`super::Advisor`].

use crate::error::Result;
use serde::Serialize;

/// Provider metadata for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub endpoint: String,
}

/// Trait for generative language model backends.
pub trait AdvisoryProvider: Send + Sync {
    /// Get provider metadata.
    fn info(&self) -> ProviderInfo;

    /// Free-text completion for a prompt.
    fn generate_text(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Completion constrained to JSON matching `schema`.
    ///
    /// Returns the raw JSON text; the caller deserializes it.
    fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
