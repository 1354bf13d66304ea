//! Scripted advisory provider for deterministic tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::provider::{AdvisoryProvider, ProviderInfo};
use crate::error::{Error, Result};

/// A provider that replays queued replies in order and records prompts.
///
/// When the queue is empty every call fails.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a failed call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::Advisor(message)),
            None => Err(Error::Advisor("no scripted reply".into())),
        }
    }
}

impl AdvisoryProvider for ScriptedProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "scripted".to_string(),
            model: "test".to_string(),
            endpoint: "memory".to_string(),
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    async fn generate_json(&self, prompt: &str, _schema: &serde_json::Value) -> Result<String> {
        self.next(prompt)
    }
}
