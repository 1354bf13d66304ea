//! Advisor configuration management.
//!
//! Loads and saves advisor settings from `~/.orbit/config.json`.
//! Environment variables override the file:
//! `GEMINI_API_KEY` (or `API_KEY`), `ORBIT_MODEL`, `ORBIT_ADVISOR_ENDPOINT`
//! and `ORBIT_ADVISOR_ENABLED`.

use crate::config::{global_orbit_dir, is_truthy};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Model used when nothing is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Generative Language API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Orbit configuration file structure (`~/.orbit/config.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor: Option<AdvisorSettings>,
}

/// Advisor section of the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Where the effective API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Environment,
    ConfigFile,
}

/// Effective advisor settings after environment overrides and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAdvisor {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub key_source: Option<KeySource>,
    pub model: String,
    pub endpoint: String,
}

impl AdvisorSettings {
    /// Apply environment overrides (looked up through `env`) and defaults.
    pub fn resolve(&self, env: impl Fn(&str) -> Option<String>) -> ResolvedAdvisor {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let enabled = lookup("ORBIT_ADVISOR_ENABLED")
            .map_or_else(|| self.enabled.unwrap_or(true), |v| is_truthy(&v));

        let (api_key, key_source) = match lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            Some(key) => (Some(key), Some(KeySource::Environment)),
            None => match self.api_key.clone().filter(|k| !k.trim().is_empty()) {
                Some(key) => (Some(key), Some(KeySource::ConfigFile)),
                None => (None, None),
            },
        };

        ResolvedAdvisor {
            enabled,
            api_key,
            key_source,
            model: lookup("ORBIT_MODEL")
                .or_else(|| self.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: lookup("ORBIT_ADVISOR_ENDPOINT")
                .or_else(|| self.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    global_orbit_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the full Orbit configuration. A missing file is the default config.
pub fn load_config() -> Result<OrbitConfig> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(OrbitConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save the full Orbit configuration.
pub fn save_config(config: &OrbitConfig) -> Result<()> {
    let path = config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(&path, content).map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

/// Get advisor settings from the config file.
pub fn get_advisor_settings() -> Result<Option<AdvisorSettings>> {
    Ok(load_config()?.advisor)
}

/// Save advisor settings, keeping existing values for unset fields.
pub fn save_advisor_settings(settings: &AdvisorSettings) -> Result<()> {
    let mut config = load_config()?;
    config.advisor = Some(merge_settings(config.advisor.unwrap_or_default(), settings));
    save_config(&config)
}

/// Remove the advisor section from the config file.
pub fn reset_advisor_settings() -> Result<()> {
    let mut config = load_config()?;
    config.advisor = None;
    save_config(&config)
}

fn merge_settings(existing: AdvisorSettings, update: &AdvisorSettings) -> AdvisorSettings {
    AdvisorSettings {
        enabled: update.enabled.or(existing.enabled),
        api_key: update.api_key.clone().or(existing.api_key),
        model: update.model.clone().or(existing.model),
        endpoint: update.endpoint.clone().or(existing.endpoint),
    }
}

/// Resolve settings from the config file and the process environment.
///
/// An unreadable config file is logged and treated as empty.
pub fn resolve_advisor() -> ResolvedAdvisor {
    let settings = match get_advisor_settings() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable advisor config");
            AdvisorSettings::default()
        }
    };
    settings.resolve(|name| std::env::var(name).ok())
}

/// Resolve the model name from environment or config.
pub fn resolve_model() -> String {
    resolve_advisor().model
}

/// Resolve the API endpoint from environment or config.
pub fn resolve_endpoint() -> String {
    resolve_advisor().endpoint
}

/// Mask all but the last four characters of a key for display.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
