//! Advisor command implementations.

use crate::advisor::config::{
    AdvisorSettings, KeySource, config_path, mask_key, reset_advisor_settings, resolve_advisor,
    save_advisor_settings,
};
use crate::advisor::{ProviderInfo, create_advisor};
use crate::cli::AdvisorCommands;
use crate::error::{Error, Result};
use colored::Colorize;
use serde::Serialize;

use super::print_json;

#[derive(Serialize)]
struct StatusOutput {
    enabled: bool,
    configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_source: Option<KeySource>,
    model: String,
    endpoint: String,
    config_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<ProviderInfo>,
}

#[derive(Serialize)]
struct ConfigureOutput {
    success: bool,
    messages: Vec<&'static str>,
}

/// Execute advisor commands.
pub fn execute(command: &AdvisorCommands, json: bool) -> Result<()> {
    match command {
        AdvisorCommands::Status => status(json),
        AdvisorCommands::Configure {
            api_key,
            model,
            endpoint,
            enable,
            disable,
            reset,
        } => {
            if *reset {
                return reset_settings(json);
            }
            let settings = settings_update(
                api_key.as_deref(),
                model.as_deref(),
                endpoint.as_deref(),
                *enable,
                *disable,
            )?;
            configure(&settings, json)
        }
    }
}

fn status(json: bool) -> Result<()> {
    let resolved = resolve_advisor();
    let config_file = config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());

    let advisor = create_advisor();

    let output = StatusOutput {
        enabled: resolved.enabled,
        configured: advisor.is_configured(),
        api_key: resolved.api_key.as_deref().map(mask_key),
        key_source: resolved.key_source,
        model: resolved.model,
        endpoint: resolved.endpoint,
        config_file,
        provider: advisor.provider_info(),
    };

    if json {
        return print_json(&output);
    }

    println!("{}", "Advisor".bold());
    let state = match (output.enabled, output.configured) {
        (false, _) => "disabled".yellow(),
        (true, false) => "offline (no API key)".yellow(),
        (true, true) => "ready".green(),
    };
    println!("  Status:   {state}");
    match (&output.api_key, output.key_source) {
        (Some(key), Some(KeySource::Environment)) => println!("  API key:  {key} (environment)"),
        (Some(key), _) => println!("  API key:  {key} (config file)"),
        (None, _) => println!("  API key:  {}", "not set".dimmed()),
    }
    println!("  Model:    {}", output.model);
    println!("  Endpoint: {}", output.endpoint);
    println!("  Config:   {}", output.config_file);

    if output.enabled && !output.configured {
        println!();
        println!("Set GEMINI_API_KEY or run: orbit advisor configure --api-key <key>");
    }
    Ok(())
}

/// Build the partial settings to merge from the configure flags.
fn settings_update(
    api_key: Option<&str>,
    model: Option<&str>,
    endpoint: Option<&str>,
    enable: bool,
    disable: bool,
) -> Result<AdvisorSettings> {
    if enable && disable {
        return Err(Error::InvalidArgument(
            "Cannot specify both --enable and --disable".to_string(),
        ));
    }

    let non_blank = |field: &str, value: Option<&str>| -> Result<Option<String>> {
        match value.map(str::trim) {
            Some("") => Err(Error::InvalidArgument(format!("{field} cannot be empty"))),
            other => Ok(other.map(str::to_string)),
        }
    };

    let settings = AdvisorSettings {
        enabled: if enable {
            Some(true)
        } else if disable {
            Some(false)
        } else {
            None
        },
        api_key: non_blank("API key", api_key)?,
        model: non_blank("model", model)?,
        endpoint: non_blank("endpoint", endpoint)?,
    };

    if settings == AdvisorSettings::default() {
        return Err(Error::InvalidArgument(
            "nothing to change: pass --api-key, --model, --endpoint, --enable, --disable or --reset"
                .to_string(),
        ));
    }
    Ok(settings)
}

fn configure(settings: &AdvisorSettings, json: bool) -> Result<()> {
    let mut messages = Vec::new();
    match settings.enabled {
        Some(true) => messages.push("Advisor enabled"),
        Some(false) => messages.push("Advisor disabled"),
        None => {}
    }
    if settings.api_key.is_some() {
        messages.push("API key saved");
    }
    if settings.model.is_some() {
        messages.push("Model configured");
    }
    if settings.endpoint.is_some() {
        messages.push("Endpoint configured");
    }

    if crate::is_dry_run() {
        for message in &messages {
            println!("Would apply: {message}");
        }
        return Ok(());
    }

    save_advisor_settings(settings)?;

    if json {
        print_json(&ConfigureOutput {
            success: true,
            messages,
        })
    } else {
        for message in messages {
            println!("{} {message}", "✓".green());
        }
        Ok(())
    }
}

fn reset_settings(json: bool) -> Result<()> {
    if crate::is_dry_run() {
        println!("Would remove advisor settings from the config file");
        return Ok(());
    }

    reset_advisor_settings()?;

    if json {
        print_json(&ConfigureOutput {
            success: true,
            messages: vec!["Advisor settings reset"],
        })
    } else {
        println!("{} Advisor settings reset", "✓".green());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_update_maps_flags() {
        let settings =
            settings_update(Some(" key-123 "), Some("gemini-2.5-pro"), None, true, false).unwrap();
        assert_eq!(settings.enabled, Some(true));
        assert_eq!(settings.api_key.as_deref(), Some("key-123"));
        assert_eq!(settings.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(settings.endpoint, None);
    }

    #[test]
    fn test_settings_update_rejects_empty_and_conflicting_flags() {
        assert!(matches!(
            settings_update(None, None, None, false, false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(settings_update(None, None, None, true, true).is_err());
        assert!(settings_update(Some("  "), None, None, false, false).is_err());
    }

    #[test]
    fn test_disable_only() {
        let settings = settings_update(None, None, None, false, true).unwrap();
        assert_eq!(settings.enabled, Some(false));
    }
}
