//! Key result command implementations.

use crate::advisor::create_advisor;
use crate::cli::{KrCommands, KrEditArgs};
use crate::error::{Error, Result};
use crate::model::KeyResult;
use crate::state::{AppState, KeyResultDraft, KeyResultEdit};
use crate::validate::normalize_kr_status;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{
    AdviceSource, block_on, fallback_note, format_value, open_workspace, print_json, short_id,
};

#[derive(Serialize)]
struct KeyResultChangeOutput<'a> {
    objective_id: &'a str,
    id: &'a str,
    action: &'static str,
    objective_progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_result: Option<&'a KeyResult>,
}

#[derive(Serialize)]
struct SuggestOutput<'a> {
    objective_id: &'a str,
    suggestions: &'a [String],
    #[serde(flatten)]
    source: AdviceSource,
    added: Vec<String>,
}

/// Execute key result commands.
pub fn execute(command: &KrCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        KrCommands::Add {
            objective,
            title,
            target,
            unit,
        } => add(objective, title, *target, unit, db_path, json),
        KrCommands::Edit(args) => edit(args, db_path, json),
        KrCommands::Set {
            objective,
            kr,
            value,
        } => set(objective, kr, *value, db_path, json),
        KrCommands::Delete { objective, kr } => delete(objective, kr, db_path, json),
        KrCommands::Suggest { objective, add } => suggest(objective, *add, db_path, json),
    }
}

fn add(
    objective: &str,
    title: &str,
    target: f64,
    unit: &str,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    require_finite("target", target)?;
    let mut workspace = open_workspace(db_path)?;
    let objective_id = workspace.state().resolve_objective_id(objective)?;
    let (next, id) = workspace.state().add_key_result(
        &objective_id,
        KeyResultDraft {
            title: title.to_string(),
            target_value: target,
            unit: unit.to_string(),
        },
    )?;

    if crate::is_dry_run() {
        println!(
            "Would add key result to {}: {} (target {} {unit})",
            short_id(&objective_id),
            title.trim(),
            format_value(target)
        );
        return Ok(());
    }

    workspace.commit(next)?;
    report(workspace.state(), &objective_id, &id, "added", json, |kr| {
        format!("Added key result {}: {}", short_id(&kr.id).bold(), kr.title)
    })
}

fn edit(args: &KrEditArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if let Some(target) = args.target {
        require_finite("target", target)?;
    }
    let status = args.status.as_deref().map(normalize_kr_status).transpose()?;
    if args.title.is_none() && args.target.is_none() && args.unit.is_none() && status.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change: pass --title, --target, --unit or --status".to_string(),
        ));
    }

    let mut workspace = open_workspace(db_path)?;
    let objective_id = workspace.state().resolve_objective_id(&args.objective)?;
    let id = workspace.state().resolve_key_result_id(&objective_id, &args.kr)?;
    let next = workspace.state().edit_key_result(
        &objective_id,
        &id,
        KeyResultEdit {
            title: args.title.clone(),
            target_value: args.target,
            unit: args.unit.clone(),
            status,
        },
    )?;

    if crate::is_dry_run() {
        println!("Would update key result {}", short_id(&id));
        return Ok(());
    }

    workspace.commit(next)?;
    report(workspace.state(), &objective_id, &id, "updated", json, |kr| {
        format!("Updated key result {}: {}", short_id(&kr.id).bold(), kr.title)
    })
}

fn set(objective: &str, kr: &str, value: f64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    require_finite("value", value)?;
    let mut workspace = open_workspace(db_path)?;
    let objective_id = workspace.state().resolve_objective_id(objective)?;
    let id = workspace.state().resolve_key_result_id(&objective_id, kr)?;
    let next = workspace.state().set_key_result_value(&objective_id, &id, value)?;

    if crate::is_dry_run() {
        println!("Would set key result {} to {}", short_id(&id), format_value(value));
        return Ok(());
    }

    workspace.commit(next)?;
    let progress = workspace.state().objective(&objective_id).map_or(0, |o| o.progress());
    report(workspace.state(), &objective_id, &id, "set", json, |kr| {
        format!(
            "{}: {}/{} {}  (objective now {progress}%)",
            kr.title,
            format_value(kr.current_value),
            format_value(kr.target_value),
            kr.unit
        )
    })
}

fn delete(objective: &str, kr: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut workspace = open_workspace(db_path)?;
    let objective_id = workspace.state().resolve_objective_id(objective)?;
    let id = workspace.state().resolve_key_result_id(&objective_id, kr)?;
    let next = workspace.state().delete_key_result(&objective_id, &id)?;

    if crate::is_dry_run() {
        println!("Would delete key result: {}", short_id(&id));
        return Ok(());
    }

    workspace.commit(next)?;

    if crate::is_silent() {
        println!("{id}");
    } else if json {
        print_json(&KeyResultChangeOutput {
            objective_id: &objective_id,
            id: &id,
            action: "deleted",
            objective_progress: workspace.state().objective(&objective_id).map_or(0, |o| o.progress()),
            key_result: None,
        })?;
    } else {
        println!("Deleted key result {}", short_id(&id));
    }
    Ok(())
}

fn suggest(objective: &str, add: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut workspace = open_workspace(db_path)?;
    let objective_id = workspace.state().resolve_objective_id(objective)?;
    let title = workspace
        .state()
        .objective(&objective_id)
        .map(|o| o.title.clone())
        .unwrap_or_default();

    let advisor = create_advisor();
    let advice = block_on(advisor.suggest_key_results(&title))?;
    let suggestions = advice.value();

    let mut added = Vec::new();
    if add && !suggestions.is_empty() {
        let mut next = workspace.state().clone();
        for suggestion in suggestions {
            let (state, id) = next.add_key_result(
                &objective_id,
                KeyResultDraft {
                    title: suggestion.clone(),
                    target_value: 100.0,
                    unit: "%".to_string(),
                },
            )?;
            next = state;
            added.push(id);
        }

        if crate::is_dry_run() {
            for suggestion in suggestions {
                println!("Would add key result: {suggestion}");
            }
            return Ok(());
        }
        workspace.commit(next)?;
    }

    if crate::is_silent() {
        for id in &added {
            println!("{id}");
        }
        return Ok(());
    }

    if json {
        return print_json(&SuggestOutput {
            objective_id: &objective_id,
            suggestions,
            source: AdviceSource::of(&advice),
            added,
        });
    }

    println!("Key result ideas for {}:", title.bold());
    for suggestion in suggestions {
        println!("  • {suggestion}");
    }
    if let Some(note) = fallback_note(&advice) {
        println!("{note}");
    }
    if added.is_empty() {
        println!();
        println!("Add them with: orbit kr suggest {} --add", short_id(&objective_id));
    } else {
        println!("Added {} key results (target 100 %).", added.len());
    }
    Ok(())
}

/// Print the outcome of a change to one key result.
fn report(
    state: &AppState,
    objective_id: &str,
    id: &str,
    action: &'static str,
    json: bool,
    describe: impl FnOnce(&KeyResult) -> String,
) -> Result<()> {
    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    let key_result = state.key_result(objective_id, id);
    if json {
        return print_json(&KeyResultChangeOutput {
            objective_id,
            id,
            action,
            objective_progress: state.objective(objective_id).map_or(0, |o| o.progress()),
            key_result,
        });
    }

    if let Some(kr) = key_result {
        println!("{}", describe(kr));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("{field} must be a finite number")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_finite() {
        assert!(require_finite("value", 3.5).is_ok());
        assert!(matches!(
            require_finite("value", f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        assert!(require_finite("target", f64::INFINITY).is_err());
    }
}
