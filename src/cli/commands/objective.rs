//! Objective command implementations.

use crate::cli::ObjectiveCommands;
use crate::error::Result;
use crate::model::{KrStatus, Objective};
use crate::validate::normalize_period;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{format_value, open_workspace, print_json, progress_bar, short_id};

#[derive(Serialize)]
struct ObjectiveListOutput<'a> {
    objectives: &'a [Objective],
    count: usize,
}

#[derive(Serialize)]
struct ObjectiveChangeOutput<'a> {
    id: &'a str,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    objective: Option<&'a Objective>,
}

/// Execute objective commands.
pub fn execute(command: &ObjectiveCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        ObjectiveCommands::Create {
            title,
            period,
            description,
        } => create(title, period, description.as_deref(), db_path, json),
        ObjectiveCommands::List => list(db_path, json),
        ObjectiveCommands::Show { id } => show(id, db_path, json),
        ObjectiveCommands::Rename { id, title } => rename(id, title, db_path, json),
        ObjectiveCommands::Delete { id } => delete(id, db_path, json),
    }
}

fn create(
    title: &str,
    period: &str,
    description: Option<&str>,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let period = normalize_period(period)?;
    let mut workspace = open_workspace(db_path)?;
    let (next, id) = workspace.state().create_objective(title, period, description)?;

    if crate::is_dry_run() {
        println!("Would create objective: {} [{period}]", title.trim());
        return Ok(());
    }

    workspace.commit(next)?;

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        print_json(&ObjectiveChangeOutput {
            id: &id,
            action: "created",
            objective: workspace.state().objective(&id),
        })
    } else {
        println!("Created objective {}: {} [{period}]", short_id(&id).bold(), title.trim());
        println!("  Add key results with: orbit kr add {} \"<title>\"", short_id(&id));
        Ok(())
    }
}

fn list(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = open_workspace(db_path)?;
    let objectives = workspace.state().objectives();

    if crate::is_csv() {
        println!("id,title,period,progress,key_results");
        for o in objectives {
            println!(
                "{},{},{},{},{}",
                o.id,
                crate::csv_escape(&o.title),
                o.period,
                o.progress(),
                o.key_results().len()
            );
        }
    } else if json {
        print_json(&ObjectiveListOutput {
            objectives,
            count: objectives.len(),
        })?;
    } else if objectives.is_empty() {
        println!("No objectives yet. Create one with: orbit objective create \"<title>\"");
    } else {
        for o in objectives {
            println!(
                "{}  {:<6} {}  {} {}",
                short_id(&o.id).dimmed(),
                o.period.to_string(),
                progress_bar(o.progress(), 20),
                o.title.bold(),
                format!("({} KRs)", o.key_results().len()).dimmed()
            );
        }
    }

    Ok(())
}

fn show(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = open_workspace(db_path)?;
    let state = workspace.state();
    let id = state.resolve_objective_id(id)?;
    let Some(objective) = state.objective(&id) else {
        return Ok(());
    };

    if json {
        return print_json(objective);
    }

    println!("{} {}", objective.title.bold(), format!("[{}]", objective.period).dimmed());
    println!("  ID:       {}", objective.id);
    if let Some(description) = &objective.description {
        println!("  About:    {description}");
    }
    println!("  Progress: {}", progress_bar(objective.progress(), 20));
    println!();

    if objective.key_results().is_empty() {
        println!("  No key results. Add one with: orbit kr add {} \"<title>\"", short_id(&id));
        return Ok(());
    }

    for kr in objective.key_results() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = kr.percent_complete().round() as u8;
        println!(
            "  {}  {}  {}/{} {}  {}  {}",
            short_id(&kr.id).dimmed(),
            progress_bar(percent, 10),
            format_value(kr.current_value),
            format_value(kr.target_value),
            kr.unit,
            kr.title,
            status_label(kr.status)
        );
    }

    Ok(())
}

fn rename(id: &str, title: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut workspace = open_workspace(db_path)?;
    let id = workspace.state().resolve_objective_id(id)?;
    let next = workspace.state().rename_objective(&id, title)?;

    if crate::is_dry_run() {
        println!("Would rename objective {} to: {}", short_id(&id), title.trim());
        return Ok(());
    }

    workspace.commit(next)?;

    if crate::is_silent() {
        println!("{id}");
    } else if json {
        print_json(&ObjectiveChangeOutput {
            id: &id,
            action: "renamed",
            objective: workspace.state().objective(&id),
        })?;
    } else {
        println!("Renamed objective {}: {}", short_id(&id), title.trim());
    }
    Ok(())
}

fn delete(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut workspace = open_workspace(db_path)?;
    let id = workspace.state().resolve_objective_id(id)?;
    let next = workspace.state().delete_objective(&id)?;

    if crate::is_dry_run() {
        println!("Would delete objective: {}", short_id(&id));
        return Ok(());
    }

    workspace.commit(next)?;

    if crate::is_silent() {
        println!("{id}");
    } else if json {
        print_json(&ObjectiveChangeOutput {
            id: &id,
            action: "deleted",
            objective: None,
        })?;
    } else {
        println!("Deleted objective {}", short_id(&id));
    }
    Ok(())
}

/// Colour a key result status label.
pub(crate) fn status_label(status: KrStatus) -> String {
    let label = status.label();
    match status {
        KrStatus::Completed => label.green().to_string(),
        KrStatus::AtRisk => label.yellow().to_string(),
        KrStatus::Behind => label.red().to_string(),
        KrStatus::OnTrack => label.cyan().to_string(),
    }
}
