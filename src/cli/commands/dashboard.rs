//! Dashboard command: objective progress, mood/energy trend, insights.

use crate::advisor::create_advisor;
use crate::dashboard::{DashboardStats, INSIGHTS_PLACEHOLDER, insights};
use crate::error::Result;
use crate::model::Objective;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{AdviceSource, block_on, fallback_note, open_workspace, print_json, progress_bar};

#[derive(Serialize)]
struct InsightsOutput {
    text: String,
    #[serde(flatten)]
    source: AdviceSource,
}

#[derive(Serialize)]
struct DashboardOutput<'a> {
    #[serde(flatten)]
    stats: &'a DashboardStats,
    objectives: Vec<ObjectiveProgress<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insights: Option<InsightsOutput>,
}

#[derive(Serialize)]
struct ObjectiveProgress<'a> {
    id: &'a str,
    title: &'a str,
    period: String,
    progress: u8,
}

impl<'a> From<&'a Objective> for ObjectiveProgress<'a> {
    fn from(o: &'a Objective) -> Self {
        Self {
            id: &o.id,
            title: &o.title,
            period: o.period.to_string(),
            progress: o.progress(),
        }
    }
}

/// Execute the dashboard command.
pub fn execute(no_insights: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = open_workspace(db_path)?;
    let state = workspace.state();
    let stats = DashboardStats::compute(state);

    let advice = if no_insights {
        None
    } else {
        let advisor = create_advisor();
        block_on(insights(&advisor, state))?
    };

    if json {
        return print_json(&DashboardOutput {
            stats: &stats,
            objectives: state.objectives().iter().map(ObjectiveProgress::from).collect(),
            insights: advice.as_ref().map(|a| InsightsOutput {
                text: a.value().clone(),
                source: AdviceSource::of(a),
            }),
        });
    }

    println!("{}", "Overview".bold());
    println!(
        "  Objectives: {} total, {} active, {} completed",
        stats.total_objectives, stats.active_objectives, stats.completed_objectives
    );
    println!("  Average progress: {}", progress_bar(stats.average_progress, 20));
    match stats.recent_energy {
        Some(energy) => println!("  Recent energy: {energy}/10"),
        None => println!("  Recent energy: {}", "no entries yet".dimmed()),
    }

    if !state.objectives().is_empty() {
        println!();
        println!("{}", "Objectives".bold());
        for o in state.objectives() {
            println!("  {}  {}", progress_bar(o.progress(), 20), o.title);
        }
    }

    if !stats.trend.is_empty() {
        println!();
        println!("{}", "Mood & energy".bold());
        for point in &stats.trend {
            println!(
                "  {:<7} mood {:>2} {}  energy {:>2} {}",
                point.label,
                point.mood,
                spark(point.mood).magenta(),
                point.energy,
                spark(point.energy).cyan()
            );
        }
    }

    if !no_insights {
        println!();
        println!("{}", "Insights".bold());
        match &advice {
            Some(advice) => {
                println!("{}", advice.value());
                if let Some(note) = fallback_note(advice) {
                    println!("{note}");
                }
            }
            None => println!("{}", INSIGHTS_PLACEHOLDER.dimmed()),
        }
    }
    Ok(())
}

/// Ten-cell bar for a 1-10 rating.
fn spark(rating: u8) -> String {
    let filled = usize::from(rating.min(10));
    format!("{}{}", "▮".repeat(filled), "▯".repeat(10 - filled))
}
