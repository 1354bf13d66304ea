//! Journal command implementations.
//!
//! `journal add` is the full compose flow: optional schedule draft, advisor
//! feedback, and a review of any key result updates the advisor proposes.
//! Updates are applied one by one as they are accepted.

use crate::advisor::{Advice, AdvisoryProvider, Advisor, create_advisor};
use crate::calendar::{CalendarClient, DEMO_SCHEDULE, format_for_prompt};
use crate::cli::{JournalAddArgs, JournalCommands};
use crate::compose::{EntryDraft, Submission, draft_from_schedule, submit_entry};
use crate::error::{Error, Result};
use crate::model::{JournalEntry, most_recent};
use crate::review::{Acceptance, ReviewItem, SuggestionReview};
use crate::validate::validate_rating;
use crate::workspace::Workspace;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde::Serialize;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use super::{
    AdviceSource, block_on, fallback_note, format_value, open_workspace, parse_date, print_json,
    short_id,
};

/// Content preview width in `journal list`.
const PREVIEW_CHARS: usize = 60;

#[derive(Serialize)]
struct AppliedUpdate {
    objective_id: String,
    key_result_id: String,
    value: f64,
}

#[derive(Serialize)]
struct JournalAddOutput<'a> {
    entry: &'a JournalEntry,
    feedback_source: AdviceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft_source: Option<AdviceSource>,
    suggestions: Vec<ReviewItem>,
    applied: Vec<AppliedUpdate>,
}

#[derive(Serialize)]
struct JournalListOutput<'a> {
    entries: Vec<&'a JournalEntry>,
    count: usize,
    total: usize,
}

#[derive(Serialize)]
struct DraftOutput<'a> {
    date: NaiveDate,
    schedule: &'a str,
    draft: &'a str,
    #[serde(flatten)]
    source: AdviceSource,
}

/// One answer in the interactive review.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ReviewAnswer {
    Accept,
    AcceptWith(f64),
    Skip,
    DismissRest,
}

/// Execute journal commands.
pub fn execute(command: &JournalCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        JournalCommands::Add(args) => add(args, db_path, json),
        JournalCommands::List { limit } => list(*limit, db_path, json),
        JournalCommands::Draft {
            date,
            schedule,
            demo,
        } => draft(date.as_deref(), schedule.as_deref(), *demo, json),
    }
}

fn add(args: &JournalAddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = parse_date(args.date.as_deref())?;
    let mut workspace = open_workspace(db_path)?;
    let advisor = create_advisor();

    let mut draft = EntryDraft::new(date)
        .with_content(args.content.clone().unwrap_or_default())
        .with_ratings(args.mood, args.energy);

    let drafted = block_on(prefill(
        &advisor,
        &mut draft,
        args.from_calendar,
        args.schedule.as_deref(),
    ))??;

    if crate::is_dry_run() {
        if draft.content.trim().is_empty() {
            return Err(Error::InvalidArgument("journal entry content is empty".into()));
        }
        validate_rating("mood", draft.mood)?;
        validate_rating("energy", draft.energy)?;
        println!(
            "Would add journal entry for {date} (mood {}, energy {}):",
            draft.mood, draft.energy
        );
        println!("{}", draft.content);
        return Ok(());
    }

    let Submission {
        state,
        entry,
        feedback,
        review,
    } = block_on(submit_entry(&advisor, workspace.state(), &mut draft, Local::now()))??;
    workspace.commit(state)?;

    let suggestions = review
        .as_ref()
        .map(|r| r.visible(workspace.state()))
        .unwrap_or_default();

    if crate::is_silent() {
        println!("{}", entry.id);
        return match review {
            Some(review) if args.accept_all => accept_all(&mut workspace, review).map(|_| ()),
            _ => Ok(()),
        };
    }

    if json {
        let applied = match review {
            Some(review) if args.accept_all => accept_all(&mut workspace, review)?,
            _ => Vec::new(),
        };
        return print_json(&JournalAddOutput {
            entry: &entry,
            feedback_source: AdviceSource::of(&feedback),
            draft_source: drafted.as_ref().map(AdviceSource::of),
            suggestions,
            applied,
        });
    }

    println!(
        "Saved entry {} for {date} (mood {}, energy {})",
        short_id(&entry.id).bold(),
        entry.mood,
        entry.energy
    );
    if let Some(note) = drafted.as_ref().and_then(fallback_note) {
        println!("{note}");
    }
    println!();
    println!("{} {}", "Feedback:".bold(), feedback.value());
    if let Some(note) = fallback_note(&feedback) {
        println!("{note}");
    }

    let Some(review) = review else {
        return Ok(());
    };

    println!();
    println!("{}", "Progress detected in your key results:".bold());
    let interactive = std::io::stdin().is_terminal();
    if args.accept_all {
        let applied = accept_all(&mut workspace, review)?;
        for update in &applied {
            println!(
                "  ✓ {} set to {}",
                short_id(&update.key_result_id),
                format_value(update.value)
            );
        }
    } else if args.no_review || !interactive {
        for item in &suggestions {
            print_item(item);
        }
        println!();
        println!(
            "{}",
            "Not applied. Use `orbit kr set` or re-run with --accept-all.".dimmed()
        );
    } else {
        review_interactively(&mut workspace, review)?;
    }
    Ok(())
}

/// Run the schedule draft requested on the command line, if any.
async fn prefill<P: AdvisoryProvider>(
    advisor: &Advisor<P>,
    draft: &mut EntryDraft,
    from_calendar: bool,
    schedule: Option<&str>,
) -> Result<Option<Advice<String>>> {
    let schedule = match (from_calendar, schedule) {
        (_, Some(text)) => text.to_string(),
        (true, None) => calendar_schedule(draft.date).await,
        (false, None) => return Ok(None),
    };
    draft_from_schedule(advisor, draft, &schedule).await.map(Some)
}

async fn calendar_schedule(date: NaiveDate) -> String {
    let mut client = CalendarClient::new();
    client.connect().await;
    format_for_prompt(&client.fetch_events(date).await)
}

/// Accept every pending suggestion at its suggested value.
fn accept_all(workspace: &mut Workspace, mut review: SuggestionReview) -> Result<Vec<AppliedUpdate>> {
    let mut applied = Vec::new();
    for item in review.visible(workspace.state()) {
        if let Some(update) = accept(workspace, &mut review, &item, None)? {
            applied.push(update);
        }
    }
    review.dismiss();
    Ok(applied)
}

fn accept(
    workspace: &mut Workspace,
    review: &mut SuggestionReview,
    item: &ReviewItem,
    value: Option<f64>,
) -> Result<Option<AppliedUpdate>> {
    match review.accept(workspace.state(), &item.objective_id, &item.key_result_id, value)? {
        Acceptance::Applied(next) => {
            workspace.commit(next)?;
            Ok(Some(AppliedUpdate {
                objective_id: item.objective_id.clone(),
                key_result_id: item.key_result_id.clone(),
                value: value.unwrap_or(item.suggested_value),
            }))
        }
        Acceptance::Dropped => Ok(None),
    }
}

fn review_interactively(workspace: &mut Workspace, mut review: SuggestionReview) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    'items: for item in review.visible(workspace.state()) {
        print_item(&item);
        loop {
            print!("    Apply? [Y]es / [n]o / new value / [q]uit: ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                break 'items;
            };
            match parse_review_answer(&line) {
                Some(ReviewAnswer::Accept) => {
                    report_accept(accept(workspace, &mut review, &item, None)?);
                    break;
                }
                Some(ReviewAnswer::AcceptWith(value)) => {
                    report_accept(accept(workspace, &mut review, &item, Some(value))?);
                    break;
                }
                Some(ReviewAnswer::Skip) => break,
                Some(ReviewAnswer::DismissRest) => break 'items,
                None => println!("    Enter y, n, q or a number."),
            }
        }
    }

    review.dismiss();
    Ok(())
}

fn report_accept(update: Option<AppliedUpdate>) {
    match update {
        Some(update) => println!("    {} set to {}", "✓".green(), format_value(update.value)),
        None => println!("    {}", "key result no longer exists, skipped".dimmed()),
    }
}

fn print_item(item: &ReviewItem) {
    println!(
        "  {} › {}: {} → {} {}",
        item.objective_title,
        item.key_result_title.bold(),
        format_value(item.current_value),
        format_value(item.suggested_value).green(),
        item.unit
    );
    if !item.reasoning.is_empty() {
        println!("    {}", item.reasoning.dimmed());
    }
}

fn parse_review_answer(input: &str) -> Option<ReviewAnswer> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "" | "y" | "yes" => Some(ReviewAnswer::Accept),
        "n" | "no" | "s" | "skip" => Some(ReviewAnswer::Skip),
        "q" | "quit" | "d" | "dismiss" => Some(ReviewAnswer::DismissRest),
        _ => input
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ReviewAnswer::AcceptWith),
    }
}

fn list(limit: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let workspace = open_workspace(db_path)?;
    let all = workspace.state().entries();
    let entries = most_recent(all, limit);

    if crate::is_csv() {
        println!("id,date,mood,energy,content,feedback");
        for e in &entries {
            println!(
                "{},{},{},{},{},{}",
                e.id,
                entry_day(e),
                e.mood,
                e.energy,
                crate::csv_escape(&e.content),
                crate::csv_escape(e.ai_feedback.as_deref().unwrap_or(""))
            );
        }
    } else if json {
        print_json(&JournalListOutput {
            count: entries.len(),
            total: all.len(),
            entries,
        })?;
    } else if entries.is_empty() {
        println!("No journal entries yet. Write one with: orbit journal add \"<text>\"");
    } else {
        for e in &entries {
            println!(
                "{}  {}  mood {:>2}  energy {:>2}  {}",
                short_id(&e.id).dimmed(),
                entry_day(e),
                e.mood,
                e.energy,
                preview(&e.content)
            );
            if let Some(feedback) = &e.ai_feedback {
                println!("          {}", preview(feedback).dimmed());
            }
        }
        if all.len() > entries.len() {
            println!("{}", format!("({} of {} entries)", entries.len(), all.len()).dimmed());
        }
    }
    Ok(())
}

fn draft(date: Option<&str>, schedule: Option<&str>, demo: bool, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let advisor = create_advisor();

    let (schedule, mut draft, advice) = block_on(async {
        let schedule = match schedule {
            Some(text) => text.to_string(),
            None if demo => DEMO_SCHEDULE.to_string(),
            None => calendar_schedule(date).await,
        };
        let mut draft = EntryDraft::new(date);
        let advice = draft_from_schedule(&advisor, &mut draft, &schedule).await;
        (schedule, draft, advice)
    })?;
    let advice = advice?;
    draft.content = draft.content.trim().to_string();

    if json {
        return print_json(&DraftOutput {
            date,
            schedule: &schedule,
            draft: &draft.content,
            source: AdviceSource::of(&advice),
        });
    }

    println!("{}", format!("Schedule for {date}:").bold());
    for line in schedule.lines() {
        println!("  {line}");
    }
    println!();
    if draft.content.is_empty() {
        println!("No draft produced.");
    } else {
        println!("{}", "Draft:".bold());
        println!("{}", draft.content);
    }
    if let Some(note) = fallback_note(&advice) {
        println!("{note}");
    }
    Ok(())
}

fn entry_day(entry: &JournalEntry) -> String {
    entry
        .local_date()
        .map_or_else(|| entry.date.clone(), |d| d.to_string())
}

/// First line of `text`, cut to [`PREVIEW_CHARS`].
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
