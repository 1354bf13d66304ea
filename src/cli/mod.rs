//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// Orbit - Plan. Act. Reflect.
#[derive(Parser, Debug)]
#[command(name = "orbit", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.orbit/data/orbit.db)
    #[arg(long, global = true, env = "ORBIT_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID of created items (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Preview changes without writing to the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the Orbit database
    Init {
        /// Recreate the database, discarding all objectives and entries
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Objectives (goals with measurable key results)
    #[command(alias = "obj")]
    Objective {
        #[command(subcommand)]
        command: ObjectiveCommands,
    },

    /// Key results of an objective
    Kr {
        #[command(subcommand)]
        command: KrCommands,
    },

    /// Daily journal
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },

    /// Progress overview, mood/energy trend and insights
    Dashboard {
        /// Skip the AI insights call
        #[arg(long)]
        no_insights: bool,
    },

    /// Show the (simulated) calendar for a day
    Calendar {
        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// AI advisor settings
    Advisor {
        #[command(subcommand)]
        command: AdvisorCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Objective Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ObjectiveCommands {
    /// Create an objective
    Create {
        /// Objective title
        title: String,

        /// Period (Q1, Q2, Q3, Q4, H1, H2, annual)
        #[arg(short, long, default_value = "Q1")]
        period: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List objectives with progress
    List,

    /// Show an objective and its key results
    Show {
        /// Objective ID (or unique prefix)
        id: String,
    },

    /// Rename an objective
    Rename {
        /// Objective ID (or unique prefix)
        id: String,

        /// New title
        title: String,
    },

    /// Delete an objective and all its key results
    Delete {
        /// Objective ID (or unique prefix)
        id: String,
    },
}

// ============================================================================
// Key Result Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum KrCommands {
    /// Add a key result to an objective
    Add {
        /// Objective ID (or unique prefix)
        objective: String,

        /// Key result title
        title: String,

        /// Target value
        #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
        target: f64,

        /// Unit label
        #[arg(long, default_value = "%")]
        unit: String,
    },

    /// Edit a key result's title, target, unit or status
    Edit(KrEditArgs),

    /// Set the current value of a key result
    Set {
        /// Objective ID (or unique prefix)
        objective: String,

        /// Key result ID (or unique prefix)
        kr: String,

        /// New current value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Delete a key result
    Delete {
        /// Objective ID (or unique prefix)
        objective: String,

        /// Key result ID (or unique prefix)
        kr: String,
    },

    /// Ask the advisor for key result ideas
    Suggest {
        /// Objective ID (or unique prefix)
        objective: String,

        /// Add the suggestions as key results (target 100 %)
        #[arg(long)]
        add: bool,
    },
}

#[derive(Args, Debug)]
pub struct KrEditArgs {
    /// Objective ID (or unique prefix)
    pub objective: String,

    /// Key result ID (or unique prefix)
    pub kr: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New target value
    #[arg(long, allow_negative_numbers = true)]
    pub target: Option<f64>,

    /// New unit label
    #[arg(long)]
    pub unit: Option<String>,

    /// New status (on_track, at_risk, behind, completed)
    #[arg(long)]
    pub status: Option<String>,
}

// ============================================================================
// Journal Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum JournalCommands {
    /// Write a journal entry and get feedback
    Add(JournalAddArgs),

    /// List recent entries
    List {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Draft an entry from a day's schedule without saving it
    Draft {
        /// Day to draft for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Agenda text (default: the calendar for the day)
        #[arg(long, conflicts_with = "demo")]
        schedule: Option<String>,

        /// Use a sample agenda
        #[arg(long)]
        demo: bool,
    },
}

#[derive(Args, Debug)]
pub struct JournalAddArgs {
    /// Entry text (may be omitted when drafting from a schedule)
    pub content: Option<String>,

    /// Entry date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Mood rating 1-10
    #[arg(long, default_value_t = 7)]
    pub mood: u8,

    /// Energy rating 1-10
    #[arg(long, default_value_t = 7)]
    pub energy: u8,

    /// Prepend a draft built from the day's calendar
    #[arg(long, conflicts_with = "schedule")]
    pub from_calendar: bool,

    /// Prepend a draft built from this agenda text
    #[arg(long)]
    pub schedule: Option<String>,

    /// Apply every suggested key result update without asking
    #[arg(long, conflicts_with = "no_review")]
    pub accept_all: bool,

    /// Skip the key result update review
    #[arg(long)]
    pub no_review: bool,
}

// ============================================================================
// Advisor Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum AdvisorCommands {
    /// Show advisor configuration
    Status,

    /// Update advisor settings in ~/.orbit/config.json
    Configure {
        /// API key for the Generative Language API
        #[arg(long)]
        api_key: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// API base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Enable the advisor
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable the advisor
        #[arg(long)]
        disable: bool,

        /// Remove all advisor settings
        #[arg(long, conflicts_with_all = ["api_key", "model", "endpoint", "enable", "disable"])]
        reset: bool,
    },
}
