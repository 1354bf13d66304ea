//! Orbit CLI entry point.

use clap::Parser;
use orbit::cli::commands;
use orbit::cli::{Cli, Commands, OutputFormat};
use orbit::error::Error;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        orbit::SILENT.store(true, Ordering::Relaxed);
    }
    if cli.dry_run {
        orbit::DRY_RUN.store(true, Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        orbit::CSV_OUTPUT.store(true, Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // --json OR --format json OR non-TTY stdout, unless CSV was asked for
    let json = cli.json
        || cli.format == OutputFormat::Json
        || (cli.format != OutputFormat::Csv
            && !std::io::IsTerminal::is_terminal(&std::io::stdout()));

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,hyper=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();
    match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, db, json),
        Commands::Version => commands::version::execute(json),

        Commands::Objective { command } => commands::objective::execute(command, db, json),
        Commands::Kr { command } => commands::kr::execute(command, db, json),
        Commands::Journal { command } => commands::journal::execute(command, db, json),

        Commands::Dashboard { no_insights } => commands::dashboard::execute(*no_insights, db, json),
        Commands::Calendar { date } => commands::calendar::execute(date.as_deref(), json),

        Commands::Advisor { command } => commands::advisor::execute(command, json),
        Commands::Completions { shell } => commands::completions::execute(*shell),
    }
}
