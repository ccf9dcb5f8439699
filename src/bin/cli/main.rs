mod app;
mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mnemo", about = "Spaced repetition review scheduler", version)]
struct Cli {
    /// Deck file with card content (default: deck_path from config)
    #[arg(long, global = true)]
    deck: Option<PathBuf>,

    /// Schedule state file (default: state_path from config)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Config file (default: ~/.config/mnemo/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List cards due for review
    Due {
        /// Reference date (YYYY-MM-DD or RFC 3339, default: now)
        #[arg(long)]
        as_of: Option<String>,
        /// Maximum cards to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every card with its schedule state
    List {
        /// Reference date (YYYY-MM-DD or RFC 3339, default: now)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Run an interactive review session
    Review {
        /// Maximum cards per session
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show schedule statistics
    Stats {
        /// Reference date (YYYY-MM-DD or RFC 3339, default: now)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Clear all schedule state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Parse a reference timestamp, accepting a bare date or RFC 3339
fn resolve_as_of(input: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(input) = input else {
        return Ok(Utc::now());
    };

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| anyhow::anyhow!("Invalid date '{}', expected YYYY-MM-DD or RFC 3339", input))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    match cli.command {
        Command::Due { as_of, limit } => {
            let app = app::App::new(cli.config.as_deref(), cli.deck.as_deref(), cli.state.as_deref())?;
            let as_of = resolve_as_of(as_of.as_deref())?;
            commands::due::run(&app, as_of, limit, &cli.format, use_color)?;
        }
        Command::List { as_of } => {
            let app = app::App::new(cli.config.as_deref(), cli.deck.as_deref(), cli.state.as_deref())?;
            let as_of = resolve_as_of(as_of.as_deref())?;
            commands::list::run(&app, as_of, &cli.format, use_color)?;
        }
        Command::Review { limit } => {
            let app = app::App::new(cli.config.as_deref(), cli.deck.as_deref(), cli.state.as_deref())?;
            commands::review::run(app, limit, use_color)?;
        }
        Command::Stats { as_of } => {
            let app = app::App::new(cli.config.as_deref(), cli.deck.as_deref(), cli.state.as_deref())?;
            let as_of = resolve_as_of(as_of.as_deref())?;
            commands::stats::run(&app, as_of, &cli.format, use_color)?;
        }
        Command::Reset { yes } => {
            let app = app::App::new(cli.config.as_deref(), cli.deck.as_deref(), cli.state.as_deref())?;
            commands::reset::run(app, yes, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
