//! `agecounter`: terminal front end for the age counter core.
//!
//! Stands in for the menu bar: `show` prints what the status item and its
//! menu would display, `watch` refreshes the title on a timer and `set` plays
//! the birthday picker.

mod commands;
mod config;

use agecounter_core::db::open_db;
use agecounter_core::{init_logging, Birthdate, BirthdayStore, LogLevel, SqliteSettingsRepository};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "agecounter",
    version,
    about = "Shows your age as a continuously updating decimal"
)]
struct Cli {
    /// Settings database file.
    #[arg(long, global = true, env = "AGECOUNTER_DB")]
    db: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, global = true, env = "AGECOUNTER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "AGECOUNTER_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the age, the calendar breakdown and the birthday.
    Show {
        /// Emit one JSON object instead of text lines.
        #[arg(long)]
        json: bool,
    },
    /// Save your birthday.
    Set {
        /// Calendar date as YYYY-MM-DD; must not be in the future.
        #[arg(value_parser = Birthdate::parse)]
        date: Birthdate,
    },
    /// Keep refreshing the age on one terminal line.
    Watch {
        /// Refresh period in milliseconds.
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Show or change the launch-at-login preference.
    LaunchAtLogin {
        state: Option<Toggle>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.db, cli.log_dir, cli.log_level)?;

    // Logging is best effort; the age must still print without it.
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let store = BirthdayStore::new(SqliteSettingsRepository::new(&conn));

    match cli.command.unwrap_or(Command::Show { json: false }) {
        Command::Show { json } => commands::show(&store, json),
        Command::Set { date } => commands::set(&store, date),
        Command::Watch { interval_ms, ticks } => {
            commands::watch(&store, Duration::from_millis(interval_ms), ticks)
        }
        Command::LaunchAtLogin { state } => {
            commands::launch_at_login(&store, state.map(|state| matches!(state, Toggle::On)))
        }
    }
}
