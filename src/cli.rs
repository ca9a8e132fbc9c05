use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};

use crate::config::{parse_log_level, Config, DATA_DIR_ENV, LOG_LEVEL_ENV};
use crate::console::{ConsolePresenter, ConsoleText};
use crate::logging::enable_logging;
use crate::state::{EntryId, EntryStore, FileStore, KeyValueStore};

/// Keeps track of the hours you worked and what you are still owed.
///
/// # Examples
/// ```text
/// $ work-hours add --date 2024-01-10 09:00 17:30
/// $ work-hours rate 50
/// $ work-hours summary
/// ```
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Directory the entries and settings are saved in
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, global = true, env = LOG_LEVEL_ENV, value_parser = parse_log_level)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a shift
    Add(AddArgs),
    /// Remove a shift by its ID
    Delete { id: EntryId },
    /// Show every shift, oldest date first
    List,
    /// Show the hourly rate, or set it
    Rate { value: Option<String> },
    /// Show the amount already paid, or set it ("" clears it)
    Paid { value: Option<String> },
    /// Show total hours, amount owed and amount outstanding
    Summary,
}

#[derive(Debug, clap::Args)]
pub struct AddArgs {
    /// Work date in the format YYYY-MM-DD, today if omitted
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Clock-in time in the format HH:MM
    #[arg(value_parser = parse_time)]
    clock_in: NaiveTime,

    /// Clock-out time in the format HH:MM
    #[arg(value_parser = parse_time)]
    clock_out: NaiveTime,
}

pub fn run(args: Args) -> Result<()> {
    let config = Config::resolve(args.data_dir, args.log_level)?;
    let storage = FileStore::open(&config.data_dir)?;
    enable_logging(config.log_level, &config.log_file())?;
    info!("Using data directory {}", config.data_dir.display());

    let mut store = EntryStore::load(storage).context("Failed to load saved work hours")?;

    let mut stdout = std::io::stdout().lock();
    let mut presenter = ConsoleText::new(&mut stdout);
    execute(
        args.command,
        &mut store,
        &mut presenter,
        Local::now().date_naive(),
    )
}

/// Runs one subcommand against the store. `today` is the date used when `add` has none.
pub fn execute<S: KeyValueStore, P: ConsolePresenter>(
    command: Command,
    store: &mut EntryStore<S>,
    presenter: &mut P,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::Add(add) => {
            let date = add.date.unwrap_or(today).format("%Y-%m-%d").to_string();
            let clock_in = add.clock_in.format("%H:%M").to_string();
            let clock_out = add.clock_out.format("%H:%M").to_string();
            if add.clock_out < add.clock_in {
                presenter.show_message(
                    "Clock-out is before clock-in, this shift counts as 0 hours.",
                )?;
            }
            match store.add_entry(&date, &clock_in, &clock_out)? {
                Some(id) => presenter.show_message(&format!(
                    "Added entry {id}: {date} {clock_in} - {clock_out}"
                ))?,
                None => presenter.show_message("Nothing added.")?,
            }
        }
        Command::Delete { id } => {
            let description = store
                .entry_from_id(id)
                .map(|x| format!("{} {} - {}", x.date(), x.clock_in(), x.clock_out()));
            store.delete_entry(id)?;
            match description {
                Some(description) => {
                    presenter.show_message(&format!("Deleted entry {id}: {description}"))?
                }
                None => presenter.show_message(&format!("There is no entry {id}."))?,
            }
        }
        Command::List => presenter.show_entries(&store.list_entries())?,
        Command::Rate { value } => {
            if let Some(value) = value {
                store.set_hourly_rate(&value)?;
            }
            presenter.show_message(&format!("Hourly rate: {}", store.hourly_rate()))?;
        }
        Command::Paid { value } => {
            if let Some(value) = value {
                store.set_amount_paid(&value)?;
            }
            presenter.show_message(&format!("Amount paid: {}", store.amount_paid()))?;
        }
        Command::Summary => presenter.show_summary(&store.summary())?,
    }

    Ok(())
}

/// Reports a failed run exactly once: through the logger when it would print an
/// error record, straight to `stderr` otherwise.
pub fn report_failure(error: &anyhow::Error, stderr: &mut impl Write) -> ExitCode {
    if log::max_level() >= LevelFilter::Error {
        error!("{error:?}");
    } else {
        let _ = writeln!(stderr, "Error: {error:?}");
    }
    ExitCode::FAILURE
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").with_context(|| format!("Failed to parse time: {}", s))
}
