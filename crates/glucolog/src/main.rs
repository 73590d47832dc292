//! `gluco` - CLI for glucolog
//!
//! This binary provides the command-line interface for recording readings,
//! viewing them, and exporting reports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::Parser;

use glucolog::cli::{
    AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, ReminderCommand,
    RemoveCommand, ReportCommand, StatsCommand,
};
use glucolog::reading::{ReadingDraft, DATE_FORMAT, TIME_FORMAT};
use glucolog::report::{self, report_file_name};
use glucolog::{init_logging, summarize, Config, Level, ReadingStore, Result, SlotStore};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(cli.config.clone())?;
    let now = Utc::now();

    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd, now),
        Command::List(cmd) => handle_list(&config, &cmd, now),
        Command::Remove(cmd) => handle_remove(&config, &cmd),
        Command::Stats(cmd) => handle_stats(&config, &cmd, now),
        Command::Report(cmd) => handle_report(&config, &cmd, now),
        Command::Reminder(cmd) => handle_reminder(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<ReadingStore> {
    Ok(ReadingStore::load(SlotStore::open(config.database_path())?))
}

fn handle_add(config: &Config, cmd: &AddCommand, now: DateTime<Utc>) -> Result<()> {
    let mut store = open_store(config)?;

    let date = cmd
        .date
        .clone()
        .unwrap_or_else(|| now.format(DATE_FORMAT).to_string());
    let time = cmd
        .time
        .clone()
        .unwrap_or_else(|| now.format(TIME_FORMAT).to_string());

    let draft = ReadingDraft::new(date, time, cmd.value.clone(), cmd.kind.into());
    let reading = store.add(&draft, now)?;

    println!(
        "Recorded reading {}: {} mg/dL at {} {} ({}, {})",
        reading.id,
        reading.value,
        reading.date,
        reading.time,
        reading.kind.label(),
        Level::of(reading.value_mgdl()),
    );
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand, now: DateTime<Utc>) -> Result<()> {
    let store = open_store(config)?;
    let period = cmd.period.resolve(&config.default_period())?;
    let readings = period.filter(store.readings(), now);

    if readings.is_empty() {
        println!("No readings yet. Add your first reading!");
        return Ok(());
    }

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&readings)?);
        }
        OutputFormat::Plain => {
            for reading in &readings {
                println!(
                    "{} {}  {} mg/dL  {}  {}  (id {})",
                    reading.display_date(),
                    reading.time,
                    reading.value,
                    reading.kind.label(),
                    Level::of(reading.value_mgdl()),
                    reading.id,
                );
            }
        }
        OutputFormat::Table => {
            println!("Readings ({}): {}", period.label(), readings.len());
            println!();
            println!(
                "{:<15} {:<12} {:<7} {:>9} {:<9} {:<8}",
                "Id", "Date", "Time", "Reading", "Type", "Status"
            );
            println!("{}", "-".repeat(64));
            for reading in &readings {
                println!(
                    "{:<15} {:<12} {:<7} {:>9} {:<9} {:<8}",
                    reading.id,
                    reading.display_date(),
                    reading.time,
                    reading.value,
                    reading.kind.label(),
                    Level::of(reading.value_mgdl()).label(),
                );
            }
        }
    }
    Ok(())
}

fn handle_remove(config: &Config, cmd: &RemoveCommand) -> Result<()> {
    let mut store = open_store(config)?;

    if !cmd.yes && !confirm("Delete this reading?")? {
        println!("Aborted.");
        return Ok(());
    }

    if store.remove(cmd.id) {
        println!("Deleted reading {}.", cmd.id);
    } else {
        println!("No reading with id {}.", cmd.id);
    }
    Ok(())
}

fn handle_stats(config: &Config, cmd: &StatsCommand, now: DateTime<Utc>) -> Result<()> {
    let store = open_store(config)?;
    let period = cmd.period.resolve(&config.default_period())?;
    let readings = period.filter(store.readings(), now);
    let summary = summarize(&readings);

    if cmd.json {
        let stats = serde_json::json!({
            "period": period.label(),
            "count": readings.len(),
            "avg": summary.avg,
            "min": summary.min,
            "max": summary.max,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Period:   {}", period.label());
        println!("Readings: {}", readings.len());
        println!("Average:  {:.1} mg/dL", summary.avg);
        println!("Min:      {} mg/dL", summary.min);
        println!("Max:      {} mg/dL", summary.max);
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand, now: DateTime<Utc>) -> Result<()> {
    let store = open_store(config)?;
    let period = cmd.period.resolve(&config.default_period())?;
    let readings = period.filter(store.readings(), now);
    let summary = summarize(&readings);

    let document = report::compose(&readings, summary, &period.label(), now);
    // Render fully before touching the file system; a failed export must
    // not leave a partial file behind.
    let bytes = report::render(&document)?;

    let path = cmd.output.clone().unwrap_or_else(|| {
        config
            .report_output_dir()
            .join(report_file_name(now.date_naive()))
    });
    std::fs::write(&path, bytes)?;

    println!(
        "Report saved to {} ({} readings, {} pages)",
        path.display(),
        readings.len(),
        document.pages.len(),
    );
    Ok(())
}

fn handle_reminder(config: &Config, cmd: &ReminderCommand) -> Result<()> {
    let store = open_store(config)?;

    match cmd {
        ReminderCommand::Set { chat_id } => {
            store.set_reminder(chat_id);
            println!("Reminder chat id saved.");
        }
        ReminderCommand::Show => match store.reminder() {
            Some(chat_id) => println!("{chat_id}"),
            None => println!("No reminder chat id set."),
        },
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Report]");
                println!("  Output dir:     {}", config.report_output_dir().display());
                println!();
                println!("[Display]");
                println!("  Default period: {}", config.display.default_period);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Ask for confirmation on stdin; anything but y/yes declines.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
