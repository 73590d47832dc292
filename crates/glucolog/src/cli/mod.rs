//! Command-line interface for glucolog.
//!
//! This module provides the CLI structure and command handlers for the
//! `gluco` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, KindArg, ListCommand, OutputFormat, PeriodArg, PeriodArgs,
    ReminderCommand, RemoveCommand, ReportCommand, StatsCommand,
};

/// gluco - Track your blood glucose from the command line
///
/// Record measurements, view them over a time window, see summary
/// statistics, and export a PDF report. All data stays in a local database.
#[derive(Debug, Parser)]
#[command(name = "gluco")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new reading
    Add(AddCommand),

    /// List readings in the active time window
    List(ListCommand),

    /// Delete a reading by id
    Remove(RemoveCommand),

    /// Show summary statistics for the active time window
    Stats(StatsCommand),

    /// Export a PDF report for the active time window
    Report(ReportCommand),

    /// Manage the reminder chat id
    #[command(subcommand)]
    Reminder(ReminderCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
