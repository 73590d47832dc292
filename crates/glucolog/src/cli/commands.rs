//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::error::{Error, Result};
use crate::filter::Period;
use crate::reading::{ReadingKind, DATE_FORMAT};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Blood sugar value in mg/dL
    #[arg(long)]
    pub value: String,

    /// Date of the measurement (YYYY-MM-DD, defaults to today)
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<String>,

    /// Time of the measurement (HH:MM, defaults to now)
    #[arg(short, long, value_name = "TIME")]
    pub time: Option<String>,

    /// Measurement context
    #[arg(short, long, value_enum, default_value = "fasting")]
    pub kind: KindArg,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Time window selection
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the reading to delete
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Time window selection
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Time window selection
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Write the PDF to this path instead of the configured output directory
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Reminder commands.
#[derive(Debug, Subcommand)]
pub enum ReminderCommand {
    /// Store the Telegram chat id used by the external reminder bot
    Set {
        /// The chat identifier, as obtained from the bot
        chat_id: String,
    },

    /// Show the stored chat id
    Show,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Shared time-window flags for list, stats, and report.
#[derive(Debug, Clone, Default, Args)]
pub struct PeriodArgs {
    /// Time window to view
    #[arg(short, long, value_enum)]
    pub period: Option<PeriodArg>,

    /// Start date of a custom range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// End date of a custom range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

impl PeriodArgs {
    /// Resolve the flags into a [`Period`].
    ///
    /// Giving `--from` or `--to` implies a custom range; an explicit
    /// `--period` wins over the configured default.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a range date does not parse.
    pub fn resolve(&self, default: &Period) -> Result<Period> {
        if self.from.is_some() || self.to.is_some() || self.period == Some(PeriodArg::Custom) {
            return Ok(Period::Custom {
                start: self.from.as_deref().map(parse_range_date).transpose()?,
                end: self.to.as_deref().map(parse_range_date).transpose()?,
            });
        }

        match self.period {
            Some(arg) => Ok(arg.into()),
            None => Ok(default.clone()),
        }
    }
}

fn parse_range_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| Error::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Period selector argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    /// Last 3 days
    #[value(name = "3days")]
    ThreeDays,
    /// Last week
    #[value(name = "1week")]
    OneWeek,
    /// Last 15 days
    #[value(name = "15days")]
    FifteenDays,
    /// Last month
    #[value(name = "1month")]
    OneMonth,
    /// Last 3 months
    #[value(name = "3months")]
    ThreeMonths,
    /// Custom range given with --from and --to
    #[value(name = "custom")]
    Custom,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::ThreeDays => Self::Last3Days,
            PeriodArg::OneWeek => Self::LastWeek,
            PeriodArg::FifteenDays => Self::Last15Days,
            PeriodArg::OneMonth => Self::LastMonth,
            PeriodArg::ThreeMonths => Self::Last3Months,
            PeriodArg::Custom => Self::Custom {
                start: None,
                end: None,
            },
        }
    }
}

/// Measurement context argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Measured before eating
    Fasting,
    /// Measured at any other time
    Normal,
}

impl From<KindArg> for ReadingKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Fasting => Self::Fasting,
            KindArg::Normal => Self::Normal,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
