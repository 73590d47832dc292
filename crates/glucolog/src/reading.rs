//! Core reading types for glucolog.
//!
//! This module defines the fundamental data structures for representing
//! blood-glucose measurements and the validated construction of new records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for the `date` field and all rendered dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used for the `time` field.
pub const TIME_FORMAT: &str = "%H:%M";

/// The measurement context chosen by the user at entry time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    /// Measured before eating.
    Fasting,
    /// Measured at any other time of day.
    Normal,
}

impl ReadingKind {
    /// Human-readable label used in the table view and the report.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fasting => "Fasting",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fasting => write!(f, "fasting"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// One recorded blood-glucose measurement.
///
/// The `value` is kept exactly as entered and only interpreted as a number
/// for computation; `timestamp` is derived from `date` and `time` and is the
/// sole sort and filter key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Unique identifier, derived from the creation instant (epoch ms).
    pub id: i64,

    /// Calendar date of the measurement (`YYYY-MM-DD`).
    pub date: String,

    /// Time of day of the measurement (`HH:MM`).
    pub time: String,

    /// Concentration in mg/dL, stored as entered.
    pub value: String,

    /// Measurement context tag.
    #[serde(rename = "type")]
    pub kind: ReadingKind,

    /// Epoch milliseconds combining `date` and `time` (UTC).
    pub timestamp: i64,
}

impl Reading {
    /// Interpret the stored value as a number of mg/dL.
    ///
    /// Values that do not parse yield `NaN`, which every classification
    /// band treats as in-range Normal (matching comparison semantics on
    /// non-numeric input).
    #[must_use]
    pub fn value_mgdl(&self) -> f64 {
        self.value.trim().parse().unwrap_or(f64::NAN)
    }

    /// The measurement instant, reconstructed from the stored timestamp.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Date rendered from the timestamp (`YYYY-MM-DD`), as shown in the
    /// table view and the report.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.recorded_at()
            .map_or_else(|| self.date.clone(), |dt| dt.format(DATE_FORMAT).to_string())
    }
}

/// Unvalidated input for a new reading.
///
/// Drafts carry the raw user input; [`ReadingDraft::build`] is the only way
/// to turn one into a [`Reading`], rejecting malformed input at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingDraft {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,

    /// Time of day (`HH:MM`).
    pub time: String,

    /// Concentration in mg/dL, as entered.
    pub value: String,

    /// Measurement context tag.
    pub kind: ReadingKind,
}

impl ReadingDraft {
    /// Create a draft from explicit fields.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        value: impl Into<String>,
        kind: ReadingKind,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            value: value.into(),
            kind,
        }
    }

    /// Validate the draft and build a [`Reading`].
    ///
    /// The record id is derived from `now` (epoch milliseconds), and the
    /// timestamp from the draft's date and time interpreted in UTC.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the value is empty or whitespace,
    /// and an invalid-date/invalid-time error when either string does not
    /// parse.
    pub fn build(&self, now: DateTime<Utc>) -> Result<Reading> {
        if self.value.trim().is_empty() {
            return Err(Error::validation("blood sugar value is required"));
        }

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|source| {
            Error::InvalidDate {
                value: self.date.clone(),
                source,
            }
        })?;
        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT).map_err(|source| {
            Error::InvalidTime {
                value: self.time.clone(),
                source,
            }
        })?;

        Ok(Reading {
            id: now.timestamp_millis(),
            date: self.date.clone(),
            time: self.time.clone(),
            value: self.value.clone(),
            kind: self.kind,
            timestamp: date.and_time(time).and_utc().timestamp_millis(),
        })
    }
}
