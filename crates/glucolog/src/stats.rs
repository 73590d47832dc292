//! Summary statistics and table-view classification for readings.
//!
//! Two independent classification policies exist on purpose: [`Level`] drives
//! the table view's status column, while the report body uses its own color
//! bands (see [`crate::report::value_color`]). Their boundary treatment
//! differs and they must not be merged.

use serde::Serialize;

use crate::reading::Reading;

/// Aggregate statistics over a set of readings.
///
/// `avg` is pre-rounded to one decimal place; `min` and `max` are the raw
/// extremes. An empty input yields the all-zero sentinel rather than an
/// error so callers can always render the stats row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Mean value, rounded half-away-from-zero to one decimal.
    pub avg: f64,
    /// Smallest value in the set.
    pub min: f64,
    /// Largest value in the set.
    pub max: f64,
}

impl Summary {
    /// The sentinel returned for an empty set of readings.
    pub const EMPTY: Self = Self {
        avg: 0.0,
        min: 0.0,
        max: 0.0,
    };
}

/// Compute [`Summary`] statistics over the given readings.
///
/// Non-numeric values participate as `NaN`: they poison the average and are
/// skipped by min/max, matching how the values behave in comparisons.
#[must_use]
pub fn summarize(readings: &[Reading]) -> Summary {
    if readings.is_empty() {
        return Summary::EMPTY;
    }

    let values: Vec<f64> = readings.iter().map(Reading::value_mgdl).collect();
    let sum: f64 = values.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let avg = sum / values.len() as f64;

    Summary {
        avg: round_to_tenth(avg),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Round half-away-from-zero to one decimal place.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Table-view status band for a single value.
///
/// Checked in order: below 70 is low, above 180 is high, above 100 is
/// elevated, everything else (including exactly 100 and 180, and values
/// that fail to parse) is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Below 70 mg/dL.
    Low,
    /// Above 180 mg/dL.
    High,
    /// Above 100 mg/dL, up to and including 180.
    Elevated,
    /// Everything else.
    Normal,
}

impl Level {
    /// Classify a value in mg/dL.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value < 70.0 {
            Self::Low
        } else if value > 180.0 {
            Self::High
        } else if value > 100.0 {
            Self::Elevated
        } else {
            Self::Normal
        }
    }

    /// Human-readable label used in the table view.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
            Self::Elevated => "Elevated",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
