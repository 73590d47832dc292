//! Time-window filtering of readings.
//!
//! A [`Period`] selects which readings are in view. Fixed windows look back a
//! whole number of days from the supplied clock instant and are open-ended
//! toward the future; custom ranges are inclusive on both calendar days.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::reading::{Reading, DATE_FORMAT};

/// A view window over the reading history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Period {
    /// Readings from the last 3 days.
    Last3Days,
    /// Readings from the last 7 days.
    LastWeek,
    /// Readings from the last 15 days.
    Last15Days,
    /// Readings from the last 30 days.
    LastMonth,
    /// Readings from the last 90 days.
    Last3Months,
    /// Readings between two calendar days, both inclusive.
    ///
    /// When either bound is missing the range is not applied and every
    /// reading stays in view.
    Custom {
        /// First day of the range.
        start: Option<NaiveDate>,
        /// Last day of the range.
        end: Option<NaiveDate>,
    },
}

impl Period {
    /// Parse a period selector as used in configuration and on the
    /// command line.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown selector.
    pub fn from_selector(selector: &str) -> Result<Self> {
        match selector {
            "3days" => Ok(Self::Last3Days),
            "1week" => Ok(Self::LastWeek),
            "15days" => Ok(Self::Last15Days),
            "1month" => Ok(Self::LastMonth),
            "3months" => Ok(Self::Last3Months),
            "custom" => Ok(Self::Custom {
                start: None,
                end: None,
            }),
            other => Err(Error::validation(format!(
                "unknown period '{other}' (expected 3days, 1week, 15days, 1month, 3months, or custom)"
            ))),
        }
    }

    /// Width of a fixed window in days, `None` for custom ranges.
    #[must_use]
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Last3Days => Some(3),
            Self::LastWeek => Some(7),
            Self::Last15Days => Some(15),
            Self::LastMonth => Some(30),
            Self::Last3Months => Some(90),
            Self::Custom { .. } => None,
        }
    }

    /// Human-readable label for list headings and the report.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Last3Days => "Last 3 Days".to_string(),
            Self::LastWeek => "Last Week".to_string(),
            Self::Last15Days => "Last 15 Days".to_string(),
            Self::LastMonth => "Last Month".to_string(),
            Self::Last3Months => "Last 3 Months".to_string(),
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => format!("{} to {}", start.format(DATE_FORMAT), end.format(DATE_FORMAT)),
            Self::Custom { .. } => "All Time".to_string(),
        }
    }

    /// Select the readings inside this window, preserving input order.
    ///
    /// Fixed windows keep everything at or after `now` minus the window
    /// width, with no upper bound. Custom ranges keep everything from the
    /// first instant of `start` through the last whole second of `end`;
    /// with either bound missing, the input is returned unfiltered.
    #[must_use]
    pub fn filter(&self, readings: &[Reading], now: DateTime<Utc>) -> Vec<Reading> {
        match self {
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => {
                let from = start.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
                let to = end_of_day(*end).and_utc().timestamp_millis();
                readings
                    .iter()
                    .filter(|r| r.timestamp >= from && r.timestamp <= to)
                    .cloned()
                    .collect()
            }
            Self::Custom { .. } => readings.to_vec(),
            _ => {
                // days() is Some for every fixed window.
                let days = self.days().unwrap_or_default();
                let cutoff = (now - Duration::days(days)).timestamp_millis();
                readings
                    .iter()
                    .filter(|r| r.timestamp >= cutoff)
                    .cloned()
                    .collect()
            }
        }
    }
}

/// The last whole second of a calendar day.
fn end_of_day(date: NaiveDate) -> chrono::NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{ReadingDraft, ReadingKind};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn reading_at(date: &str, time: &str) -> Reading {
        ReadingDraft::new(date, time, "100", ReadingKind::Normal)
            .build(now())
            .unwrap()
    }

    #[test]
    fn test_from_selector() {
        assert_eq!(Period::from_selector("3days").unwrap(), Period::Last3Days);
        assert_eq!(Period::from_selector("1week").unwrap(), Period::LastWeek);
        assert_eq!(Period::from_selector("15days").unwrap(), Period::Last15Days);
        assert_eq!(Period::from_selector("1month").unwrap(), Period::LastMonth);
        assert_eq!(Period::from_selector("3months").unwrap(), Period::Last3Months);
        assert!(matches!(
            Period::from_selector("custom").unwrap(),
            Period::Custom { start: None, end: None }
        ));
    }

    #[test]
    fn test_from_selector_rejects_unknown() {
        let err = Period::from_selector("fortnight").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("fortnight"));
    }

    #[test]
    fn test_window_widths() {
        assert_eq!(Period::Last3Days.days(), Some(3));
        assert_eq!(Period::LastWeek.days(), Some(7));
        assert_eq!(Period::Last15Days.days(), Some(15));
        assert_eq!(Period::LastMonth.days(), Some(30));
        assert_eq!(Period::Last3Months.days(), Some(90));
        assert_eq!(
            Period::Custom {
                start: None,
                end: None
            }
            .days(),
            None
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Period::Last3Days.label(), "Last 3 Days");
        assert_eq!(Period::LastWeek.label(), "Last Week");
        assert_eq!(Period::Last15Days.label(), "Last 15 Days");
        assert_eq!(Period::LastMonth.label(), "Last Month");
        assert_eq!(Period::Last3Months.label(), "Last 3 Months");

        let custom = Period::Custom {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            end: NaiveDate::from_ymd_opt(2024, 6, 10),
        };
        assert_eq!(custom.label(), "2024-06-01 to 2024-06-10");

        let open = Period::Custom {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            end: None,
        };
        assert_eq!(open.label(), "All Time");
    }

    #[test]
    fn test_fixed_window_boundary_is_inclusive() {
        // now is 2024-06-15 12:00; the week window opens at 2024-06-08 12:00.
        let at_boundary = reading_at("2024-06-08", "12:00");
        let just_before = reading_at("2024-06-08", "11:59");
        let readings = vec![at_boundary.clone(), just_before];

        let kept = Period::LastWeek.filter(&readings, now());
        assert_eq!(kept, vec![at_boundary]);
    }

    #[test]
    fn test_fixed_window_has_no_upper_bound() {
        let future = reading_at("2024-07-01", "09:00");
        let kept = Period::Last3Days.filter(&[future.clone()], now());
        assert_eq!(kept, vec![future]);
    }

    #[test]
    fn test_three_day_window() {
        let inside = reading_at("2024-06-13", "08:00");
        let outside = reading_at("2024-06-11", "08:00");
        let kept = Period::Last3Days.filter(&[inside.clone(), outside], now());
        assert_eq!(kept, vec![inside]);
    }

    #[test]
    fn test_custom_range_is_day_inclusive() {
        let first_instant = reading_at("2024-06-01", "00:00");
        let last_second = reading_at("2024-06-10", "23:59");
        let after = reading_at("2024-06-11", "00:00");
        let before = reading_at("2024-05-31", "23:59");
        let readings = vec![
            first_instant.clone(),
            last_second.clone(),
            after,
            before,
        ];

        let period = Period::Custom {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            end: NaiveDate::from_ymd_opt(2024, 6, 10),
        };
        let kept = period.filter(&readings, now());
        assert_eq!(kept, vec![first_instant, last_second]);
    }

    #[test]
    fn test_custom_range_missing_bound_keeps_everything() {
        let readings = vec![
            reading_at("2020-01-01", "08:00"),
            reading_at("2024-06-14", "08:00"),
        ];

        let period = Period::Custom {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            end: None,
        };
        assert_eq!(period.filter(&readings, now()), readings);

        let period = Period::Custom {
            start: None,
            end: NaiveDate::from_ymd_opt(2024, 6, 10),
        };
        assert_eq!(period.filter(&readings, now()), readings);
    }

    #[test]
    fn test_custom_range_inverted_bounds_is_empty() {
        let readings = vec![reading_at("2024-06-05", "08:00")];
        let period = Period::Custom {
            start: NaiveDate::from_ymd_opt(2024, 6, 10),
            end: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        assert!(period.filter(&readings, now()).is_empty());
    }

    #[test]
    fn test_filter_preserves_order_and_input() {
        let readings = vec![
            reading_at("2024-06-14", "20:00"),
            reading_at("2024-06-13", "08:00"),
            reading_at("2024-06-12", "08:00"),
        ];

        let kept = Period::LastWeek.filter(&readings, now());
        assert_eq!(kept, readings);
        // Source slice is untouched.
        assert_eq!(readings.len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let readings = vec![
            reading_at("2024-06-14", "08:00"),
            reading_at("2024-06-01", "08:00"),
            reading_at("2024-03-01", "08:00"),
        ];

        let once = Period::LastMonth.filter(&readings, now());
        let twice = Period::LastMonth.filter(&once, now());
        assert_eq!(once, twice);
    }
}
