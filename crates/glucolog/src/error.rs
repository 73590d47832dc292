//! Error types for glucolog.
//!
//! This module defines all error types used throughout the glucolog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for glucolog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A reading draft failed validation.
    #[error("invalid reading: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A date string could not be parsed.
    #[error("invalid date '{value}' (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// The underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// A time string could not be parsed.
    #[error("invalid time '{value}' (expected HH:MM): {source}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// The underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Report Errors ===
    /// The PDF backend could not produce the report document.
    #[error("report unavailable: {message}")]
    ReportUnavailable {
        /// Why the report could not be produced.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for glucolog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new report-unavailable error.
    #[must_use]
    pub fn report_unavailable(message: impl Into<String>) -> Self {
        Self::ReportUnavailable {
            message: message.into(),
        }
    }

    /// Check if this error was caused by a rejected reading draft.
    ///
    /// Covers the empty-value check as well as malformed date/time input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidDate { .. } | Self::InvalidTime { .. }
        )
    }

    /// Check if this error means the report backend was unavailable.
    #[must_use]
    pub fn is_report_unavailable(&self) -> bool {
        matches!(self, Self::ReportUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("blood sugar value is required");
        assert_eq!(
            err.to_string(),
            "invalid reading: blood sugar value is required"
        );
    }

    #[test]
    fn test_error_is_validation() {
        assert!(Error::validation("empty").is_validation());
        assert!(!Error::report_unavailable("offline").is_validation());
    }

    #[test]
    fn test_invalid_date_is_validation() {
        let parse_err = chrono::NaiveDate::parse_from_str("garbage", "%Y-%m-%d").unwrap_err();
        let err = Error::InvalidDate {
            value: "garbage".to_string(),
            source: parse_err,
        };
        assert!(err.is_validation());
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn test_invalid_time_is_validation() {
        let parse_err = chrono::NaiveTime::parse_from_str("25:99", "%H:%M").unwrap_err();
        let err = Error::InvalidTime {
            value: "25:99".to_string(),
            source: parse_err,
        };
        assert!(err.is_validation());
        assert!(err.to_string().contains("25:99"));
    }

    #[test]
    fn test_error_is_report_unavailable() {
        let err = Error::report_unavailable("no PDF backend");
        assert!(err.is_report_unavailable());
        assert!(!Error::validation("empty").is_report_unavailable());
    }

    #[test]
    fn test_report_unavailable_display() {
        let err = Error::report_unavailable("font could not be loaded");
        assert_eq!(
            err.to_string(),
            "report unavailable: font could not be loaded"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "unknown period".to_string(),
        };
        assert!(err.to_string().contains("unknown period"));
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "bad schema version".to_string(),
        };
        assert!(err.to_string().contains("bad schema version"));
    }
}
