//! `glucolog` - A local blood-glucose log
//!
//! This library provides the core functionality for recording glucose
//! measurements, viewing them over a time window, computing summary
//! statistics, and exporting a paginated PDF report. All state lives in a
//! local database; nothing leaves the machine.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod reading;
pub mod report;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::Period;
pub use logging::init_logging;
pub use reading::{Reading, ReadingDraft, ReadingKind};
pub use stats::{summarize, Level, Summary};
pub use storage::SlotStore;
pub use store::ReadingStore;
