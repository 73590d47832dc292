//! Persistent key-value slots for glucolog.
//!
//! All state lives in two independent slots inside one local `SQLite`
//! database: the serialized reading collection and the reminder chat id.
//! Every write replaces the whole slot value; there is no incremental
//! format.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Slot holding the JSON-serialized reading collection.
pub const READINGS_SLOT: &str = "blood-sugar-readings";

/// Slot holding the opaque Telegram chat identifier.
pub const REMINDER_SLOT: &str = "telegram-chat-id";

/// Reserved slot recording the schema version of the database.
const SCHEMA_VERSION_SLOT: &str = "schema-version";

/// Schema version written by this build.
const SCHEMA_VERSION: i64 = 1;

/// A key-value store backed by a local `SQLite` database.
///
/// Values are opaque strings; callers own serialization. `put` is a
/// full-replace, matching the tracker's whole-collection persistence model.
#[derive(Debug)]
pub struct SlotStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SlotStore {
    /// Open or create a slot database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and initializes the schema on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the schema cannot
    /// be initialized, or the file was written by a newer schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps reads cheap while a write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory slot store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value of a slot, `None` when the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replace the value of a slot, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        debug!("Wrote {} bytes to slot {}", value.len(), key);
        Ok(())
    }
}

/// Create the slots table and stamp the schema version.
fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS slots (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;

    let version: Option<String> = conn
        .query_row(
            "SELECT value FROM slots WHERE key = ?1",
            [SCHEMA_VERSION_SLOT],
            |row| row.get(0),
        )
        .optional()?;

    match version {
        None => {
            conn.execute(
                "INSERT INTO slots (key, value) VALUES (?1, ?2)",
                params![SCHEMA_VERSION_SLOT, SCHEMA_VERSION.to_string()],
            )?;
            debug!("Initialized schema at version {}", SCHEMA_VERSION);
        }
        Some(found) => {
            let found: i64 = found.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("unreadable schema version '{found}'"),
            })?;
            if found > SCHEMA_VERSION {
                return Err(Error::DatabaseMigration {
                    message: format!(
                        "database schema version {found} is newer than supported version {SCHEMA_VERSION}"
                    ),
                });
            }
        }
    }

    Ok(())
}
