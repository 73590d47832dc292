//! The reading store: the single owner of mutable application state.
//!
//! The store keeps the collection in memory, sorted by timestamp descending,
//! and mirrors it to the persistent readings slot after every mutation.
//! Persistence is best-effort: read and write failures are logged and
//! swallowed so a broken slot never takes down the session.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::reading::{Reading, ReadingDraft};
use crate::storage::{SlotStore, READINGS_SLOT, REMINDER_SLOT};

/// In-memory reading collection mirrored to a [`SlotStore`] slot.
///
/// Invariant: after any mutation the collection is sorted by `timestamp`
/// descending. Loading does not re-sort, so a persisted collection round
/// trips with its order intact.
#[derive(Debug)]
pub struct ReadingStore {
    slots: SlotStore,
    readings: Vec<Reading>,
}

impl ReadingStore {
    /// Load the persisted collection from the given slot store.
    ///
    /// A missing slot or one that fails to deserialize yields an empty
    /// collection; the failure is logged, never surfaced.
    #[must_use]
    pub fn load(slots: SlotStore) -> Self {
        let readings = match slots.get(READINGS_SLOT) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(readings) => readings,
                Err(err) => {
                    warn!("Ignoring unreadable readings slot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to read readings slot, starting empty: {err}");
                Vec::new()
            }
        };

        debug!("Loaded {} readings", readings.len());
        Self { slots, readings }
    }

    /// The current collection, newest first.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of readings in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Validate a draft, insert the resulting reading, and persist.
    ///
    /// The new record's id is derived from `now`. The collection is re-sorted
    /// by timestamp descending (stable, so same-instant readings keep their
    /// insertion order).
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty value or malformed date/time;
    /// the collection is unchanged in that case.
    pub fn add(&mut self, draft: &ReadingDraft, now: DateTime<Utc>) -> Result<Reading> {
        let reading = draft.build(now)?;

        self.readings.push(reading.clone());
        self.readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.persist();

        debug!("Added reading {} ({} mg/dL)", reading.id, reading.value);
        Ok(reading)
    }

    /// Remove the reading with the given id and persist.
    ///
    /// Returns `true` if a reading was removed; an absent id is a no-op
    /// (the unchanged collection is still rewritten).
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.readings.len();
        self.readings.retain(|r| r.id != id);
        let removed = self.readings.len() < before;

        self.persist();
        if removed {
            debug!("Removed reading {}", id);
        }
        removed
    }

    /// The stored reminder chat id, if one has been set.
    ///
    /// Slot failures are treated as "not set", matching the best-effort
    /// storage contract.
    #[must_use]
    pub fn reminder(&self) -> Option<String> {
        match self.slots.get(REMINDER_SLOT) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read reminder slot: {err}");
                None
            }
        }
    }

    /// Store the opaque reminder chat id, replacing any previous one.
    ///
    /// Delivery is handled entirely by the external bot; this only records
    /// the identifier. Write failures are logged and swallowed.
    pub fn set_reminder(&self, chat_id: &str) {
        if let Err(err) = self.slots.put(REMINDER_SLOT, chat_id) {
            warn!("Failed to persist reminder chat id: {err}");
        }
    }

    /// Serialize the whole collection into the readings slot, best-effort.
    fn persist(&self) {
        let json = match serde_json::to_string(&self.readings) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize readings, skipping persist: {err}");
                return;
            }
        };
        if let Err(err) = self.slots.put(READINGS_SLOT, &json) {
            warn!("Failed to persist readings: {err}");
        }
    }
}
