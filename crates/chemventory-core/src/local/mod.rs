//! Local persisted key-value slots.
//!
//! A `KeyValueStore` holds small string values under fixed keys, the way a
//! browser's local storage would. Every write publishes a `StorageEvent`
//! so in-process listeners can refresh; the file-backed store can also watch
//! its directory for writes made by other processes.

mod cache;
mod file;
mod memory;

use std::fmt;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::{ChemventoryError, Result};

pub use cache::{RecordCache, CHEMICALS_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Capacity of the per-store event channel.
pub(crate) const EVENT_CAPACITY: usize = 64;

/// Where a storage mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    /// Written through this store instance
    Local,
    /// Noticed on disk, written by another process
    External,
}

/// A key was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: EventOrigin,
}

/// Filesystem watch for writes made by other processes. Stops on drop.
pub struct ExternalWatch {
    // Dropping the watcher closes the event feed of `handle`.
    _watcher: notify::RecommendedWatcher,
    handle: JoinHandle<()>,
}

impl ExternalWatch {
    pub(crate) fn new(watcher: notify::RecommendedWatcher, handle: JoinHandle<()>) -> Self {
        Self {
            _watcher: watcher,
            handle,
        }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl fmt::Debug for ExternalWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalWatch")
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

impl Drop for ExternalWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Persisted string slots with change notification.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Receive an event for every subsequent write or removal.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;

    /// Start watching for writes made outside this instance.
    ///
    /// Returns `None` when the store has no external writers to watch or
    /// no Tokio runtime is available.
    fn watch_external(&self) -> Option<ExternalWatch> {
        None
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ChemventoryError::InvalidInput(format!(
            "Invalid storage key: {:?}",
            key
        )))
    }
}
