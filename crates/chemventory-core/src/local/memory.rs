//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::{validate_key, EventOrigin, KeyValueStore, StorageEvent, EVENT_CAPACITY};
use crate::error::{ChemventoryError, Result};

/// Process-local store, used for tests and throwaway sessions.
#[derive(Debug)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            slots: Mutex::new(HashMap::new()),
            events,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slots(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| ChemventoryError::Storage("Memory store poisoned".to_string()))
    }

    fn publish(&self, key: &str) {
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            origin: EventOrigin::Local,
        });
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.lock_slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.lock_slots()?.insert(key.to_string(), value.to_string());
        self.publish(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.lock_slots()?.remove(key);
        self.publish(key);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
