//! Admin-managed user list under the `app_users` key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::ids::Clock;
use crate::local::KeyValueStore;

pub const APP_USERS_KEY: &str = "app_users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Milliseconds since the epoch when the entry was added
    pub id: i64,
    pub email: String,
}

pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stored entries; an unreadable list is empty.
    pub fn list(&self) -> Vec<UserEntry> {
        let raw = match self.store.get(APP_USERS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read user list");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "user list is unreadable; treating it as empty");
            Vec::new()
        })
    }

    fn save(&self, users: &[UserEntry]) -> Result<()> {
        self.store.set(APP_USERS_KEY, &serde_json::to_string(users)?)
    }

    /// Append `email`. A blank email is ignored and gives `None`.
    pub fn add(&self, email: &str) -> Result<Option<UserEntry>> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        let entry = UserEntry {
            id: self.clock.now().timestamp_millis(),
            email: email.to_string(),
        };
        let mut users = self.list();
        users.push(entry.clone());
        self.save(&users)?;
        Ok(Some(entry))
    }

    /// Remove the entry at `index`, returning it. Out of range gives `None`.
    pub fn remove(&self, index: usize) -> Result<Option<UserEntry>> {
        let mut users = self.list();
        if index >= users.len() {
            return Ok(None);
        }
        let removed = users.remove(index);
        self.save(&users)?;
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ManualClock;
    use crate::local::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn directory() -> (UserDirectory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        ));
        let directory = UserDirectory::new(Arc::new(MemoryStore::new()), clock.clone());
        (directory, clock)
    }

    #[test]
    fn test_add_and_remove_by_index() {
        let (directory, clock) = directory();
        directory.add("ada@lab.org").unwrap();
        clock.advance(Duration::seconds(1));
        directory.add("grace@lab.org").unwrap();
        assert_eq!(directory.add("   ").unwrap(), None);

        let emails: Vec<String> = directory.list().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["ada@lab.org", "grace@lab.org"]);

        let removed = directory.remove(0).unwrap().unwrap();
        assert_eq!(removed.email, "ada@lab.org");
        assert_eq!(directory.remove(5).unwrap(), None);
        assert_eq!(directory.list().len(), 1);
    }

    #[test]
    fn test_entry_ids_are_clock_millis() {
        let (directory, clock) = directory();
        let entry = directory.add("ada@lab.org").unwrap().unwrap();
        assert_eq!(entry.id, clock.now().timestamp_millis());
    }
}
