//! The `chemicals_v1` slot: the full record list as a JSON array.

use std::sync::Arc;

use super::KeyValueStore;
use crate::error::Result;
use crate::model::ChemicalRecord;

/// Key of the cached record list.
pub const CHEMICALS_KEY: &str = "chemicals_v1";

/// Whole-list cache of chemical records.
///
/// Every write replaces the entire array; there is no field-level merge.
#[derive(Clone)]
pub struct RecordCache {
    store: Arc<dyn KeyValueStore>,
}

impl RecordCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying slot store, shared with sessions and the user directory.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read the cached list. A missing slot is an empty list.
    pub fn load(&self) -> Result<Vec<ChemicalRecord>> {
        match self.store.get(CHEMICALS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Replace the cached list.
    pub fn save(&self, records: &[ChemicalRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(CHEMICALS_KEY, &raw)
    }

    /// Replace the record with the same id, or append it.
    pub fn upsert(&self, record: &ChemicalRecord) -> Result<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.save(&records)
    }

    /// Drop the record with this id, if cached.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut records = self.load()?;
        records.retain(|r| r.id != id);
        self.save(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryStore;
    use crate::model::NewChemical;
    use chrono::Utc;

    fn record(id: &str, name: &str) -> ChemicalRecord {
        NewChemical::new(name, "B-1").into_record(id.to_string(), Utc::now())
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let cache = RecordCache::new(Arc::new(MemoryStore::new()));
        assert!(cache.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(CHEMICALS_KEY, "{not json").unwrap();
        let cache = RecordCache::new(store);
        assert!(cache.load().is_err());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let cache = RecordCache::new(Arc::new(MemoryStore::new()));
        cache.save(&[record("1", "A"), record("2", "B")]).unwrap();

        cache.upsert(&record("1", "A2")).unwrap();
        cache.upsert(&record("3", "C")).unwrap();

        let names: Vec<String> = cache.load().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A2", "B", "C"]);
    }

    #[test]
    fn test_remove_drops_only_matching_id() {
        let cache = RecordCache::new(Arc::new(MemoryStore::new()));
        cache.save(&[record("1", "A"), record("2", "B")]).unwrap();
        cache.remove("1").unwrap();
        cache.remove("missing").unwrap();

        let ids: Vec<String> = cache.load().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
