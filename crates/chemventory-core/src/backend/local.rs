//! Backend that only touches the local cache.

use async_trait::async_trait;

use super::{BackendMode, StorageBackend};
use crate::error::Result;
use crate::local::RecordCache;
use crate::model::ChemicalRecord;

pub struct LocalOnlyBackend {
    cache: RecordCache,
}

impl LocalOnlyBackend {
    pub fn new(cache: RecordCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl StorageBackend for LocalOnlyBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::LocalOnly
    }

    fn cache(&self) -> &RecordCache {
        &self.cache
    }

    async fn list(&self) -> Result<Vec<ChemicalRecord>> {
        self.cache.load()
    }

    async fn push_all(&self, _records: &[ChemicalRecord]) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, record: &ChemicalRecord) -> Result<ChemicalRecord> {
        self.cache.upsert(record)?;
        Ok(record.clone())
    }

    async fn update(&self, record: &ChemicalRecord) -> Result<ChemicalRecord> {
        self.cache.upsert(record)?;
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.cache.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryStore;
    use crate::model::NewChemical;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_local_backend_round_trip() {
        let backend = LocalOnlyBackend::new(RecordCache::new(Arc::new(MemoryStore::new())));
        let record = NewChemical::new("Ethanol", "B-1").into_record("1".to_string(), Utc::now());

        backend.insert(&record).await.unwrap();
        assert_eq!(backend.list().await.unwrap(), vec![record.clone()]);

        let mut renamed = record.clone();
        renamed.name = "Ethanol 96%".to_string();
        backend.update(&renamed).await.unwrap();
        assert_eq!(backend.list().await.unwrap()[0].name, "Ethanol 96%");

        backend.delete("1").await.unwrap();
        assert!(backend.list().await.unwrap().is_empty());
    }
}
