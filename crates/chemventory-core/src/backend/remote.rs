//! Backend that writes to the hosted table and mirrors into the cache.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use super::{BackendMode, StorageBackend};
use crate::error::Result;
use crate::local::RecordCache;
use crate::model::{AuditAction, AuditEntry, ChemicalRecord};
use crate::remote::{ChangeChannel, RemoteChange, RemoteStore, CHEMICALS_TABLE};

/// Remote-first backend.
///
/// Successful mutations are mirrored into the cache and appended to the
/// audit log; mirror and audit failures are logged, never returned. Ids
/// whose remote delete failed are remembered for the life of the backend
/// and filtered out of every later remote read.
pub struct RemoteBackedBackend {
    cache: RecordCache,
    remote: Arc<dyn RemoteStore>,
    tombstones: Mutex<HashSet<String>>,
}

impl RemoteBackedBackend {
    pub fn new(cache: RecordCache, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            cache,
            remote,
            tombstones: Mutex::new(HashSet::new()),
        }
    }

    fn tombstones(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.tombstones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mirror(&self, record: &ChemicalRecord) {
        if let Err(err) = self.cache.upsert(record) {
            warn!(error = %err, id = %record.id, "failed to mirror record into cache");
        }
    }

    async fn audit(&self, action: AuditAction, record: &ChemicalRecord) {
        let data = serde_json::to_value(record).unwrap_or(serde_json::Value::Null);
        let entry = AuditEntry::new(action, CHEMICALS_TABLE, record.id.clone(), data);
        if let Err(err) = self.remote.append_log(&entry).await {
            warn!(error = %err, id = %record.id, action = ?action, "failed to write audit entry");
        }
    }
}

#[async_trait]
impl StorageBackend for RemoteBackedBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::RemoteBacked
    }

    fn cache(&self) -> &RecordCache {
        &self.cache
    }

    async fn list(&self) -> Result<Vec<ChemicalRecord>> {
        let mut records = self.remote.select_all().await?;
        let tombstones = self.tombstones();
        if !tombstones.is_empty() {
            records.retain(|r| !tombstones.contains(&r.id));
        }
        Ok(records)
    }

    async fn push_all(&self, records: &[ChemicalRecord]) -> Result<()> {
        self.remote.upsert(records).await?;
        Ok(())
    }

    async fn insert(&self, record: &ChemicalRecord) -> Result<ChemicalRecord> {
        let stored = self.remote.insert(record).await?;
        self.mirror(&stored);
        self.audit(AuditAction::Insert, &stored).await;
        Ok(stored)
    }

    async fn update(&self, record: &ChemicalRecord) -> Result<ChemicalRecord> {
        let mut rows = self.remote.upsert(std::slice::from_ref(record)).await?;
        let stored = rows
            .iter()
            .position(|r| r.id == record.id)
            .map(|index| rows.swap_remove(index))
            .unwrap_or_else(|| record.clone());
        self.mirror(&stored);
        self.audit(AuditAction::Update, &stored).await;
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.remote.delete(id).await {
            Ok(deleted) => {
                if let Err(err) = self.cache.remove(id) {
                    warn!(error = %err, id = %id, "failed to remove record from cache");
                }
                self.audit(AuditAction::Delete, &deleted).await;
                Ok(())
            }
            Err(err) => {
                self.tombstones().insert(id.to_string());
                Err(err)
            }
        }
    }

    fn open_channel(
        &self,
        sink: mpsc::UnboundedSender<RemoteChange>,
    ) -> Result<Option<ChangeChannel>> {
        self.remote.open_channel(sink).map(Some)
    }
}
