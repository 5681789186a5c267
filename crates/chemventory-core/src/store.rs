//! The sync façade.
//!
//! `ChemicalStore` is the only way callers read or write records. It mints
//! ids and timestamps, merges patches and hands persistence to the selected
//! backend. Any backend failure is logged and the operation is redone
//! against the local cache alone, so none of these methods return errors.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{select_backend, BackendMode, StorageBackend};
use crate::csv::{self, CsvRow};
use crate::ids::{Clock, IdGenerator, SystemClock};
use crate::local::{RecordCache, CHEMICALS_KEY};
use crate::model::{ChemicalPatch, ChemicalRecord, NewChemical};
use crate::notify::{ChangeEvent, Subscription};
use crate::remote::RemoteConfig;

type Callback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

struct Inner {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
}

/// Cheap to clone; clones share the backend, clock and id generator.
#[derive(Clone)]
pub struct ChemicalStore {
    inner: Arc<Inner>,
}

impl ChemicalStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    pub fn with_clock(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                clock,
                ids: IdGenerator::new(),
            }),
        }
    }

    /// Select the backend from `remote` and build a store over it.
    pub fn open(cache: RecordCache, remote: Option<RemoteConfig>) -> Self {
        Self::new(select_backend(cache, remote))
    }

    pub fn mode(&self) -> BackendMode {
        self.inner.backend.mode()
    }

    fn backend(&self) -> &dyn StorageBackend {
        self.inner.backend.as_ref()
    }

    fn cache(&self) -> &RecordCache {
        self.backend().cache()
    }

    fn load_cache(&self) -> Vec<ChemicalRecord> {
        self.cache().load().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read record cache; treating it as empty");
            Vec::new()
        })
    }

    /// Every record: from the backend, else from the cache, else empty.
    pub async fn list(&self) -> Vec<ChemicalRecord> {
        match self.backend().list().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, mode = %self.mode(), "list failed; falling back to cache");
                self.load_cache()
            }
        }
    }

    /// Record with this id, if listed.
    pub async fn find(&self, id: &str) -> Option<ChemicalRecord> {
        self.list().await.into_iter().find(|r| r.id == id)
    }

    /// Rewrite the cache with `records`, then push them to the backend.
    pub async fn replace_all(&self, records: &[ChemicalRecord]) {
        if let Err(err) = self.cache().save(records) {
            warn!(error = %err, "failed to write record cache");
        }
        if let Err(err) = self.backend().push_all(records).await {
            warn!(error = %err, count = records.len(), "bulk upsert failed; cache kept");
        }
    }

    /// Store a new record under a fresh id.
    ///
    /// The id is checked against the current list, so stores in other
    /// processes minting in the same millisecond never overwrite each other.
    pub async fn add(&self, new: NewChemical) -> ChemicalRecord {
        let taken: HashSet<String> = self.list().await.into_iter().map(|r| r.id).collect();
        let now = self.inner.clock.now();
        let mut id = self.inner.ids.next_id(now);
        while taken.contains(&id) {
            id = self.inner.ids.next_id(now);
        }
        let record = new.into_record(id, now);

        match self.backend().insert(&record).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, id = %record.id, "insert failed; adding locally");
                let mut records = self.list().await;
                records.retain(|r| r.id != record.id);
                records.push(record.clone());
                self.replace_all(&records).await;
                record
            }
        }
    }

    /// Merge `patch` over the record with this id. `None` when no such record.
    pub async fn update(&self, id: &str, patch: ChemicalPatch) -> Option<ChemicalRecord> {
        let mut snapshot = self.list().await;
        let index = snapshot.iter().position(|r| r.id == id)?;

        let mut merged = patch.apply(&snapshot[index]);
        merged.updated_at = Some(next_updated_at(
            self.inner.clock.now(),
            snapshot[index].updated_at,
        ));

        match self.backend().update(&merged).await {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!(error = %err, id = %id, "update failed; updating locally");
                snapshot[index] = merged.clone();
                self.replace_all(&snapshot).await;
                Some(merged)
            }
        }
    }

    pub async fn remove(&self, id: &str) {
        if let Err(err) = self.backend().delete(id).await {
            warn!(error = %err, id = %id, "delete failed; removing locally");
            let mut records = self.list().await;
            records.retain(|r| r.id != id);
            self.replace_all(&records).await;
        }
    }

    /// Store `samples` when there are no records yet. Returns whether it did.
    pub async fn seed_if_empty(&self, samples: &[ChemicalRecord]) -> bool {
        if !self.list().await.is_empty() {
            return false;
        }
        self.replace_all(samples).await;
        true
    }

    /// Build records from CSV rows and store them after the current list.
    ///
    /// A row whose id is already listed replaces that record in place.
    pub async fn import_rows(&self, rows: &[CsvRow]) -> Vec<ChemicalRecord> {
        let imported = csv::records_from_rows(rows, &self.inner.ids, self.inner.clock.as_ref());
        let mut records = self.list().await;
        for record in &imported {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
        }
        self.replace_all(&records).await;
        imported
    }

    /// Call `callback` on every change to the record list and, with the
    /// hosted backend, on every live channel payload.
    ///
    /// Outside a Tokio runtime this logs a warning and returns an inert
    /// subscription.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("subscribe called outside a Tokio runtime; no events will be delivered");
                return Subscription::inert();
            }
        };
        let callback: Callback = Arc::new(callback);
        let mut subscription = Subscription::inert();

        let slots = Arc::clone(self.cache().store());
        let mut events = slots.subscribe();
        if let Some(watch) = slots.watch_external() {
            subscription.set_watch(watch);
        }

        let store = self.clone();
        let on_sync = Arc::clone(&callback);
        subscription.push_task(runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.key == CHEMICALS_KEY => {
                        on_sync(ChangeEvent::Sync(store.list().await));
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "storage events lagged; refreshing");
                        on_sync(ChangeEvent::Sync(store.list().await));
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));

        let (sink, mut changes) = mpsc::unbounded_channel();
        match self.backend().open_channel(sink) {
            Ok(Some(channel)) => {
                subscription.set_channel(channel);
                let on_remote = Arc::clone(&callback);
                subscription.push_task(runtime.spawn(async move {
                    while let Some(change) = changes.recv().await {
                        on_remote(ChangeEvent::Remote(change));
                    }
                }));
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to open live change channel"),
        }

        subscription
    }
}

/// The clock reading, or one millisecond past `previous` when the clock has
/// not moved beyond it.
fn next_updated_at(now: DateTime<Utc>, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match previous {
        Some(previous) if now <= previous => previous + chrono::Duration::milliseconds(1),
        _ => now,
    }
}
