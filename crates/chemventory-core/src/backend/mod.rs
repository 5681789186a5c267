//! Storage backend trait definition.
//!
//! The `StorageBackend` trait is the seam between the sync façade and the
//! place records actually live. Two implementations exist: one that only
//! touches the local cache, and one that talks to the hosted table first
//! and mirrors into the cache. The backend is chosen once, at startup, by
//! whether the hosted backend is configured.

mod local;
mod remote;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::local::RecordCache;
use crate::model::ChemicalRecord;
use crate::remote::{ChangeChannel, PostgrestClient, RemoteChange, RemoteConfig};

pub use local::LocalOnlyBackend;
pub use remote::RemoteBackedBackend;

/// Which backend a store was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    LocalOnly,
    RemoteBacked,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::LocalOnly => "local",
            BackendMode::RemoteBacked => "remote",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence interface behind `ChemicalStore`.
///
/// Implementations report failures instead of recovering from them; the
/// façade owns the fallback to the local cache. All implementations must
/// ensure:
/// - the cache is only ever rewritten as a whole array
/// - a successful mutation is reflected in the cache before returning
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// The local record cache this backend mirrors into.
    fn cache(&self) -> &RecordCache;

    /// Read every record.
    ///
    /// # Errors
    ///
    /// Returns `ChemventoryError::Remote` if the hosted table cannot be read,
    /// or `ChemventoryError::Validation` if the cache slot is corrupt.
    async fn list(&self) -> Result<Vec<ChemicalRecord>>;

    /// Push the full record set after the cache has been rewritten.
    ///
    /// A no-op for the local-only backend.
    async fn push_all(&self, records: &[ChemicalRecord]) -> Result<()>;

    /// Store a freshly minted record.
    ///
    /// # Returns
    ///
    /// The record as stored, which for the hosted table is the server row.
    async fn insert(&self, record: &ChemicalRecord) -> Result<ChemicalRecord>;

    /// Store a merged record over the existing one with the same id.
    ///
    /// # Returns
    ///
    /// The record as stored.
    async fn update(&self, record: &ChemicalRecord) -> Result<ChemicalRecord>;

    /// Delete the record with this id.
    ///
    /// # Errors
    ///
    /// Returns `ChemventoryError::NotFound` if the hosted table had no such
    /// row, or `ChemventoryError::Remote` if the request failed.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Open the live change channel, if this backend has one.
    fn open_channel(
        &self,
        _sink: mpsc::UnboundedSender<RemoteChange>,
    ) -> Result<Option<ChangeChannel>> {
        Ok(None)
    }
}

/// Choose the backend for this process.
///
/// A usable remote configuration selects the remote-backed backend; anything
/// else (including a client that fails to build) selects local-only.
pub fn select_backend(
    cache: RecordCache,
    remote: Option<RemoteConfig>,
) -> Arc<dyn StorageBackend> {
    let Some(config) = remote else {
        debug!("hosted backend not configured; using local cache only");
        return Arc::new(LocalOnlyBackend::new(cache));
    };

    match PostgrestClient::new(&config) {
        Ok(client) => {
            debug!(url = %config.url, "using hosted backend");
            Arc::new(RemoteBackedBackend::new(cache, Arc::new(client)))
        }
        Err(err) => {
            warn!(error = %err, "hosted backend client failed to start; using local cache only");
            Arc::new(LocalOnlyBackend::new(cache))
        }
    }
}
