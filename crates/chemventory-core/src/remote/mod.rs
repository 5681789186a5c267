//! Hosted backend: the `chemicals` table, the `logs` audit table and a live
//! change channel on `chemicals`.

mod changes;
mod postgrest;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ChemventoryError, Result};
use crate::model::{AuditEntry, ChemicalRecord};

pub use changes::diff_snapshots;
pub use postgrest::PostgrestClient;

pub const CHEMICALS_TABLE: &str = "chemicals";
pub const LOGS_TABLE: &str = "logs";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    /// How often the live channel re-reads the table
    pub poll_interval: Duration,
}

impl RemoteConfig {
    /// Build a config only when both the URL and the key are present and non-blank.
    pub fn from_parts(url: Option<String>, anon_key: Option<String>) -> Option<Self> {
        let url = url.filter(|v| !v.trim().is_empty())?;
        let anon_key = anon_key.filter(|v| !v.trim().is_empty())?;
        Some(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Option<Self> {
        Self::from_parts(
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_ANON_KEY").ok(),
        )
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Kind of row change on the live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }
}

/// Raw change payload, shaped like a `postgres_changes` event.
///
/// `new` and `old` carry the rows exactly as the backend returned them
/// (`{}` when not applicable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteChange {
    pub schema: String,
    pub table: String,
    #[serde(rename = "eventType")]
    pub event_type: ChangeKind,
    pub new: serde_json::Value,
    pub old: serde_json::Value,
    pub commit_timestamp: DateTime<Utc>,
}

impl RemoteChange {
    /// Id of the affected row, from `new` or else `old`.
    pub fn record_id(&self) -> Option<String> {
        changes::row_id(&self.new).or_else(|| changes::row_id(&self.old))
    }
}

/// An open live change channel. Closed on drop.
#[derive(Debug)]
pub struct ChangeChannel {
    handle: JoinHandle<()>,
}

impl ChangeChannel {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stop the channel. Errors if it had already stopped on its own.
    pub fn close(self) -> Result<()> {
        let result = if self.handle.is_finished() {
            Err(ChemventoryError::Remote(
                "change channel already closed".to_string(),
            ))
        } else {
            Ok(())
        };
        self.handle.abort();
        result
    }
}

impl Drop for ChangeChannel {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Data access to the hosted tables.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every row of `chemicals`.
    async fn select_all(&self) -> Result<Vec<ChemicalRecord>>;

    /// Insert one row, returning it as stored.
    async fn insert(&self, record: &ChemicalRecord) -> Result<ChemicalRecord>;

    /// Insert-or-update rows keyed by `id`, returning them as stored.
    async fn upsert(&self, records: &[ChemicalRecord]) -> Result<Vec<ChemicalRecord>>;

    /// Delete one row by id, returning the deleted row.
    ///
    /// Deleting an id that matches no row is an error.
    async fn delete(&self, id: &str) -> Result<ChemicalRecord>;

    /// Append to the `logs` table.
    async fn append_log(&self, entry: &AuditEntry) -> Result<()>;

    /// Open a live change channel on `chemicals`, delivering payloads to `sink`.
    fn open_channel(&self, sink: mpsc::UnboundedSender<RemoteChange>) -> Result<ChangeChannel>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_both_parts() {
        assert!(RemoteConfig::from_parts(Some("https://x.supabase.co".into()), None).is_none());
        assert!(RemoteConfig::from_parts(None, Some("key".into())).is_none());
        assert!(
            RemoteConfig::from_parts(Some("  ".into()), Some("key".into())).is_none()
        );

        let config =
            RemoteConfig::from_parts(Some("https://x.supabase.co/".into()), Some(" key ".into()))
                .unwrap();
        assert_eq!(config.url, "https://x.supabase.co");
        assert_eq!(config.anon_key, "key");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_remote_change_wire_shape() {
        let change = RemoteChange {
            schema: DEFAULT_SCHEMA.to_string(),
            table: CHEMICALS_TABLE.to_string(),
            event_type: ChangeKind::Delete,
            new: serde_json::json!({}),
            old: serde_json::json!({"id": "7"}),
            commit_timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["eventType"], "DELETE");
        assert_eq!(json["table"], "chemicals");
        assert_eq!(change.record_id().as_deref(), Some("7"));
    }
}
