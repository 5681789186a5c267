//! Live change feed built by polling the table and diffing snapshots by id.
//!
//! Payloads are synthesized from the diff, not received from the backend's
//! `postgres_changes` stream. All edits a row gets between two polls arrive
//! as one event carrying the latest row, a row inserted and deleted within
//! one interval is never reported, and `commit_timestamp` is the poll time.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{ChangeChannel, ChangeKind, PostgrestClient, RemoteChange, DEFAULT_SCHEMA};
use crate::error::{ChemventoryError, Result};

/// Rows keyed by id, in the order the backend returned them.
pub(crate) type Snapshot = Vec<(String, serde_json::Value)>;

/// Id of a raw row; numeric ids are rendered as strings.
pub(crate) fn row_id(row: &serde_json::Value) -> Option<String> {
    match row.get("id")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn snapshot(rows: Vec<serde_json::Value>) -> Snapshot {
    rows.into_iter()
        .filter_map(|row| row_id(&row).map(|id| (id, row)))
        .collect()
}

/// Changes that turn `previous` into `next`: inserts and updates in `next`
/// order, then deletes in `previous` order.
pub fn diff_snapshots(
    previous: &[(String, serde_json::Value)],
    next: &[(String, serde_json::Value)],
    table: &str,
    at: DateTime<Utc>,
) -> Vec<RemoteChange> {
    let before: HashMap<&str, &serde_json::Value> =
        previous.iter().map(|(id, row)| (id.as_str(), row)).collect();
    let after: HashMap<&str, &serde_json::Value> =
        next.iter().map(|(id, row)| (id.as_str(), row)).collect();
    let empty = || serde_json::Value::Object(serde_json::Map::new());
    let change = |event_type, new, old| RemoteChange {
        schema: DEFAULT_SCHEMA.to_string(),
        table: table.to_string(),
        event_type,
        new,
        old,
        commit_timestamp: at,
    };

    let mut changes = Vec::new();
    for (id, row) in next {
        match before.get(id.as_str()) {
            None => changes.push(change(ChangeKind::Insert, row.clone(), empty())),
            Some(old) if *old != row => {
                changes.push(change(ChangeKind::Update, row.clone(), (*old).clone()))
            }
            Some(_) => {}
        }
    }
    for (id, row) in previous {
        if !after.contains_key(id.as_str()) {
            changes.push(change(ChangeKind::Delete, empty(), row.clone()));
        }
    }
    changes
}

/// Spawn the polling task. The first successful read is the baseline;
/// read errors are logged and the baseline kept.
pub(crate) fn spawn_poll_feed(
    client: PostgrestClient,
    table: &'static str,
    interval: Duration,
    sink: mpsc::UnboundedSender<RemoteChange>,
) -> Result<ChangeChannel> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
        ChemventoryError::Remote("a Tokio runtime is required for the change channel".to_string())
    })?;

    let handle = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut baseline: Option<Snapshot> = None;
        loop {
            ticker.tick().await;
            let rows = match client.select_raw(table).await {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(error = %err, table, "change channel poll failed");
                    continue;
                }
            };
            let next = snapshot(rows);
            if let Some(previous) = baseline.as_ref() {
                for change in diff_snapshots(previous, &next, table, Utc::now()) {
                    if sink.send(change).is_err() {
                        debug!(table, "change channel receiver dropped");
                        return;
                    }
                }
            }
            baseline = Some(next);
        }
    });
    Ok(ChangeChannel::new(handle))
}
