//! Audit log entries written after successful remote mutations.

use serde::{Deserialize, Serialize};

/// Mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

/// One row of the append-only `logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    /// Row as returned by the backend, or null when unavailable
    pub data: serde_json::Value,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        table_name: impl Into<String>,
        record_id: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            action,
            table_name: table_name.into(),
            record_id: record_id.into(),
            data,
        }
    }
}
