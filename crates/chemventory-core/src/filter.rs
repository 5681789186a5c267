//! Search and the expired-only view.

use chrono::{DateTime, Utc};

use crate::model::ChemicalRecord;

/// Which records a listing shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Case-insensitive substring of name, batch, brand or location
    pub query: Option<String>,
    /// Only records whose expiration date has passed
    pub expired_only: bool,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    pub fn expired_only(mut self, expired_only: bool) -> Self {
        self.expired_only = expired_only;
        self
    }

    pub fn matches(&self, record: &ChemicalRecord, now: DateTime<Utc>) -> bool {
        if self.expired_only && !record.is_expired(now) {
            return false;
        }
        match &self.query {
            Some(query) => record.search_text().contains(&query.to_lowercase()),
            None => true,
        }
    }

    /// Matching records, in their original order.
    pub fn apply(&self, records: &[ChemicalRecord], now: DateTime<Utc>) -> Vec<ChemicalRecord> {
        records
            .iter()
            .filter(|record| self.matches(record, now))
            .cloned()
            .collect()
    }
}
