//! Stock alerts shown on the dashboard.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ChemicalRecord;

/// Records expiring within this many days are "near expiration".
pub const NEAR_EXPIRY_DAYS: i64 = 90;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days from `now` until the record expires, rounded up. `None` when
/// the record has no parseable expiration date.
pub fn days_until_expiry(record: &ChemicalRecord, now: DateTime<Utc>) -> Option<i64> {
    let expires = record.expiration()?;
    let millis = (expires - now).num_milliseconds() as f64;
    Some((millis / MILLIS_PER_DAY).ceil() as i64)
}

/// The four dashboard lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockAlerts {
    /// Expiring within `NEAR_EXPIRY_DAYS`, soonest first
    pub near_expiration: Vec<ChemicalRecord>,
    pub expired: Vec<ChemicalRecord>,
    /// At or below half the initial quantity, lowest first
    pub low_stock: Vec<ChemicalRecord>,
    pub out_of_stock: Vec<ChemicalRecord>,
}

impl StockAlerts {
    pub fn compute(records: &[ChemicalRecord], now: DateTime<Utc>) -> Self {
        let mut near_expiration: Vec<ChemicalRecord> = records
            .iter()
            .filter(|r| {
                days_until_expiry(r, now).is_some_and(|days| (0..=NEAR_EXPIRY_DAYS).contains(&days))
            })
            .cloned()
            .collect();
        near_expiration.sort_by_key(|r| r.expiration());

        let expired = records
            .iter()
            .filter(|r| days_until_expiry(r, now).is_some_and(|days| days < 0))
            .cloned()
            .collect();

        let mut low_stock: Vec<ChemicalRecord> =
            records.iter().filter(|r| r.is_low_stock()).cloned().collect();
        low_stock.sort_by(|a, b| {
            a.current_quantity
                .partial_cmp(&b.current_quantity)
                .unwrap_or(Ordering::Equal)
        });

        let out_of_stock = records
            .iter()
            .filter(|r| r.is_out_of_stock())
            .cloned()
            .collect();

        Self {
            near_expiration,
            expired,
            low_stock,
            out_of_stock,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.near_expiration.is_empty()
            && self.expired.is_empty()
            && self.low_stock.is_empty()
            && self.out_of_stock.is_empty()
    }
}
