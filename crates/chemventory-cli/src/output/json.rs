//! JSON output formatting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use chemventory_core::dashboard::days_until_expiry;
use chemventory_core::ChemicalRecord;

/// A record as stored, plus the derived `expired` and `daysUntilExpiry`.
pub fn record_json(record: &ChemicalRecord, now: DateTime<Utc>) -> serde_json::Value {
    let mut value = serde_json::to_value(record).unwrap_or(serde_json::Value::Null);
    if let Some(object) = value.as_object_mut() {
        object.insert("expired".to_string(), record.is_expired(now).into());
        object.insert(
            "daysUntilExpiry".to_string(),
            days_until_expiry(record, now).into(),
        );
    }
    value
}

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
