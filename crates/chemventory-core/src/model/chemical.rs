//! Chemical record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ChemventoryError;

/// Hazard categorization used for colour coding.
///
/// Absent or unrecognised values read as `Green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyClass {
    #[default]
    Green,
    Blue,
    White,
    Yellow,
    Red,
}

impl SafetyClass {
    pub const ALL: [SafetyClass; 5] = [
        SafetyClass::Green,
        SafetyClass::Blue,
        SafetyClass::White,
        SafetyClass::Yellow,
        SafetyClass::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyClass::Green => "green",
            SafetyClass::Blue => "blue",
            SafetyClass::White => "white",
            SafetyClass::Yellow => "yellow",
            SafetyClass::Red => "red",
        }
    }

    /// Parse a safety class, defaulting to green for anything unrecognised.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(|v| v.as_str())
            .map(SafetyClass::parse_lenient)
            .unwrap_or_default())
    }
}

impl FromStr for SafetyClass {
    type Err = ChemventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        SafetyClass::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| {
                ChemventoryError::InvalidInput(format!(
                    "Unknown safety class: {} (use green, blue, white, yellow or red)",
                    s
                ))
            })
    }
}

impl fmt::Display for SafetyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a chemical is measured, with the unit its quantities are in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PhysicalState {
    Volume { unit: String },
    Mass { unit: String },
}

impl PhysicalState {
    pub fn kind(&self) -> &'static str {
        match self {
            PhysicalState::Volume { .. } => "volume",
            PhysicalState::Mass { .. } => "mass",
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            PhysicalState::Volume { unit } | PhysicalState::Mass { unit } => unit,
        }
    }
}

/// Parses the compact `<type>:<unit>` form, e.g. `volume:mL`.
impl FromStr for PhysicalState {
    type Err = ChemventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, unit) = s.trim().split_once(':').ok_or_else(|| {
            ChemventoryError::InvalidInput(format!(
                "Invalid physical state: {} (expected volume:<unit> or mass:<unit>)",
                s
            ))
        })?;
        let unit = unit.trim().to_string();
        match kind.trim() {
            "volume" => Ok(PhysicalState::Volume { unit }),
            "mass" => Ok(PhysicalState::Mass { unit }),
            other => Err(ChemventoryError::InvalidInput(format!(
                "Unknown physical state type: {} (use volume or mass)",
                other
            ))),
        }
    }
}

impl fmt::Display for PhysicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.unit())
    }
}

/// Parse a record date best-effort: RFC 3339, a bare `YYYY-MM-DD` (UTC
/// midnight), or a zone-less `YYYY-MM-DDTHH:MM:SS` read as UTC.
pub fn parse_record_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// A chemical in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalRecord {
    /// Unique identifier (clock-derived, or assigned by the hosted table)
    pub id: String,

    pub name: String,

    pub batch_number: String,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub physical_state: Option<PhysicalState>,

    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub initial_quantity: f64,

    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub current_quantity: f64,

    /// ISO date, parsed on demand
    #[serde(default)]
    pub arrival_date: Option<String>,

    /// ISO date, parsed on demand; absent means the record never expires
    #[serde(default)]
    pub expiration_date: Option<String>,

    #[serde(default, deserialize_with = "SafetyClass::deserialize_lenient")]
    pub safety_class: SafetyClass,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub ghs_symbol: Option<String>,

    pub date_added: DateTime<Utc>,

    #[serde(rename = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChemicalRecord {
    /// Parsed expiration date, if present and parseable.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration_date.as_deref().and_then(parse_record_date)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration().is_some_and(|expires| expires < now)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.current_quantity <= 0.0
    }

    /// At or below half of the initial quantity.
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity <= self.initial_quantity * 0.5
    }

    /// Lower-cased text matched by searches: name, batch, brand and location.
    pub fn search_text(&self) -> String {
        [
            self.name.as_str(),
            self.batch_number.as_str(),
            self.brand.as_deref().unwrap_or(""),
            self.location.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Unit label for quantities, empty when the physical state is unknown.
    pub fn unit(&self) -> &str {
        self.physical_state
            .as_ref()
            .map(PhysicalState::unit)
            .unwrap_or("")
    }
}

/// Builder for a record that has not been assigned an id or timestamps yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewChemical {
    pub name: String,
    pub batch_number: String,
    pub brand: Option<String>,
    pub physical_state: Option<PhysicalState>,
    pub initial_quantity: f64,
    pub current_quantity: f64,
    pub arrival_date: Option<String>,
    pub expiration_date: Option<String>,
    pub safety_class: SafetyClass,
    pub location: Option<String>,
    pub ghs_symbol: Option<String>,
}

impl NewChemical {
    pub fn new(name: impl Into<String>, batch_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batch_number: batch_number.into(),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_physical_state(mut self, state: PhysicalState) -> Self {
        self.physical_state = Some(state);
        self
    }

    pub fn with_quantities(mut self, initial: f64, current: f64) -> Self {
        self.initial_quantity = initial;
        self.current_quantity = current;
        self
    }

    pub fn with_arrival_date(mut self, date: impl Into<String>) -> Self {
        self.arrival_date = Some(date.into());
        self
    }

    pub fn with_expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }

    pub fn with_safety_class(mut self, class: SafetyClass) -> Self {
        self.safety_class = class;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_ghs_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.ghs_symbol = Some(symbol.into());
        self
    }

    /// Stamp an id and the creation timestamps onto this record.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> ChemicalRecord {
        ChemicalRecord {
            id,
            name: self.name,
            batch_number: self.batch_number,
            brand: self.brand,
            physical_state: self.physical_state,
            initial_quantity: self.initial_quantity,
            current_quantity: self.current_quantity,
            arrival_date: self.arrival_date,
            expiration_date: self.expiration_date,
            safety_class: self.safety_class,
            location: self.location,
            ghs_symbol: self.ghs_symbol,
            date_added: now,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Partial update for a record. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChemicalPatch {
    pub name: Option<String>,
    pub batch_number: Option<String>,
    pub brand: Option<String>,
    pub physical_state: Option<PhysicalState>,
    pub initial_quantity: Option<f64>,
    pub current_quantity: Option<f64>,
    pub arrival_date: Option<String>,
    pub expiration_date: Option<String>,
    pub safety_class: Option<SafetyClass>,
    pub location: Option<String>,
    pub ghs_symbol: Option<String>,
}

impl ChemicalPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn batch_number(mut self, batch: impl Into<String>) -> Self {
        self.batch_number = Some(batch.into());
        self
    }

    pub fn current_quantity(mut self, quantity: f64) -> Self {
        self.current_quantity = Some(quantity);
        self
    }

    pub fn initial_quantity(mut self, quantity: f64) -> Self {
        self.initial_quantity = Some(quantity);
        self
    }

    pub fn safety_class(mut self, class: SafetyClass) -> Self {
        self.safety_class = Some(class);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch over `record`, returning the merged copy.
    ///
    /// Timestamps are left alone; the caller decides the new `updated_at`.
    pub fn apply(&self, record: &ChemicalRecord) -> ChemicalRecord {
        let mut merged = record.clone();
        if let Some(ref v) = self.name {
            merged.name = v.clone();
        }
        if let Some(ref v) = self.batch_number {
            merged.batch_number = v.clone();
        }
        if let Some(ref v) = self.brand {
            merged.brand = Some(v.clone());
        }
        if let Some(ref v) = self.physical_state {
            merged.physical_state = Some(v.clone());
        }
        if let Some(v) = self.initial_quantity {
            merged.initial_quantity = v;
        }
        if let Some(v) = self.current_quantity {
            merged.current_quantity = v;
        }
        if let Some(ref v) = self.arrival_date {
            merged.arrival_date = Some(v.clone());
        }
        if let Some(ref v) = self.expiration_date {
            merged.expiration_date = Some(v.clone());
        }
        if let Some(v) = self.safety_class {
            merged.safety_class = v;
        }
        if let Some(ref v) = self.location {
            merged.location = Some(v.clone());
        }
        if let Some(ref v) = self.ghs_symbol {
            merged.ghs_symbol = Some(v.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_safety_class_lenient_defaults_to_green() {
        assert_eq!(SafetyClass::parse_lenient("red"), SafetyClass::Red);
        assert_eq!(SafetyClass::parse_lenient(" yellow "), SafetyClass::Yellow);
        assert_eq!(SafetyClass::parse_lenient("purple"), SafetyClass::Green);
        assert_eq!(SafetyClass::parse_lenient(""), SafetyClass::Green);
        assert!("purple".parse::<SafetyClass>().is_err());
    }

    #[test]
    fn test_physical_state_wire_format() {
        let state = PhysicalState::Volume {
            unit: "mL".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"type": "volume", "unit": "mL"}));
        assert_eq!(state.to_string(), "volume:mL");
        assert_eq!("mass:g".parse::<PhysicalState>().unwrap().unit(), "g");
        assert!("liquid:L".parse::<PhysicalState>().is_err());
    }

    #[test]
    fn test_record_deserializes_camel_case_with_lenient_fields() {
        let json = serde_json::json!({
            "id": "1",
            "name": "Ethanol",
            "batchNumber": "B-1001",
            "physicalState": {"type": "volume", "unit": "mL"},
            "initialQuantity": "500",
            "currentQuantity": null,
            "safetyClass": "ultraviolet",
            "dateAdded": "2024-01-10T08:00:00.000Z",
            "created_at": "2024-01-10T08:00:00+00:00"
        });

        let record: ChemicalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.batch_number, "B-1001");
        assert_eq!(record.initial_quantity, 500.0);
        assert_eq!(record.current_quantity, 0.0);
        assert_eq!(record.safety_class, SafetyClass::Green);
        assert!(record.created_at.is_some());
        assert!(record.updated_at.is_none());
        assert_eq!(record.unit(), "mL");
    }

    #[test]
    fn test_parse_record_date_forms() {
        assert!(parse_record_date("2024-05-01").is_some());
        assert!(parse_record_date("2024-05-01T10:00:00Z").is_some());
        assert!(parse_record_date("2024-05-01T10:00:00").is_some());
        assert!(parse_record_date("").is_none());
        assert!(parse_record_date("next tuesday").is_none());
    }

    #[test]
    fn test_expired_and_stock_predicates() {
        let now = fixed_now();
        let record = NewChemical::new("NaOH", "B-2")
            .with_quantities(1000.0, 400.0)
            .with_expiration_date("2025-02-27")
            .into_record("2".to_string(), now);

        assert!(record.is_expired(now));
        assert!(record.is_low_stock());
        assert!(!record.is_out_of_stock());

        let undated = NewChemical::new("Water", "W-1").into_record("3".to_string(), now);
        assert!(!undated.is_expired(now));
    }

    #[test]
    fn test_patch_apply_only_touches_set_fields() {
        let now = fixed_now();
        let record = NewChemical::new("Ethanol", "B-1")
            .with_brand("ChemCo")
            .with_quantities(500.0, 120.0)
            .into_record("1".to_string(), now);

        let patch = ChemicalPatch::new()
            .current_quantity(100.0)
            .safety_class(SafetyClass::Red);
        let merged = patch.apply(&record);

        assert_eq!(merged.current_quantity, 100.0);
        assert_eq!(merged.safety_class, SafetyClass::Red);
        assert_eq!(merged.name, "Ethanol");
        assert_eq!(merged.brand.as_deref(), Some("ChemCo"));
        assert_eq!(merged.updated_at, record.updated_at);
        assert!(!patch.is_empty());
        assert!(ChemicalPatch::new().is_empty());
    }
}
