//! Starter inventory for an empty store.

use chrono::{DateTime, Duration, Utc};

use crate::model::{ChemicalRecord, NewChemical, PhysicalState, SafetyClass};

/// Two demo records: Ethanol expiring in 60 days and Sodium Hydroxide that
/// expired two days ago. Dates are relative to `now`.
pub fn sample_chemicals(now: DateTime<Utc>) -> Vec<ChemicalRecord> {
    let date = |offset_days: i64| (now + Duration::days(offset_days)).format("%Y-%m-%d").to_string();

    vec![
        NewChemical::new("Ethanol", "B-1001")
            .with_brand("ChemCo")
            .with_physical_state(PhysicalState::Volume {
                unit: "mL".to_string(),
            })
            .with_quantities(500.0, 120.0)
            .with_arrival_date("2024-01-10")
            .with_expiration_date(date(60))
            .with_safety_class(SafetyClass::Red)
            .with_location("Shelf A")
            .with_ghs_symbol("🔥")
            .into_record("1".to_string(), now),
        NewChemical::new("Sodium Hydroxide", "B-2002")
            .with_brand("LabPure")
            .with_physical_state(PhysicalState::Mass {
                unit: "g".to_string(),
            })
            .with_quantities(1000.0, 400.0)
            .with_arrival_date("2023-06-05")
            .with_expiration_date(date(-2))
            .with_safety_class(SafetyClass::White)
            .with_location("Cabinet B")
            .with_ghs_symbol("⚠️")
            .into_record("2".to_string(), now),
    ]
}
