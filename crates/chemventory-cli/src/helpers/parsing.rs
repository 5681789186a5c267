//! Parsing helpers for dates, quantities, record fields and CSV columns.

use chrono::{DateTime, NaiveDate};

use chemventory_core::csv::DEFAULT_COLUMNS;
use chemventory_core::{PhysicalState, SafetyClass};

use crate::errors::CliError;

/// Validate a record date (YYYY-MM-DD or ISO-8601), returning it trimmed.
pub fn parse_date(value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(trimmed).is_ok()
    {
        return Ok(trimmed.to_string());
    }
    Err(CliError::invalid_input(format!(
        "Invalid date (expected YYYY-MM-DD or ISO-8601): {}",
        value
    ))
    .into())
}

/// Quantities must be finite and not negative.
pub fn parse_quantity(label: &str, value: f64) -> anyhow::Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::invalid_input(format!(
            "Invalid {} quantity: {} (expected a number >= 0)",
            label, value
        ))
        .into());
    }
    Ok(value)
}

pub fn parse_physical_state(value: &str) -> anyhow::Result<PhysicalState> {
    value
        .parse::<PhysicalState>()
        .map_err(|e| CliError::invalid_input(e.to_string()).into())
}

pub fn parse_safety_class(value: &str) -> anyhow::Result<SafetyClass> {
    value
        .parse::<SafetyClass>()
        .map_err(|e| CliError::invalid_input(e.to_string()).into())
}

/// Check a `--format` value, passing it through.
pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<&str>> {
    match value {
        None | Some("table") | Some("plain") | Some("json") => Ok(value),
        Some(other) => Err(CliError::invalid_input(format!(
            "Unsupported format: {} (use table, plain or json)",
            other
        ))
        .into()),
    }
}

/// Parse a comma-separated export column list.
pub fn parse_columns(raw: &str) -> anyhow::Result<Vec<&'static str>> {
    let mut columns = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let column = DEFAULT_COLUMNS
            .iter()
            .copied()
            .find(|c| *c == name)
            .ok_or_else(|| {
                CliError::invalid_input(format!(
                    "Unknown column: {} (available: {})",
                    name,
                    DEFAULT_COLUMNS.join(", ")
                ))
            })?;
        columns.push(column);
    }
    if columns.is_empty() {
        return Err(CliError::invalid_input("No columns given").into());
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2025-06-01 ").unwrap(), "2025-06-01");
        assert!(parse_date("2025-06-01T10:00:00Z").is_ok());
        assert!(parse_date("June 1st").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("initial", 2.5).unwrap(), 2.5);
        assert!(parse_quantity("initial", -1.0).is_err());
        assert!(parse_quantity("current", f64::NAN).is_err());
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            parse_physical_state("mass:g").unwrap(),
            PhysicalState::Mass {
                unit: "g".to_string()
            }
        );
        assert!(parse_physical_state("gas").is_err());
        assert_eq!(parse_safety_class("yellow").unwrap(), SafetyClass::Yellow);
        assert!(parse_safety_class("purple").is_err());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(parse_output_format(Some("plain")).unwrap(), Some("plain"));
        assert!(parse_output_format(Some("yaml")).is_err());
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(
            parse_columns("name, batchNumber").unwrap(),
            vec!["name", "batchNumber"]
        );
        assert!(parse_columns("name,colour").is_err());
        assert!(parse_columns(" , ").is_err());
    }

    #[test]
    fn test_invalid_input_downcasts() {
        let err = parse_safety_class("purple").unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
