//! CSV export and the small importer for spreadsheets.
//!
//! Export quotes every present value. Import is deliberately simple: cells
//! are split on commas with no escaping, then one enclosing pair of quotes is
//! stripped. Values containing commas, quotes or newlines do not survive an
//! export/import cycle, and an empty optional text (`Some("")`) reads back
//! as absent because a quoted empty cell and a missing cell look the same.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::ids::{Clock, IdGenerator};
use crate::model::{parse_record_date, ChemicalRecord, PhysicalState, SafetyClass};

/// Column name to cell value.
pub type CsvRow = BTreeMap<String, String>;

/// Export columns, in record field order.
pub const DEFAULT_COLUMNS: [&str; 15] = [
    "id",
    "name",
    "batchNumber",
    "brand",
    "physicalState",
    "initialQuantity",
    "currentQuantity",
    "arrivalDate",
    "expirationDate",
    "safetyClass",
    "location",
    "ghsSymbol",
    "dateAdded",
    "created_at",
    "updated_at",
];

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Cell text for `column`, or `None` when the record has no value there.
fn field_value(record: &ChemicalRecord, column: &str) -> Option<String> {
    match column {
        "id" => Some(record.id.clone()),
        "name" => Some(record.name.clone()),
        "batchNumber" => Some(record.batch_number.clone()),
        "brand" => record.brand.clone(),
        "physicalState" => record.physical_state.as_ref().map(ToString::to_string),
        "initialQuantity" => Some(record.initial_quantity.to_string()),
        "currentQuantity" => Some(record.current_quantity.to_string()),
        "arrivalDate" => record.arrival_date.clone(),
        "expirationDate" => record.expiration_date.clone(),
        "safetyClass" => Some(record.safety_class.to_string()),
        "location" => record.location.clone(),
        "ghsSymbol" => record.ghs_symbol.clone(),
        "dateAdded" => Some(timestamp(&record.date_added)),
        "created_at" => record.created_at.as_ref().map(timestamp),
        "updated_at" => record.updated_at.as_ref().map(timestamp),
        _ => None,
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header line plus one line per record. Empty input gives an empty string.
pub fn export_csv(records: &[ChemicalRecord], columns: &[&str]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(columns.join(","));
    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                field_value(record, column)
                    .map(|v| quote(&v))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

fn unquote(cell: &str) -> String {
    let cell = cell.trim();
    match cell
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => cell.to_string(),
    }
}

/// Split `text` into rows keyed by the header line. Blank lines are skipped
/// and missing trailing cells read as empty.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut lines = text
        .trim()
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line));
    let header: Vec<String> = match lines.next() {
        Some(line) if !line.trim().is_empty() => line.split(',').map(unquote).collect(),
        _ => return Vec::new(),
    };

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let cells: Vec<&str> = line.split(',').collect();
            header
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = cells.get(i).map(|c| unquote(c)).unwrap_or_default();
                    (column.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// First non-empty cell among `columns`.
fn cell<'a>(row: &'a CsvRow, columns: &[&str]) -> Option<&'a str> {
    columns
        .iter()
        .filter_map(|column| row.get(*column))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

fn quantity(row: &CsvRow, columns: &[&str]) -> f64 {
    cell(row, columns)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn text(row: &CsvRow, column: &str) -> Option<String> {
    cell(row, &[column]).map(str::to_string)
}

/// Build records from imported rows.
///
/// Rows that carry an `id` or timestamps keep them; the rest are minted from
/// `ids` and `clock`. A `created_at` or `updated_at` column that is present
/// but empty stays absent, so exported records read back unchanged.
pub fn records_from_rows(
    rows: &[CsvRow],
    ids: &IdGenerator,
    clock: &dyn Clock,
) -> Vec<ChemicalRecord> {
    rows.iter()
        .map(|row| {
            let now = clock.now();
            let stamp = |column: &str| cell(row, &[column]).and_then(parse_record_date);
            let optional_stamp = |column: &str| match row.get(column) {
                Some(_) => stamp(column),
                None => Some(now),
            };
            ChemicalRecord {
                id: text(row, "id").unwrap_or_else(|| ids.next_id(now)),
                name: cell(row, &["name", "Name"]).unwrap_or_default().to_string(),
                batch_number: cell(row, &["batchNumber", "Batch"])
                    .unwrap_or_default()
                    .to_string(),
                brand: text(row, "brand"),
                physical_state: cell(row, &["physicalState"])
                    .and_then(|v| v.parse::<PhysicalState>().ok()),
                initial_quantity: quantity(row, &["initialQuantity", "Initial"]),
                current_quantity: quantity(row, &["currentQuantity", "Current"]),
                arrival_date: text(row, "arrivalDate"),
                expiration_date: text(row, "expirationDate"),
                safety_class: cell(row, &["safetyClass"])
                    .map(SafetyClass::parse_lenient)
                    .unwrap_or_default(),
                location: text(row, "location"),
                ghs_symbol: text(row, "ghsSymbol"),
                date_added: stamp("dateAdded").unwrap_or(now),
                created_at: optional_stamp("created_at"),
                updated_at: optional_stamp("updated_at"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ManualClock;
    use crate::samples::sample_chemicals;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_export_quotes_values_and_leaves_missing_empty() {
        let mut record = sample_chemicals(fixed_now()).remove(0);
        record.name = "Ethanol \"absolute\"".to_string();
        record.brand = None;

        let text = export_csv(&[record], &["id", "name", "brand", "initialQuantity"]);
        assert_eq!(
            text,
            "id,name,brand,initialQuantity\n\"1\",\"Ethanol \"\"absolute\"\"\",,\"500\""
        );
    }

    #[test]
    fn test_export_of_nothing_is_empty() {
        assert_eq!(export_csv(&[], &DEFAULT_COLUMNS), "");
    }

    #[test]
    fn test_parse_handles_crlf_and_short_rows() {
        let rows = parse_csv("name,Batch,location\r\nAcetone,A-1\r\n\r\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Acetone");
        assert_eq!(rows[0]["Batch"], "A-1");
        assert_eq!(rows[0]["location"], "");
    }

    #[test]
    fn test_parse_of_empty_text_has_no_rows() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("   \n").is_empty());
    }

    #[test]
    fn test_rows_use_aliases_and_defaults() {
        let clock = ManualClock::new(fixed_now());
        let ids = IdGenerator::new();
        let rows = parse_csv("Name,Batch,Initial,Current,safetyClass\nAcetone,A-1,2.5,abc,purple");

        let records = records_from_rows(&rows, &ids, &clock);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "Acetone");
        assert_eq!(record.batch_number, "A-1");
        assert_eq!(record.initial_quantity, 2.5);
        assert_eq!(record.current_quantity, 0.0);
        assert_eq!(record.safety_class, SafetyClass::Green);
        assert_eq!(record.id, fixed_now().timestamp_millis().to_string());
        assert_eq!(record.date_added, fixed_now());
        assert_eq!(record.created_at, Some(fixed_now()));
        assert!(record.brand.is_none());
    }

    #[test]
    fn test_absent_timestamps_stay_absent_through_export() {
        let clock = ManualClock::new(fixed_now() + chrono::Duration::days(3));
        let ids = IdGenerator::new();
        let mut records = sample_chemicals(fixed_now());
        records[0].created_at = None;
        records[0].updated_at = None;

        let text = export_csv(&records, &DEFAULT_COLUMNS);
        let imported = records_from_rows(&parse_csv(&text), &ids, &clock);
        assert_eq!(imported, records);
        assert!(imported[0].created_at.is_none());
        assert!(imported[0].updated_at.is_none());
    }

    #[test]
    fn test_export_then_import_reproduces_records() {
        let clock = ManualClock::new(fixed_now());
        let ids = IdGenerator::new();
        let records = sample_chemicals(fixed_now());

        let text = export_csv(&records, &DEFAULT_COLUMNS);
        let imported = records_from_rows(&parse_csv(&text), &ids, &clock);
        assert_eq!(imported, records);
    }
}
