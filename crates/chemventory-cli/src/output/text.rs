//! Text and table output formatting for chemicals.

use chrono::{DateTime, Utc};

use chemventory_core::dashboard::days_until_expiry;
use chemventory_core::ChemicalRecord;

use crate::ui::format::{
    format_datetime, format_days, format_quantity, or_dash, single_line, truncate,
};
use crate::ui::theme::{safety_style, styled};
use crate::ui::{
    blank_line, header, hint, kv, print, simple_table, Column, OutputMode, UiContext,
};

pub const LIST_COLUMNS: [Column; 7] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Batch"),
    Column::new("Quantity"),
    Column::new("Expires"),
    Column::new("Class"),
    Column::new("Location"),
];

const NAME_WIDTH: usize = 32;

/// The expiration date with its relative wording, e.g. `2025-06-01 (in 12 days)`.
fn expiry_text(record: &ChemicalRecord, now: DateTime<Utc>) -> String {
    match (
        record.expiration_date.as_deref(),
        days_until_expiry(record, now),
    ) {
        (Some(date), Some(days)) => format!("{} ({})", date, format_days(days)),
        (date, _) => or_dash(date),
    }
}

/// One table row. Pretty rows are truncated and colored; plain rows keep
/// every value whole, with blanks as "-" and spaces as "_" so each column is
/// one token.
pub fn record_row(ctx: &UiContext, record: &ChemicalRecord, now: DateTime<Utc>) -> Vec<String> {
    let quantity = format_quantity(
        record.current_quantity,
        record.initial_quantity,
        record.unit(),
    );
    let name = single_line(&record.name);

    if !ctx.mode.is_pretty() {
        return [
            record.id.clone(),
            name,
            or_dash(Some(&record.batch_number)),
            quantity,
            or_dash(record.expiration_date.as_deref()),
            record.safety_class.to_string(),
            or_dash(record.location.as_deref()),
        ]
        .into_iter()
        .map(|cell| cell.trim().replace(char::is_whitespace, "_"))
        .collect();
    }

    vec![
        record.id.clone(),
        truncate(&name, NAME_WIDTH),
        or_dash(Some(&record.batch_number)),
        quantity,
        expiry_text(record, now),
        styled(
            record.safety_class.as_str(),
            safety_style(record.safety_class),
            ctx.color,
        ),
        or_dash(record.location.as_deref()),
    ]
}

pub fn print_record_list(
    ctx: &UiContext,
    records: &[ChemicalRecord],
    context: Option<&str>,
    quiet: bool,
    now: DateTime<Utc>,
) {
    if records.is_empty() {
        if !quiet {
            print(ctx, &header(ctx, "list", context));
            print(ctx, &hint(ctx, "No chemicals found. Add one with `chemventory add`."));
        }
        return;
    }

    if ctx.mode.is_pretty() && !quiet {
        print(ctx, &header(ctx, "list", context));
        blank_line(ctx);
    }
    let rows: Vec<Vec<String>> = records.iter().map(|r| record_row(ctx, r, now)).collect();
    print(ctx, &simple_table(ctx, &LIST_COLUMNS, &rows));
    if ctx.mode.is_pretty() && !quiet {
        blank_line(ctx);
        print(ctx, &kv(ctx, "Total", &records.len().to_string()));
    }
}

pub fn print_record(ctx: &UiContext, record: &ChemicalRecord, quiet: bool, now: DateTime<Utc>) {
    let pretty = ctx.mode == OutputMode::Pretty;
    if pretty && !quiet {
        print(ctx, &header(ctx, "show", None));
        blank_line(ctx);
    }

    let state = record
        .physical_state
        .as_ref()
        .map(ToString::to_string);
    let class = if pretty {
        styled(
            record.safety_class.as_str(),
            safety_style(record.safety_class),
            ctx.color,
        )
    } else {
        record.safety_class.to_string()
    };

    let mut lines = vec![
        kv(ctx, "ID", &record.id),
        kv(ctx, "Name", &single_line(&record.name)),
        kv(ctx, "Batch", &record.batch_number),
        kv(ctx, "Brand", &or_dash(record.brand.as_deref())),
        kv(ctx, "State", &or_dash(state.as_deref())),
        kv(
            ctx,
            "Quantity",
            &format_quantity(record.current_quantity, record.initial_quantity, record.unit()),
        ),
        kv(ctx, "Arrived", &or_dash(record.arrival_date.as_deref())),
        kv(ctx, "Expires", &expiry_text(record, now)),
        kv(ctx, "Safety Class", &class),
        kv(ctx, "Location", &or_dash(record.location.as_deref())),
        kv(ctx, "GHS", &or_dash(record.ghs_symbol.as_deref())),
        kv(ctx, "Added", &format_datetime(&record.date_added, pretty)),
    ];
    if let Some(updated) = record.updated_at.as_ref() {
        lines.push(kv(ctx, "Updated", &format_datetime(updated, pretty)));
    }
    if record.is_expired(now) {
        lines.push(kv(ctx, "Status", "expired"));
    } else if record.is_out_of_stock() {
        lines.push(kv(ctx, "Status", "out of stock"));
    } else if record.is_low_stock() {
        lines.push(kv(ctx, "Status", "low stock"));
    }

    for line in lines {
        print(ctx, &line);
    }
}
