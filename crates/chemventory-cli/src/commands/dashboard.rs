//! Expiry and stock alerts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use chemventory_core::dashboard::days_until_expiry;
use chemventory_core::{ChemicalRecord, StockAlerts};

use crate::app::AppContext;
use crate::cli::DashboardArgs;
use crate::output::print_json;
use crate::ui::format::{format_days, format_quantity, single_line};
use crate::ui::{badge, blank_line, header, kv, print, table, Badge, Column, UiContext};

#[derive(Serialize)]
struct DashboardJson<'a> {
    total: usize,
    #[serde(flatten)]
    alerts: &'a StockAlerts,
}

const EXPIRY_COLUMNS: [Column; 3] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Expires"),
];

const STOCK_COLUMNS: [Column; 3] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Quantity"),
];

fn expiry_rows(records: &[ChemicalRecord], now: DateTime<Utc>) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            let when = days_until_expiry(r, now)
                .map(format_days)
                .unwrap_or_default();
            vec![r.id.clone(), single_line(&r.name), when]
        })
        .collect()
}

fn stock_rows(records: &[ChemicalRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                single_line(&r.name),
                format_quantity(r.current_quantity, r.initial_quantity, r.unit()),
            ]
        })
        .collect()
}

fn print_section(
    ctx: &UiContext,
    kind: Badge,
    title: &str,
    columns: &[Column],
    rows: Vec<Vec<String>>,
) {
    if rows.is_empty() {
        return;
    }
    if ctx.mode.is_pretty() {
        print(ctx, &badge(ctx, kind, &format!("{} ({})", title, rows.len())));
        print(ctx, &table(ctx, columns, &rows));
        blank_line(ctx);
    } else {
        let key = title.to_lowercase().replace(' ', "_");
        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.replace(char::is_whitespace, "_"))
                .collect();
            print(ctx, &format!("{} {}", key, cells.join(" ")));
        }
    }
}

pub async fn handle_dashboard(ctx: &AppContext<'_>, args: &DashboardArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let records = store.list().await;
    let now = Utc::now();
    let alerts = StockAlerts::compute(&records, now);

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&DashboardJson {
            total: records.len(),
            alerts: &alerts,
        });
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "dashboard", Some(store.mode().as_str())));
        print(&ui_ctx, &kv(&ui_ctx, "Total", &records.len().to_string()));
        blank_line(&ui_ctx);
    }
    if alerts.is_empty() {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "No alerts"));
        return Ok(());
    }

    print_section(
        &ui_ctx,
        Badge::Err,
        "Expired",
        &EXPIRY_COLUMNS,
        expiry_rows(&alerts.expired, now),
    );
    print_section(
        &ui_ctx,
        Badge::Warn,
        "Near Expiration",
        &EXPIRY_COLUMNS,
        expiry_rows(&alerts.near_expiration, now),
    );
    print_section(
        &ui_ctx,
        Badge::Err,
        "Out Of Stock",
        &STOCK_COLUMNS,
        stock_rows(&alerts.out_of_stock),
    );
    print_section(
        &ui_ctx,
        Badge::Warn,
        "Low Stock",
        &STOCK_COLUMNS,
        stock_rows(&alerts.low_stock),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemventory_core::samples::sample_chemicals;

    #[test]
    fn test_rows() {
        let now = Utc::now();
        let records = sample_chemicals(now);

        let expiry = expiry_rows(&records[..1], now);
        assert_eq!(expiry[0][1], "Ethanol");
        assert!(expiry[0][2].starts_with("in "));

        let stock = stock_rows(&records);
        assert_eq!(stock[0][2], "120/500 mL");
        assert_eq!(stock[1][2], "400/1000 g");
    }
}
