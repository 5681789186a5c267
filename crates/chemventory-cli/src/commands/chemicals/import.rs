use chrono::Utc;

use chemventory_core::csv::parse_csv;

use crate::app::AppContext;
use crate::cli::ImportArgs;
use crate::errors::CliError;
use crate::helpers::read_source;
use crate::output::{print_json, record_json};
use crate::ui::{print, receipt};

pub async fn handle_import(ctx: &AppContext<'_>, args: &ImportArgs) -> anyhow::Result<()> {
    let text = read_source(&args.file)?;
    let rows = parse_csv(&text);
    if rows.is_empty() {
        return Err(CliError::invalid_input(format!(
            "No rows found in {}\nHint: The first line must be a header, e.g. `name,batchNumber,initialQuantity`.",
            args.file
        ))
        .into());
    }

    let store = ctx.store()?;
    let imported = store.import_rows(&rows).await;

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        let now = Utc::now();
        let values: Vec<_> = imported.iter().map(|r| record_json(r, now)).collect();
        return print_json(&values);
    }
    if !ctx.quiet() {
        let count = imported.len().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Imported chemicals",
                &[("Rows", count.as_str()), ("Backend", store.mode().as_str())],
            ),
        );
    }
    Ok(())
}
