use chrono::Utc;

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::UpdateArgs;
use crate::errors::CliError;
use crate::helpers::parse_quantity;
use crate::output::{print_json, record_json};
use crate::ui::format::format_quantity;
use crate::ui::{print, receipt};

use super::add::required_text;
use super::{fields_patch, NOT_FOUND_HINT};

pub async fn handle_update(ctx: &AppContext<'_>, args: &UpdateArgs) -> anyhow::Result<()> {
    let mut patch = fields_patch(&args.fields)?;
    if let Some(ref name) = args.name {
        patch.name = Some(required_text("Name", name)?);
    }
    if let Some(ref batch) = args.batch {
        patch.batch_number = Some(required_text("Batch", batch)?);
    }
    if let Some(initial) = args.initial {
        patch.initial_quantity = Some(parse_quantity("initial", initial)?);
    }
    if let Some(current) = args.current {
        patch.current_quantity = Some(parse_quantity("current", current)?);
    }
    if patch.is_empty() {
        return Err(CliError::invalid_input(
            "Nothing to update\nHint: Pass at least one field, e.g. `--current 250`.",
        )
        .into());
    }

    let store = ctx.store()?;
    let record = store
        .update(&args.id, patch)
        .await
        .unwrap_or_else(|| exit_not_found_with_hint("Chemical not found", NOT_FOUND_HINT));

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&record_json(&record, Utc::now()));
    }
    if !ctx.quiet() {
        let quantity = format_quantity(
            record.current_quantity,
            record.initial_quantity,
            record.unit(),
        );
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Updated chemical",
                &[
                    ("ID", record.id.as_str()),
                    ("Name", record.name.as_str()),
                    ("Quantity", quantity.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
