use chrono::Utc;

use chemventory_core::NewChemical;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::parse_quantity;
use crate::output::{print_json, record_json};
use crate::ui::{print, receipt};

use super::fields_patch;

pub(crate) fn required_text(label: &str, value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input(format!("{} cannot be empty", label)).into());
    }
    Ok(trimmed.to_string())
}

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let initial = parse_quantity("initial", args.initial)?;
    let current = parse_quantity("current", args.current.unwrap_or(initial))?;
    let patch = fields_patch(&args.fields)?;

    let new = NewChemical {
        name: required_text("Name", &args.name)?,
        batch_number: required_text("Batch", &args.batch)?,
        brand: patch.brand,
        physical_state: patch.physical_state,
        initial_quantity: initial,
        current_quantity: current,
        arrival_date: patch.arrival_date,
        expiration_date: patch.expiration_date,
        safety_class: patch.safety_class.unwrap_or_default(),
        location: patch.location,
        ghs_symbol: patch.ghs_symbol,
    };

    let store = ctx.store()?;
    let record = store.add(new).await;

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&record_json(&record, Utc::now()));
    }
    if ctx.quiet() {
        println!("{}", record.id);
        return Ok(());
    }
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Added chemical",
            &[
                ("ID", record.id.as_str()),
                ("Name", record.name.as_str()),
                ("Batch", record.batch_number.as_str()),
                ("Backend", store.mode().as_str()),
            ],
        ),
    );
    Ok(())
}
