use chrono::Utc;

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::ShowArgs;
use crate::output::{print_json, print_record, record_json};

use super::NOT_FOUND_HINT;

pub async fn handle_show(ctx: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let record = store
        .find(&args.id)
        .await
        .unwrap_or_else(|| exit_not_found_with_hint("Chemical not found", NOT_FOUND_HINT));

    let now = Utc::now();
    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&record_json(&record, now));
    }
    print_record(&ui_ctx, &record, ctx.quiet(), now);
    Ok(())
}
