use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::RemoveArgs;
use crate::helpers::confirm;
use crate::ui::{badge, print, receipt, Badge};

use super::NOT_FOUND_HINT;

pub async fn handle_remove(ctx: &AppContext<'_>, args: &RemoveArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let record = store
        .find(&args.id)
        .await
        .unwrap_or_else(|| exit_not_found_with_hint("Chemical not found", NOT_FOUND_HINT));

    let ui_ctx = ctx.ui_context(false, None);
    if !args.yes {
        let prompt = format!("Remove {} (batch {})?", record.name, record.batch_number);
        if !confirm(&prompt, ui_ctx.is_interactive())? {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Nothing removed"));
            return Ok(());
        }
    }

    store.remove(&record.id).await;

    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Removed chemical",
                &[("ID", record.id.as_str()), ("Name", record.name.as_str())],
            ),
        );
    }
    Ok(())
}
