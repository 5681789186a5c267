use chrono::Utc;

use chemventory_core::samples::sample_chemicals;

use crate::app::AppContext;
use crate::ui::{badge, print, receipt, Badge};

pub async fn handle_seed(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let samples = sample_chemicals(Utc::now());
    let seeded = store.seed_if_empty(&samples).await;

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false, None);
    if seeded {
        let count = samples.len().to_string();
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Seeded sample chemicals", &[("Rows", count.as_str())]),
        );
    } else {
        print(
            &ui_ctx,
            &badge(
                &ui_ctx,
                Badge::Info,
                "Inventory already has chemicals; nothing seeded",
            ),
        );
    }
    Ok(())
}
