use chrono::Utc;

use chemventory_core::csv::{export_csv, DEFAULT_COLUMNS};
use chemventory_core::RecordFilter;

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::helpers::parse_columns;
use crate::ui::{print, receipt};

pub async fn handle_export(ctx: &AppContext<'_>, args: &ExportArgs) -> anyhow::Result<()> {
    let columns = match args.columns.as_deref() {
        Some(raw) => parse_columns(raw)?,
        None => DEFAULT_COLUMNS.to_vec(),
    };

    let mut filter = RecordFilter::new().expired_only(args.expired);
    if let Some(ref query) = args.query {
        filter = filter.query(query.clone());
    }
    let store = ctx.store()?;
    let records = filter.apply(&store.list().await, Utc::now());
    let text = export_csv(&records, &columns);

    let Some(ref path) = args.output else {
        if !text.is_empty() {
            println!("{}", text);
        }
        return Ok(());
    };

    std::fs::write(path, &text).map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let count = records.len().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Exported chemicals",
                &[("Rows", count.as_str()), ("File", path.as_str())],
            ),
        );
    }
    Ok(())
}
