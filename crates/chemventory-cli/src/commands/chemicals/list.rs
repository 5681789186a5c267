use chrono::Utc;

use chemventory_core::RecordFilter;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::helpers::parse_output_format;
use crate::output::{print_json, print_record_list, record_json};

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let store = ctx.store()?;
    let now = Utc::now();

    let mut filter = RecordFilter::new().expired_only(args.expired);
    if let Some(ref query) = args.query {
        filter = filter.query(query.clone());
    }
    let records = filter.apply(&store.list().await, now);

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        let values: Vec<_> = records.iter().map(|r| record_json(r, now)).collect();
        return print_json(&values);
    }

    let mut context = Vec::new();
    if let Some(ref query) = args.query {
        context.push(format!("\"{}\"", query.trim()));
    }
    if args.expired {
        context.push("expired".to_string());
    }
    let context = (!context.is_empty()).then(|| context.join(", "));
    print_record_list(&ui_ctx, &records, context.as_deref(), ctx.quiet(), now);
    Ok(())
}
