//! Stream change events until interrupted.

use tokio::sync::mpsc;

use chemventory_core::ChangeEvent;

use crate::app::AppContext;
use crate::cli::WatchArgs;
use crate::ui::{badge, header, hint, print, Badge, UiContext};

/// One output line per event.
fn event_line(ctx: &UiContext, event: &ChangeEvent) -> anyhow::Result<String> {
    if ctx.mode.is_json() {
        return Ok(serde_json::to_string(event)?);
    }
    let line = match event {
        ChangeEvent::Sync(records) if ctx.mode.is_pretty() => badge(
            ctx,
            Badge::Info,
            &format!("Inventory changed ({} chemicals)", records.len()),
        ),
        ChangeEvent::Sync(records) => format!("event=sync count={}", records.len()),
        ChangeEvent::Remote(change) => {
            let id = change.record_id().unwrap_or_else(|| "-".to_string());
            if ctx.mode.is_pretty() {
                let message = format!(
                    "Remote {} on {} (id {})",
                    change.event_type.as_str(),
                    change.table,
                    id
                );
                badge(ctx, Badge::Info, &message)
            } else {
                format!(
                    "event=remote type={} table={} id={}",
                    change.event_type.as_str(),
                    change.table,
                    id
                )
            }
        }
    };
    Ok(line)
}

pub async fn handle_watch(ctx: &AppContext<'_>, args: &WatchArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let ui_ctx = ctx.ui_context(args.json, None);

    let (sender, mut events) = mpsc::unbounded_channel();
    let subscription = store.subscribe(move |event| {
        let _ = sender.send(event);
    });

    if !ctx.quiet() && ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &header(&ui_ctx, "watch", Some(store.mode().as_str())));
        print(&ui_ctx, &hint(&ui_ctx, "Press Ctrl-C to stop."));
    }

    let mut seen = 0usize;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                println!("{}", event_line(&ui_ctx, &event)?);
                seen += 1;
                if args.count.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    subscription.unsubscribe();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;
    use chemventory_core::remote::{ChangeKind, RemoteChange};
    use chrono::Utc;

    fn ctx(mode: OutputMode) -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode,
        }
    }

    fn insert_change() -> RemoteChange {
        RemoteChange {
            schema: "public".to_string(),
            table: "chemicals".to_string(),
            event_type: ChangeKind::Insert,
            new: serde_json::json!({"id": "99", "name": "Acetone"}),
            old: serde_json::json!({}),
            commit_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_plain_lines() {
        let plain = ctx(OutputMode::Plain);
        assert_eq!(
            event_line(&plain, &ChangeEvent::Sync(Vec::new())).unwrap(),
            "event=sync count=0"
        );
        assert_eq!(
            event_line(&plain, &ChangeEvent::Remote(insert_change())).unwrap(),
            "event=remote type=INSERT table=chemicals id=99"
        );
    }

    #[test]
    fn test_json_lines() {
        let line = event_line(&ctx(OutputMode::Json), &ChangeEvent::Sync(Vec::new())).unwrap();
        assert_eq!(line, r#"{"kind":"sync","data":[]}"#);
    }

    #[test]
    fn test_pretty_lines_use_badges() {
        let line = event_line(
            &ctx(OutputMode::Pretty),
            &ChangeEvent::Remote(insert_change()),
        )
        .unwrap();
        assert_eq!(line, "[INFO] Remote INSERT on chemicals (id 99)");
    }
}
