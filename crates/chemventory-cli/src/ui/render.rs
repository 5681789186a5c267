//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Chemventory · command (context)"
/// Plain mode: "chemventory command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Chemventory", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("chemventory {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a divider line.
pub fn divider(ctx: &UiContext) -> String {
    if ctx.mode.is_pretty() {
        let rule = if ctx.unicode { "\u{2500}" } else { "-" };
        rule.repeat(ctx.width.min(60))
    } else {
        "---".to_string()
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let badge_text = kind.display(ctx.unicode);
    let colored_badge = styled(badge_text, kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
///
/// Pretty mode: "Hint: text" with dim styling
/// Plain mode: "hint=text"
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a bordered table.
///
/// Pretty mode: Styled table with borders
/// Plain mode: Space-separated values (no header)
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width as u16);

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}

/// Render a simple table without borders (for chemical lists).
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    // Dim headers through comfy-table so widths are measured without escapes.
    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| {
            let mut cell = Cell::new(c.header);
            if ctx.color {
                cell = cell.add_attribute(Attribute::Dim);
            }
            cell
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..columns.len() {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }

    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}

/// Print a message to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }

    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            is_tty: true,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            vec![
                "1".to_string(),
                "Ethanol".to_string(),
                "120/500 mL".to_string(),
            ],
            vec![
                "2".to_string(),
                "Sodium Hydroxide".to_string(),
                "400/1000 g".to_string(),
            ],
        ]
    }

    #[test]
    fn test_header_pretty() {
        let h = header(&pretty_ctx(), "list", Some("expired"));
        assert!(h.contains("Chemventory"));
        assert!(h.contains("list (expired)"));
    }

    #[test]
    fn test_header_plain() {
        assert_eq!(header(&plain_ctx(), "list", None), "chemventory list");
    }

    #[test]
    fn test_badge_ok() {
        let b = badge(&plain_ctx(), Badge::Ok, "Done");
        assert_eq!(b, "[OK] Done");
    }

    #[test]
    fn test_badge_unicode() {
        let b = badge(&pretty_ctx(), Badge::Warn, "Expiring soon");
        assert!(b.starts_with("[\u{26A0}]"));
        assert!(b.contains("Expiring soon"));
    }

    #[test]
    fn test_kv_pretty() {
        let line = kv(&pretty_ctx(), "Batch", "B-1001");
        assert_eq!(line, "Batch: B-1001");
    }

    #[test]
    fn test_kv_plain() {
        let line = kv(&plain_ctx(), "Safety Class", "red");
        assert_eq!(line, "safety_class=red");
    }

    #[test]
    fn test_hint() {
        assert_eq!(hint(&pretty_ctx(), "try this"), "Hint: try this");
        assert_eq!(hint(&plain_ctx(), "try this"), "hint=try this");
    }

    #[test]
    fn test_receipt_pretty() {
        let r = receipt(&pretty_ctx(), "Added chemical", &[("ID", "42"), ("Name", "Acetone")]);
        assert!(r.contains("[\u{2713}] Added chemical"));
        assert!(r.contains("  ID: 42"));
        assert!(r.contains("  Name: Acetone"));
    }

    #[test]
    fn test_receipt_plain() {
        let r = receipt(&plain_ctx(), "Added chemical", &[("ID", "42"), ("Name", "Acetone")]);
        assert_eq!(r, "status=ok\nid=42\nname=Acetone");
    }

    #[test]
    fn test_tables_plain_have_no_header() {
        let columns = [Column::new("ID"), Column::new("Name"), Column::new("Qty")];
        let t = table(&plain_ctx(), &columns, &sample_rows());
        assert_eq!(t, "1 Ethanol 120/500 mL\n2 Sodium Hydroxide 400/1000 g");
        assert_eq!(simple_table(&plain_ctx(), &columns, &sample_rows()), t);
    }

    #[test]
    fn test_tables_pretty_have_headers() {
        let columns = [Column::new("ID"), Column::new("Name"), Column::new("Qty")];
        for t in [
            table(&pretty_ctx(), &columns, &sample_rows()),
            simple_table(&pretty_ctx(), &columns, &sample_rows()),
        ] {
            assert!(t.contains("Name"));
            assert!(t.contains("Sodium Hydroxide"));
            assert!(t.contains("400/1000 g"));
        }
    }

    #[test]
    fn test_table_empty_rows_keeps_headers() {
        let columns = [Column::new("ID"), Column::new("Name")];
        let t = table(&pretty_ctx(), &columns, &[]);
        assert!(t.contains("ID"));
        assert!(t.contains("Name"));
    }

    #[test]
    fn test_divider() {
        assert!(divider(&pretty_ctx()).contains('\u{2500}'));
        assert_eq!(divider(&plain_ctx()), "---");
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&pretty_ctx(), "Chemical not found", Some("Hint: list first"));
        assert!(e.contains("[\u{2717}] Chemical not found"));
        assert!(e.contains("Hint:"));

        let e_plain = error_message(&plain_ctx(), "Chemical not found", Some("list first"));
        assert_eq!(e_plain, "error=Chemical not found\nhint=list first");
    }
}
