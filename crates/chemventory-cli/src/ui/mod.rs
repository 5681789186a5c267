//! UI primitives for the Chemventory CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges, styles and the safety class palette
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: String utilities (truncate, quantities, dates)
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, simple_table, hint, print};
//!
//! let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
//! if ui_ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! print(&ui_ctx, &header(&ui_ctx, "list", None));
//! print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
//! print(&ui_ctx, &hint(&ui_ctx, "chemventory show <id>"));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, blank_line, divider, header, hint, kv, print, print_error, receipt, simple_table,
    table, Column,
};
