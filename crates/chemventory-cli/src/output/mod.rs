//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying chemicals
//! in various formats (JSON, table, plain text).

mod json;
mod text;

pub use json::{print_json, record_json};
pub use text::{print_record, print_record_list, record_row, LIST_COLUMNS};
