//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Prompts and reading CSV input (`input`)
//! - Date, quantity, field and column parsing (`parsing`)

mod input;
mod parsing;

pub use input::{confirm, prompt_email, read_source};
pub use parsing::{
    parse_columns, parse_date, parse_output_format, parse_physical_state, parse_quantity,
    parse_safety_class,
};
