//! Application-level utilities for the Chemventory CLI.
//!
//! This module provides:
//! - Path resolution for the config file and data directory
//! - The lazily-initialized application context handed to commands

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{exit_not_found_with_hint, resolve_config_path, resolve_data_dir};
