//! Prompts and input sources.

use std::io::{self, Read};

use dialoguer::{Confirm, Input};

use crate::errors::CliError;

/// Read a file, or stdin when `path` is "-".
pub fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))
}

/// Ask a yes/no question. Without a TTY this refuses instead of prompting.
pub fn confirm(prompt: &str, interactive: bool) -> anyhow::Result<bool> {
    if !interactive {
        return Err(CliError::invalid_input(
            "Confirmation required but no TTY available\nHint: Pass --yes to skip the prompt.",
        )
        .into());
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// Use `email` if given, otherwise prompt for one.
pub fn prompt_email(email: Option<&str>, interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = email {
        return Ok(value.to_string());
    }
    if !interactive {
        return Err(CliError::invalid_input(
            "No email provided and no TTY available\nHint: Run `chemventory login <email>`.",
        )
        .into());
    }
    Input::<String>::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read email: {}", e))
}
