//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (chemical, user entry).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Not signed in, or signed in without admin rights.
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "CHEMVENTORY_CONFIG";

/// Environment variable overriding the admin list (comma separated).
pub const ADMIN_EMAILS_ENV: &str = "CHEMVENTORY_ADMIN_EMAILS";

/// Directory name used under the XDG config and data homes.
pub const APP_DIR: &str = "chemventory";
