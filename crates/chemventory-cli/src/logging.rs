//! Diagnostic logging to stderr.
//!
//! The core reports swallowed backend failures with `tracing::warn!`, so the
//! default filter is `warn`. `--verbose` raises it to `info`, `--quiet`
//! lowers it to `error`, and `RUST_LOG` overrides both.

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false), "warn");
        assert_eq!(default_directive(true, false), "info");
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(true, true), "info");
    }
}
