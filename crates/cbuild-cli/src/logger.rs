//! Logging setup for the cbuild CLI.
//!
//! Libraries only emit `tracing` events; the binary installs the subscriber
//! here. Verbosity is chosen from the global flags:
//!
//! 1. `--verbose`: debug for the cbuild crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set
//! 4. info for the cbuild crates
//!
//! # Example
//!
//! ```rust,no_run
//! use cbuild_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "cbuild_cli=debug,cbuild_builder=debug,cbuild_config=debug";
const QUIET_FILTER: &str = "cbuild_cli=error,cbuild_builder=error,cbuild_config=error";
const DEFAULT_FILTER: &str = "cbuild_cli=info,cbuild_builder=info,cbuild_config=info";

/// Filter for the given flags, consulting `RUST_LOG` only when neither flag is
/// set.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
///
/// Events go to stderr so stdout stays clean for `check --schema`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn flags_override_rust_log() {
        let verbose = filter_for(true, false).to_string();
        assert!(verbose.contains("cbuild_builder=debug"));

        let quiet = filter_for(false, true).to_string();
        assert!(quiet.contains("cbuild_cli=error"));
    }

    #[test]
    #[serial]
    fn default_filter_without_rust_log() {
        unsafe { std::env::remove_var("RUST_LOG") };
        let filter = filter_for(false, false).to_string();
        assert!(filter.contains("cbuild_config=info"));
    }

    #[test]
    #[serial]
    fn rust_log_is_respected() {
        unsafe { std::env::set_var("RUST_LOG", "cbuild_builder=trace") };
        let filter = filter_for(false, false).to_string();
        unsafe { std::env::remove_var("RUST_LOG") };
        assert!(filter.contains("cbuild_builder=trace"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
