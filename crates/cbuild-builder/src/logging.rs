//! Logging setup for embedders of cbuild-builder.
//!
//! Only available with the `logging` feature. Without it the crate emits
//! `tracing` events and leaves the subscriber to the application.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Crates whose events the installed filter lets through.
const CRATES: &[&str] = &["cbuild_builder", "cbuild_config"];

/// Verbosity of cbuild output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Task summaries and verbose-target messages (default)
    #[default]
    Info,
    /// Every builder call and write
    Debug,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    fn filter(&self) -> EnvFilter {
        let directives = CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, self.directive()))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.directive())
    }
}

/// Install a compact fmt subscriber filtered to cbuild crates.
///
/// Only the first call in a process takes effect.
///
/// ```rust,no_run
/// use cbuild_builder::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    install(level.filter());
}

/// Like [`init_logging`], but honours `RUST_LOG` and falls back to
/// [`LogLevel::Info`].
pub fn init_logging_from_env() {
    install(EnvFilter::try_from_default_env().unwrap_or_else(|_| LogLevel::Info.filter()));
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        // An application subscriber installed earlier keeps priority
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn filter_covers_every_crate() {
        let rendered = LogLevel::Debug.filter().to_string();
        assert!(rendered.contains("cbuild_builder=debug"));
        assert!(rendered.contains("cbuild_config=debug"));
    }
}
