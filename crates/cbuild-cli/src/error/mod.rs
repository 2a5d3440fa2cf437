//! Error handling for the cbuild CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; `main` renders
//! the final error with miette (see [`cli_error_to_miette`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use cbuild_cli::error::{Result, ResultExt};
//!
//! fn current_dir() -> Result<std::path::PathBuf> {
//!     std::env::current_dir().context("Failed to read the working directory")
//! }
//! ```

mod diagnostic;

use std::path::PathBuf;

use thiserror::Error;

pub use diagnostic::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Task file or target option errors
    #[error(transparent)]
    Config(#[from] cbuild_config::ConfigError),

    /// A target failed to build
    #[error("Target '{target}' failed: {source}")]
    Target {
        target: String,
        #[source]
        source: cbuild_builder::Error,
    },

    /// `check` found targets with invalid options
    #[error("{0} target(s) have invalid options")]
    CheckFailed(usize),

    /// No builder program configured
    #[error("No component builder configured")]
    NoBuilder,

    /// Invalid command-line arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A spawned build task panicked or was cancelled
    #[error("Build task aborted: {0}")]
    Join(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Prefix the error with a message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;

    /// Append a hint to the error.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }
}
