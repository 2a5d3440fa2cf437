#![cfg_attr(docsrs, feature(doc_cfg))]

//! # cbuild-builder
//!
//! Build orchestration on top of an external component builder.
//!
//! The orchestrator translates a target's [`TaskOptions`] into builder
//! configuration calls, invokes the build operation selected by the target's
//! asset type, and writes `<output>/<name>.css` / `<output>/<name>.js`.
//! Dependency resolution and asset generation belong to the builder.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cbuild_builder::{BuildTask, CommandBuilderFactory, run_task};
//! use cbuild_config::TaskOptions;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = TaskOptions {
//!     output: Some(PathBuf::from("build")),
//!     ..TaskOptions::default()
//! };
//! let task = BuildTask::new("app", options, std::env::current_dir()?);
//! let factory = CommandBuilderFactory::new("component-build-json", Vec::new());
//!
//! let report = run_task(&task, &factory).await?;
//! for file in &report.files {
//!     println!("{} ({} bytes)", file.path.display(), file.size);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Configure hook
//!
//! Library users can customize the builder after the standard configuration
//! steps:
//!
//! ```no_run
//! use cbuild_builder::BuildTask;
//! use cbuild_config::TaskOptions;
//!
//! let task = BuildTask::new("app", TaskOptions::default(), ".")
//!     .with_configure(|builder| {
//!         builder.prefix_urls("https://cdn.example.com/");
//!         Ok(())
//!     });
//! ```

use std::path::PathBuf;

/// Log a per-target message at info level when the target is verbose, debug
/// otherwise.
macro_rules! task_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod builder;
pub mod orchestrator;
pub mod output;
pub mod process;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use builder::{
    BuildOutput, BuilderError, BuilderFactory, BuilderResult, ComponentBuilder, ConfigSource,
};
pub use cbuild_config::{AssetType, ComponentConfig, TaskOptions};
pub use orchestrator::{
    BuildStage, BuildTask, ConfigureHook, TaskReport, configure, restricted_view, run, run_task,
};
pub use output::{Artifacts, LOADER_SHIM, WrittenFile};
pub use process::{CommandBuilder, CommandBuilderFactory};

/// Error types for cbuild-builder operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A builder operation reported a failure. Fatal for the target.
    #[error("{stage} failed: {message}")]
    Build { stage: BuildStage, message: String },

    /// The builder could not be created for a component root.
    #[error("Failed to create builder for {}: {message}", .base.display())]
    BuilderInit { base: PathBuf, message: String },

    /// The configure hook rejected the builder.
    #[error("Configure hook failed: {0}")]
    Hook(String),

    /// Invalid task options or component configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] cbuild_config::ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type alias for cbuild-builder operations.
pub type Result<T> = std::result::Result<T, Error>;
