//! cbuild CLI - component build orchestration from the command line.
//!
//! Reads a task file (`cbuild.toml` / `cbuild.json`), merges each target's
//! options, and drives an external component builder through
//! [`cbuild_builder`].
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - `commands` - `build` and `check`
//! - [`error`] - error types and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and the build summary
//!
//! # Example
//!
//! ```rust
//! use cbuild_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
