//! Command-line interface definition for cbuild.
//!
//! # Command Structure
//!
//! - `cbuild build [TARGET]...` - build targets from the task file
//! - `cbuild check` - validate the task file without building

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command};

/// cbuild - build component CSS/JS bundles
#[derive(Parser, Debug)]
#[command(
    name = "cbuild",
    version,
    about = "Build component CSS/JS bundles from a task file",
    long_about = "cbuild reads cbuild.toml (or cbuild.json), merges the options of each target,\n\
                  drives an external component builder and writes <output>/<name>.css and\n\
                  <output>/<name>.js for every target."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
