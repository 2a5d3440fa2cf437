use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available cbuild subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build targets from the task file
    ///
    /// Runs every named target, or all targets in file order when none are
    /// named. Stops at the first failing target unless --parallel is given.
    Build(BuildArgs),

    /// Validate the task file and each target's options
    ///
    /// Merges every target's options exactly as `build` would and reports the
    /// targets that could not be built, without invoking the builder.
    Check(CheckArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Targets to build (default: all)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Task file to use instead of cbuild.toml / cbuild.json
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory for relative paths and glob patterns
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Builder command, overrides the task file's [builder]
    ///
    /// Split on whitespace: the first word is the program, the rest are
    /// arguments placed before the operation name.
    ///
    /// Example:
    ///   cbuild build --builder "node scripts/component-builder.js"
    #[arg(long, value_name = "CMD")]
    pub builder: Option<String>,

    /// Build targets concurrently
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Task file to use instead of cbuild.toml / cbuild.json
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory the task file is discovered in
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print the JSON schema of target options and exit
    #[arg(long)]
    pub schema: bool,
}
