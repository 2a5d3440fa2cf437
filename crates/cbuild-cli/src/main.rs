//! cbuild CLI - builds component CSS/JS bundles from a task file.
//!
//! Handles argument parsing, logging initialization, and command dispatch.

use clap::Parser;
use cbuild_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
    };

    // Render CLI errors as miette diagnostics
    result.map_err(error::cli_error_to_miette)
}
