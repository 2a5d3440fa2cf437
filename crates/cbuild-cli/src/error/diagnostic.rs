//! Miette diagnostic conversion for CLI errors.

use cbuild_config::ConfigError;
use miette::Report;

use crate::error::CliError;

/// Convert a CliError into a miette Report, attaching help where the fix is
/// known.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Target { target, source } => match source {
            cbuild_builder::Error::Build { stage, message } => miette::miette!(
                help = "The component builder rejected the build; fix the component and re-run",
                "Target '{}': {} failed: {}",
                target,
                stage,
                message
            ),
            cbuild_builder::Error::Config(e) => {
                miette::miette!("Target '{}': {}", target, config_error_to_miette(e))
            }
            other => miette::miette!("Target '{}' failed: {}", target, other),
        },
        CliError::NoBuilder => miette::miette!(
            help = "Add a [builder] table with `command` to the task file or pass --builder <CMD>",
            "No component builder configured"
        ),
        CliError::CheckFailed(count) => miette::miette!(
            help = "Run `cbuild check` with -v for the merged options of each target",
            "{} target(s) have invalid options",
            count
        ),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(_) => miette::miette!(
            help = "Create cbuild.toml in the working directory or pass --config <FILE>",
            "{}",
            err
        ),
        ConfigError::MissingOption { .. } => miette::miette!(
            help = "Set it in [options] or in the target's table",
            "{}",
            err
        ),
        ConfigError::UnknownTarget { .. } | ConfigError::NoTargets => miette::miette!(
            help = "Targets are declared as [targets.<name>] tables",
            "{}",
            err
        ),
        other => miette::miette!("{}", other),
    }
}
