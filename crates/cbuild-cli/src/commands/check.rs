//! Check command implementation.
//!
//! Validates the task file and the merged options of every target without
//! running the builder.

use cbuild_config::options_schema;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Print the options schema and stop, with `--schema`
/// 2. Load the task file
/// 3. Merge and validate each target's options
/// 4. Warn when no builder is configured
///
/// # Errors
///
/// Returns errors for an unreadable task file and `CheckFailed` when any
/// target's options are invalid.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        let schema = serde_json::to_string_pretty(&options_schema())
            .context("Failed to render options schema")?;
        println!("{}", schema);
        return Ok(());
    }

    let cwd = utils::resolve_cwd(args.cwd.as_deref())?;
    let task_file = utils::load_task_file(args.config.as_deref(), &cwd)?;
    ui::info(&format!("Checking {}...", task_file.path().display()));

    let targets = task_file.select::<String>(&[])?;
    let mut failures = 0;

    for target in &targets {
        let checked = task_file
            .target_options(target)
            .and_then(|options| options.validate(target).map(|()| options));

        match checked {
            Ok(options) => {
                tracing::debug!("{}: {:?}", target, options);
                let output = options
                    .output
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                ui::success(&format!(
                    "  {} -> {}/{}",
                    target,
                    output,
                    options.resolve_name(target)
                ));
            }
            Err(e) => {
                ui::error(&format!("  {}", e));
                failures += 1;
            }
        }
    }

    if task_file.builder().is_none() {
        ui::warning("No [builder] configured; `cbuild build` will need --builder");
    }

    if failures > 0 {
        return Err(CliError::CheckFailed(failures));
    }

    ui::success("All targets are valid!");
    Ok(())
}
