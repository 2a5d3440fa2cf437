//! Helpers shared by the commands.

use std::path::{Path, PathBuf};

use cbuild_builder::CommandBuilderFactory;
use cbuild_config::TaskFile;

use crate::error::{CliError, Result, ResultExt};

/// Resolve the working directory: `--cwd` relative to the process directory,
/// or the process directory itself.
///
/// # Errors
///
/// Returns `DirectoryNotFound` if `--cwd` is not a directory.
pub fn resolve_cwd(explicit: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;

    let Some(explicit) = explicit else {
        return Ok(current);
    };

    let cwd = if explicit.is_absolute() {
        explicit.to_path_buf()
    } else {
        current.join(explicit)
    };

    if !cwd.is_dir() {
        return Err(CliError::DirectoryNotFound(cwd));
    }

    Ok(cwd)
}

/// Load `--config`, or discover the task file in `cwd`.
pub fn load_task_file(config: Option<&Path>, cwd: &Path) -> Result<TaskFile> {
    let task_file = match config {
        Some(path) => TaskFile::load(path)?,
        None => TaskFile::discover(cwd)?,
    };

    tracing::debug!("Using task file {}", task_file.path().display());
    Ok(task_file)
}

/// Builder factory from `--builder` or the task file's `[builder]` table.
pub fn builder_factory(explicit: Option<&str>, task_file: &TaskFile) -> Result<CommandBuilderFactory> {
    if let Some(command) = explicit {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().ok_or_else(|| {
            CliError::InvalidArgument("--builder cannot be empty".to_string())
        })?;
        return Ok(CommandBuilderFactory::new(program, words.collect()));
    }

    task_file
        .builder()
        .map(CommandBuilderFactory::from)
        .ok_or(CliError::NoBuilder)
}
