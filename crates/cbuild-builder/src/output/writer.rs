//! Artifact writing.
//!
//! Writes `<output>/<name>.css` and `<output>/<name>.js`. CSS is trimmed of
//! surrounding whitespace; JS is prefixed with [`LOADER_SHIM`]. Both files go
//! through temporary files that are renamed into place once every write has
//! succeeded. A failed rename restores the files that were there before, so a
//! failed run never leaves a half-written pair behind.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use super::{Artifacts, LOADER_SHIM, WrittenFile};
use crate::{Error, Result};

/// Where and what to write for one target.
#[derive(Debug, Clone)]
pub struct OutputPlan<'a> {
    /// Absolute output directory
    pub dir: &'a Path,
    /// Output directory as configured, used in log messages
    pub display_dir: &'a Path,
    /// File stem
    pub name: &'a str,
    pub write_css: bool,
    pub write_js: bool,
    pub verbose: bool,
}

/// Write the artifacts selected by `plan`.
///
/// Returns the written files in write order (CSS first). Artifacts that are
/// disabled in the plan or were not produced are skipped.
pub fn write_artifacts(artifacts: &Artifacts, plan: &OutputPlan<'_>) -> Result<Vec<WrittenFile>> {
    let dir = plan.dir.clean();
    let mut operations: Vec<(PathBuf, String)> = Vec::new();

    if plan.write_css {
        if let Some(css) = &artifacts.css {
            let path = validate_output_path(&dir, &format!("{}.css", plan.name))?;
            operations.push((path, css.trim().to_string()));
        }
    }

    if plan.write_js {
        if let Some(js) = &artifacts.js {
            let path = validate_output_path(&dir, &format!("{}.js", plan.name))?;
            let mut content = String::with_capacity(LOADER_SHIM.len() + js.len());
            content.push_str(LOADER_SHIM);
            content.push_str(js);
            operations.push((path, content));
        }
    }

    if operations.is_empty() {
        tracing::debug!("Nothing to write for {}", plan.name);
        return Ok(Vec::new());
    }

    write_files_atomic(&operations)?;

    let written: Vec<WrittenFile> = operations
        .iter()
        .map(|(path, content)| WrittenFile {
            path: path.clone(),
            size: content.len() as u64,
        })
        .collect();

    for file in &written {
        let relative = file.path.strip_prefix(&dir).unwrap_or(&file.path);
        task_log!(
            plan.verbose,
            "write: {} ({}kb)",
            plan.display_dir.join(relative).display(),
            file.kilobytes()
        );
    }

    Ok(written)
}

/// Validates an output file name against the output directory.
///
/// Rejects names that would resolve outside `base_dir` after cleaning.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Two-phase write: everything to `<file>.tmp`, then rename into place.
///
/// Files being replaced are moved to `<file>.bak` first. If any rename fails,
/// the renames already done are undone and the previous files restored, so
/// the output directory holds either the old pair or the new one.
fn write_files_atomic(operations: &[(PathBuf, String)]) -> Result<()> {
    let mut temp_files: Vec<(PathBuf, PathBuf)> = Vec::new();

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = sibling_path(target_path, "tmp");
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    let mut committed: Vec<Committed> = Vec::new();

    for (temp_path, target_path) in &temp_files {
        if let Err(message) = commit(temp_path, target_path, &mut committed) {
            rollback(&committed);
            cleanup_temp_files(&temp_files);
            return Err(Error::WriteFailure(message));
        }
    }

    for entry in &committed {
        if let Some(backup) = &entry.backup {
            if let Err(e) = fs::remove_file(backup) {
                tracing::warn!("Failed to remove backup '{}': {}", backup.display(), e);
            }
        }
    }

    Ok(())
}

/// A target renamed into place, with the file it replaced.
struct Committed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

fn commit(
    temp_path: &Path,
    target_path: &Path,
    committed: &mut Vec<Committed>,
) -> std::result::Result<(), String> {
    let backup = if target_path.is_file() {
        let backup = sibling_path(target_path, "bak");
        fs::rename(target_path, &backup).map_err(|e| {
            format!(
                "Failed to back up '{}' to '{}': {}",
                target_path.display(),
                backup.display(),
                e
            )
        })?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(temp_path, target_path) {
        if let Some(backup) = &backup {
            restore(backup, target_path);
        }
        return Err(format!(
            "Failed to rename '{}' to '{}': {}",
            temp_path.display(),
            target_path.display(),
            e
        ));
    }

    committed.push(Committed {
        target: target_path.to_path_buf(),
        backup,
    });
    Ok(())
}

fn rollback(committed: &[Committed]) {
    for entry in committed.iter().rev() {
        match &entry.backup {
            Some(backup) => restore(backup, &entry.target),
            None => {
                if let Err(e) = fs::remove_file(&entry.target) {
                    tracing::warn!(
                        "Failed to remove partially written '{}': {}",
                        entry.target.display(),
                        e
                    );
                }
            }
        }
    }
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = fs::rename(backup, target) {
        tracing::warn!(
            "Failed to restore '{}' from '{}': {}",
            target.display(),
            backup.display(),
            e
        );
    }
}

// app.css and app.js must not share a temporary file
fn sibling_path(target: &Path, extension: &str) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    target.with_file_name(name)
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    "Failed to clean up temporary file '{}': {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }
}
