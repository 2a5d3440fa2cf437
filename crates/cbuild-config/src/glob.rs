//! Asset glob expansion.
//!
//! Patterns are matched relative to a working directory and processed in
//! order: a pattern prefixed with `!` removes everything matched so far that it
//! matches. Results are de-duplicated, keep first-match order across patterns
//! and are sorted within a pattern. Paths use `/` separators.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexSet;
use walkdir::WalkDir;

use crate::error::{ConfigError, Result};

const META_CHARS: &[char] = &['*', '?', '[', '{'];

/// Expand `patterns` against the filesystem under `cwd`.
///
/// # Example
///
/// ```no_run
/// use cbuild_config::glob::expand;
/// use std::path::Path;
///
/// let styles = expand(["styles/*.css", "!styles/print.css"], Path::new(".")).unwrap();
/// ```
pub fn expand<'a>(patterns: impl IntoIterator<Item = &'a str>, cwd: &Path) -> Result<Vec<String>> {
    let mut matches: IndexSet<String> = IndexSet::new();

    for raw in patterns {
        let (exclude, pattern) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let pattern = normalize_pattern(pattern);
        if pattern.is_empty() {
            return Err(ConfigError::Glob {
                pattern: raw.to_string(),
                message: "pattern is empty".to_string(),
            });
        }

        if exclude {
            matches.retain(|path| !fast_glob::glob_match(&pattern, path));
            continue;
        }

        for path in match_pattern(&pattern, cwd)? {
            matches.insert(path);
        }
    }

    Ok(matches.into_iter().collect())
}

/// Strip `./` prefixes and turn `\` into `/`.
fn normalize_pattern(pattern: &str) -> String {
    let mut pattern = pattern.replace('\\', "/");
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.to_string();
    }
    pattern
}

fn has_magic(pattern: &str) -> bool {
    pattern.contains(META_CHARS)
}

/// Leading directory of `pattern` that contains no glob syntax.
fn static_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    let mut segments = pattern.split('/').peekable();
    while let Some(segment) = segments.next() {
        // The last segment is a file name, never part of the walk root
        if segments.peek().is_none() || has_magic(segment) {
            break;
        }
        if segment.is_empty() && prefix.as_os_str().is_empty() {
            prefix.push("/");
        } else {
            prefix.push(segment);
        }
    }
    prefix
}

fn match_pattern(pattern: &str, cwd: &Path) -> Result<Vec<String>> {
    let absolute = Path::new(pattern).is_absolute();

    if !has_magic(pattern) {
        let candidate = if absolute {
            PathBuf::from(pattern)
        } else {
            cwd.join(pattern)
        };
        return Ok(if candidate.exists() {
            vec![pattern.trim_end_matches('/').to_string()]
        } else {
            Vec::new()
        });
    }

    let prefix = static_prefix(pattern);
    let root = if absolute { prefix } else { cwd.join(prefix) };
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let dot_allowed = pattern.starts_with('.') || pattern.contains("/.");
    let mut found = Vec::new();

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| dot_allowed || entry.depth() == 0 || !is_dot_name(entry.file_name()));

    for entry in walker {
        // Unreadable directories and symlink loops are skipped, not fatal
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping entry while expanding '{}': {}", pattern, e);
                continue;
            }
        };

        let relative = if absolute {
            entry.path()
        } else {
            match entry.path().strip_prefix(cwd) {
                Ok(relative) => relative,
                Err(_) => continue,
            }
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let candidate = to_slash(relative);
        if fast_glob::glob_match(pattern, &candidate) {
            found.push(candidate);
        }
    }

    found.sort();
    Ok(found)
}

fn is_dot_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Normal(name) => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&name.to_string_lossy());
            }
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::CurDir | Component::ParentDir => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&component.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
