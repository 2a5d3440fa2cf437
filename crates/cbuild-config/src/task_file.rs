//! Task file discovery and per-target option merging.
//!
//! A task file declares shared options and any number of named targets:
//!
//! ```toml
//! [options]
//! output = "build"
//!
//! [targets.app]
//! dev = true
//!
//! [targets.styles]
//! assetType = "styles"
//! ```
//!
//! Effective options for a target are layered with `figment`:
//! defaults < shared `options` < `targets.<name>` < `CBUILD_*` environment.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{ENV_KEYS, ENV_PREFIX, TASK_FILE_NAMES};
use crate::error::{ConfigError, Result};
use crate::options::TaskOptions;

/// External builder program the CLI drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderCommand {
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTaskFile {
    #[serde(default)]
    builder: Option<BuilderCommand>,

    #[serde(default)]
    options: Map<String, Value>,

    #[serde(default)]
    targets: IndexMap<String, Map<String, Value>>,
}

/// A loaded task file.
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
    builder: Option<BuilderCommand>,
    options: Map<String, Value>,
    targets: IndexMap<String, Map<String, Value>>,
}

impl TaskFile {
    /// Find and load the task file in `root`.
    ///
    /// Searches in this order:
    /// 1. `cbuild.toml`
    /// 2. `cbuild.json`
    pub fn discover(root: &Path) -> Result<Self> {
        let path = Self::find(root).ok_or_else(|| ConfigError::NotFound(root.to_path_buf()))?;
        Self::load(&path)
    }

    /// Path of the first task file present in `root`.
    pub fn find(root: &Path) -> Option<PathBuf> {
        TASK_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Load a task file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

        let raw: RawTaskFile = match extension {
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::InvalidTaskFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::InvalidTaskFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(
            "Loaded task file {} ({} targets)",
            path.display(),
            raw.targets.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            builder: raw.builder,
            options: raw.options,
            targets: raw.targets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn builder(&self) -> Option<&BuilderCommand> {
        self.builder.as_ref()
    }

    /// Target names in declaration order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Resolve the targets to run: all of them when `requested` is empty.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        if requested.is_empty() {
            return Ok(self.targets.keys().cloned().collect());
        }

        requested
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if self.targets.contains_key(name) {
                    Ok(name.to_string())
                } else {
                    Err(ConfigError::UnknownTarget {
                        name: name.to_string(),
                        available: self.target_names().collect::<Vec<_>>().join(", "),
                    })
                }
            })
            .collect()
    }

    /// Effective options of `target`, with environment overrides applied.
    pub fn target_options(&self, target: &str) -> Result<TaskOptions> {
        self.merge_target(target, true)
    }

    /// Effective options of `target` from the file alone.
    pub fn target_options_without_env(&self, target: &str) -> Result<TaskOptions> {
        self.merge_target(target, false)
    }

    fn merge_target(&self, target: &str, with_env: bool) -> Result<TaskOptions> {
        let overrides = self
            .targets
            .get(target)
            .ok_or_else(|| ConfigError::UnknownTarget {
                name: target.to_string(),
                available: self.target_names().collect::<Vec<_>>().join(", "),
            })?;

        let mut figment = Figment::new()
            .merge(Serialized::defaults(TaskOptions::default()))
            .merge(Serialized::defaults(&self.options))
            .merge(Serialized::defaults(overrides));

        if with_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));
        }

        figment.extract().map_err(|e| ConfigError::InvalidTarget {
            target: target.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AssetType;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn toml_targets_keep_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cbuild.toml",
            r#"
[options]
output = "build"

[targets.zeta]
[targets.alpha]
assetType = "styles"
"#,
        );

        let file = TaskFile::load(&path).unwrap();
        assert_eq!(file.target_names().collect::<Vec<_>>(), ["zeta", "alpha"]);

        let alpha = file.target_options_without_env("alpha").unwrap();
        assert_eq!(alpha.asset_type, Some(AssetType::Styles));
        assert_eq!(alpha.output, Some(PathBuf::from("build")));
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cbuild.yaml", "options: {}");
        assert!(matches!(
            TaskFile::load(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cbuild.json", r#"{"target": {}}"#);
        assert!(matches!(
            TaskFile::load(&path),
            Err(ConfigError::InvalidTaskFile { .. })
        ));
    }

    #[test]
    fn select_targets() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cbuild.json",
            r#"{"targets": {"app": {}, "admin": {}}}"#,
        );
        let file = TaskFile::load(&path).unwrap();

        assert_eq!(file.select::<&str>(&[]).unwrap(), ["app", "admin"]);
        assert_eq!(file.select(&["admin"]).unwrap(), ["admin"]);

        let err = file.select(&["nope"]).unwrap_err();
        assert!(err.to_string().contains("available: app, admin"));
    }

    #[test]
    fn empty_task_file_has_no_targets() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cbuild.json", "{}");
        let file = TaskFile::load(&path).unwrap();
        assert!(matches!(file.select::<&str>(&[]), Err(ConfigError::NoTargets)));
    }

    #[test]
    fn invalid_target_option_type() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cbuild.json",
            r#"{"targets": {"app": {"output": "b", "dev": "maybe"}}}"#,
        );
        let file = TaskFile::load(&path).unwrap();
        let err = file.target_options_without_env("app").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { ref target, .. } if target == "app"));
    }
}
