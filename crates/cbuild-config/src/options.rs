//! Per-target task options.
//!
//! `TaskOptions` is the record a single target invocation is driven by. It is
//! produced by merging the task file layers (see [`crate::task_file`]) and is
//! read-only afterwards.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Which subset of the build outputs a target requests.
///
/// An unset selector (`None` in [`TaskOptions::asset_type`]) requests the full
/// build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Styles,
    Scripts,
    Templates,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Styles => "styles",
            AssetType::Scripts => "scripts",
            AssetType::Templates => "templates",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One glob pattern or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Patterns {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Patterns::One(pattern) => std::slice::from_ref(pattern),
            Patterns::Many(patterns) => patterns,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns::One(pattern.to_string())
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Patterns::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

/// Inline component configuration block (`config` option).
///
/// Only these fields are forwarded to the builder; any other key in the block
/// is dropped. Asset categories hold glob patterns that are expanded against
/// the filesystem before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InlineComponentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Patterns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Patterns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Patterns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Patterns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Patterns>,
}

impl InlineComponentConfig {
    /// Asset categories in the order they are expanded.
    pub fn asset_patterns(&self) -> [(&'static str, Option<&Patterns>); 5] {
        [
            ("images", self.images.as_ref()),
            ("fonts", self.fonts.as_ref()),
            ("scripts", self.scripts.as_ref()),
            ("styles", self.styles.as_ref()),
            ("templates", self.templates.as_ref()),
        ]
    }
}

/// Options for one target of the build task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskOptions {
    /// Output file stem; defaults to the target name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Component root; defaults to the working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,

    /// Output directory (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub verbose: bool,

    /// Inline component configuration, replaces `component.json` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<InlineComponentConfig>,

    /// URL prefix applied to asset URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Development mode
    #[serde(default)]
    pub dev: bool,

    /// Embed source markers in scripts
    #[serde(default)]
    pub source_urls: bool,

    /// Component parts to ignore, name → part type
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub ignore: IndexMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,

    /// Write the JS artifact
    #[serde(default = "crate::defaults::default_enabled")]
    pub scripts: bool,

    /// Write the CSS artifact
    #[serde(default = "crate::defaults::default_enabled")]
    pub styles: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            name: None,
            base: None,
            output: None,
            verbose: false,
            config: None,
            prefix: None,
            dev: false,
            source_urls: false,
            ignore: IndexMap::new(),
            asset_type: None,
            scripts: true,
            styles: true,
        }
    }
}

impl TaskOptions {
    /// Output file stem for `target`.
    pub fn resolve_name<'a>(&'a self, target: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(target)
    }

    /// Absolute component root, relative paths resolved against `cwd`.
    pub fn resolve_base(&self, cwd: &Path) -> PathBuf {
        match &self.base {
            Some(base) => absolutize(base, cwd),
            None => cwd.to_path_buf().clean(),
        }
    }

    /// Absolute output directory.
    pub fn resolve_output(&self, target: &str, cwd: &Path) -> Result<PathBuf> {
        let output = self.output.as_ref().ok_or_else(|| ConfigError::MissingOption {
            target: target.to_string(),
            field: "output",
        })?;
        Ok(absolutize(output, cwd))
    }

    /// Check the options of `target` without touching the filesystem.
    pub fn validate(&self, target: &str) -> Result<()> {
        if self.output.is_none() {
            return Err(ConfigError::MissingOption {
                target: target.to_string(),
                field: "output",
            });
        }

        let name = self.resolve_name(target);
        if name.is_empty() {
            return Err(ConfigError::InvalidOption {
                target: target.to_string(),
                field: "name",
                message: "output name cannot be empty".to_string(),
            });
        }
        // Nested stems like `js/app` are fine as long as they stay below `output`
        let escapes = Path::new(name)
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if name.contains('\0') || name.ends_with('/') || escapes {
            return Err(ConfigError::InvalidOption {
                target: target.to_string(),
                field: "name",
                message: format!("'{}' must be a relative path inside the output directory", name),
            });
        }

        if let Some(config) = &self.config {
            for (category, patterns) in config.asset_patterns() {
                if patterns.is_some_and(|p| p.iter().any(str::is_empty)) {
                    return Err(ConfigError::InvalidOption {
                        target: target.to_string(),
                        field: "config",
                        message: format!("empty glob pattern in '{}'", category),
                    });
                }
            }
        }

        Ok(())
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        cwd.join(path).clean()
    }
}
