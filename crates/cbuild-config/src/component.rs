//! Component descriptor (`component.json`) model.
//!
//! The descriptor is consumed by the external builder. Only the fields the
//! build task itself reads or writes are typed; everything else is carried in
//! [`ComponentConfig::extra`] so the builder sees the descriptor unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::COMPONENT_JSON;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
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
    pub images: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,

    /// Extra lookup directories, relative to the component root
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,

    /// Descriptor fields the build task does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentConfig {
    /// Path of the descriptor inside `base`.
    pub fn descriptor_path(base: &Path) -> PathBuf {
        base.join(COMPONENT_JSON)
    }

    /// File list of an asset category (`images`, `fonts`, `scripts`,
    /// `styles`, `templates`).
    pub fn category_mut(&mut self, category: &str) -> Option<&mut Option<Vec<String>>> {
        match category {
            "images" => Some(&mut self.images),
            "fonts" => Some(&mut self.fonts),
            "scripts" => Some(&mut self.scripts),
            "styles" => Some(&mut self.styles),
            "templates" => Some(&mut self.templates),
            _ => None,
        }
    }

    /// Read `<base>/component.json`.
    ///
    /// Returns `Ok(None)` when the file does not exist. The file is read on
    /// every call; nothing is cached.
    pub fn load(base: &Path) -> Result<Option<Self>> {
        let path = Self::descriptor_path(base);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidDescriptor {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(config))
    }

    /// Copy every field that is set in `other` over this configuration.
    pub fn overlay(&mut self, other: &ComponentConfig) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        take(&mut self.name, &other.name);
        take(&mut self.main, &other.main);
        take(&mut self.version, &other.version);
        take(&mut self.license, &other.license);
        take(&mut self.dependencies, &other.dependencies);
        take(&mut self.images, &other.images);
        take(&mut self.fonts, &other.fonts);
        take(&mut self.scripts, &other.scripts);
        take(&mut self.styles, &other.styles);
        take(&mut self.templates, &other.templates);

        if !other.paths.is_empty() {
            self.paths.clone_from(&other.paths);
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Rewrite `paths` relative to `base` and return the absolute lookup
    /// directories.
    pub fn resolve_paths(&mut self, base: &Path) -> Vec<PathBuf> {
        for path in &mut self.paths {
            *path = if path.is_absolute() {
                path.clean()
            } else {
                base.join(&*path).clean()
            };
        }
        self.paths.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_descriptor_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(ComponentConfig::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn descriptor_keeps_unknown_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("component.json"),
            r#"{
  "name": "app",
  "repo": "acme/app",
  "scripts": ["index.js"],
  "paths": ["local"],
  "development": {"visionmedia/mocha": "*"}
}"#,
        )
        .unwrap();

        let config = ComponentConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.name.as_deref(), Some("app"));
        assert_eq!(config.scripts, Some(vec!["index.js".to_string()]));
        assert_eq!(config.extra["repo"], "acme/app");
        assert!(config.extra.contains_key("development"));

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["repo"], "acme/app");
        assert!(value.get("styles").is_none());
    }

    #[test]
    fn malformed_descriptor_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("component.json"), "{ not json").unwrap();
        let err = ComponentConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDescriptor { .. }));
    }

    #[test]
    fn overlay_only_replaces_set_fields() {
        let mut base = ComponentConfig {
            name: Some("file".into()),
            version: Some("1.0.0".into()),
            styles: Some(vec!["a.css".into()]),
            ..ComponentConfig::default()
        };
        let inline = ComponentConfig {
            name: Some("inline".into()),
            styles: Some(vec!["b.css".into(), "c.css".into()]),
            ..ComponentConfig::default()
        };

        base.overlay(&inline);
        assert_eq!(base.name.as_deref(), Some("inline"));
        assert_eq!(base.version.as_deref(), Some("1.0.0"));
        assert_eq!(base.styles, Some(vec!["b.css".into(), "c.css".into()]));
    }

    #[test]
    fn paths_resolve_relative_to_base() {
        let mut config = ComponentConfig {
            paths: vec![PathBuf::from("local"), PathBuf::from("../shared")],
            ..ComponentConfig::default()
        };
        let resolved = config.resolve_paths(Path::new("/work/app"));
        assert_eq!(
            resolved,
            vec![PathBuf::from("/work/app/local"), PathBuf::from("/work/shared")]
        );
        assert_eq!(config.paths, resolved);
    }

    #[test]
    fn category_mut_covers_asset_fields() {
        let mut config = ComponentConfig::default();
        *config.category_mut("fonts").unwrap() = Some(vec!["a.woff".to_string()]);
        assert_eq!(config.fonts, Some(vec!["a.woff".to_string()]));
        assert!(config.category_mut("repo").is_none());
    }
}
