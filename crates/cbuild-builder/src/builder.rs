//! Contract of the external component builder.
//!
//! The builder resolves component dependencies and produces the CSS/JS text;
//! cbuild only configures it and picks which build operation to call. Any
//! implementation of [`ComponentBuilder`] can be driven by the orchestrator:
//! [`crate::process::CommandBuilder`] talks to an external program, tests use
//! in-memory stubs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cbuild_config::ComponentConfig;
use thiserror::Error;

/// Failure reported by the builder for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BuilderError {
    pub message: String,
}

impl BuilderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BuilderResult<T> = std::result::Result<T, BuilderError>;

/// Result of a full build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub css: String,
    pub js: String,
}

/// Where a new builder takes its component configuration from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// The builder's own loading (the component descriptor under `base`).
    Descriptor,
    /// Use this configuration instead of loading one, exactly once at
    /// construction.
    Inline(ComponentConfig),
}

/// A configured builder instance bound to one component root.
///
/// Setter methods mirror the builder library's configuration calls and may be
/// invoked in any order before the first build. Build methods run
/// asynchronously and report failures as [`BuilderError`].
#[async_trait]
pub trait ComponentBuilder: Send + Sync {
    /// Directory assets are copied to.
    fn copy_assets_to(&mut self, dir: &Path);

    /// Prefix applied to asset URLs.
    fn prefix_urls(&mut self, prefix: &str);

    /// Switch to development mode.
    fn development(&mut self);

    /// Embed source markers in generated scripts.
    fn add_source_urls(&mut self);

    /// Skip the named component part; `kind` narrows it to one part type.
    fn ignore(&mut self, name: &str, kind: Option<&str>);

    /// Add directories to search for dependencies.
    fn add_lookup(&mut self, paths: &[PathBuf]);

    /// Current component configuration.
    fn config(&self) -> &ComponentConfig;

    /// Replace the component configuration.
    fn set_config(&mut self, config: ComponentConfig);

    /// Extra JS the builder accumulated while building (e.g. by plugins).
    fn extra_js(&self) -> &str;

    async fn build(&mut self) -> BuilderResult<BuildOutput>;

    async fn build_styles(&mut self) -> BuilderResult<String>;

    async fn build_scripts(&mut self) -> BuilderResult<String>;

    async fn build_aliases(&mut self) -> BuilderResult<String>;

    async fn build_templates(&mut self) -> BuilderResult<String>;
}

/// Creates builders bound to a component root.
pub trait BuilderFactory: Send + Sync {
    fn create(&self, base: &Path, source: ConfigSource)
    -> BuilderResult<Box<dyn ComponentBuilder>>;
}
