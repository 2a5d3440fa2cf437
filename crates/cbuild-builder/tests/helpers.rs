//! Shared test utilities for cbuild-builder tests
//!
//! Provides an in-memory builder that records every call it receives, so
//! tests can assert on configuration order as well as on written artifacts.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cbuild_builder::{
    BuildOutput, BuilderError, BuilderFactory, BuilderResult, ComponentBuilder, ComponentConfig,
    ConfigSource, TaskOptions,
};
use parking_lot::Mutex;

/// A call observed by the stub.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { base: PathBuf, source: ConfigSource },
    CopyAssetsTo(PathBuf),
    PrefixUrls(String),
    Development,
    AddSourceUrls,
    Ignore(String, Option<String>),
    AddLookup(Vec<PathBuf>),
    SetConfig(ComponentConfig),
    Build,
    BuildStyles,
    BuildScripts,
    BuildAliases,
    BuildTemplates,
}

/// Canned builder results.
#[derive(Debug, Clone, Default)]
pub struct StubOutputs {
    pub css: String,
    pub js: String,
    pub styles: String,
    pub scripts: String,
    pub aliases: String,
    pub templates: String,
    pub extra_js: String,
    /// Build call that fails, with its message
    pub fail: Option<(Call, String)>,
}

#[derive(Clone, Default)]
pub struct StubFactory {
    pub outputs: StubOutputs,
    /// Config a builder starts with when it loads its own descriptor
    pub descriptor_config: ComponentConfig,
    pub create_error: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl StubFactory {
    pub fn new(outputs: StubOutputs) -> Self {
        Self {
            outputs,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Config passed to the last `set_config` call.
    pub fn final_config(&self) -> Option<ComponentConfig> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::SetConfig(config) => Some(config.clone()),
            _ => None,
        })
    }

    pub fn build_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::Build
                        | Call::BuildStyles
                        | Call::BuildScripts
                        | Call::BuildAliases
                        | Call::BuildTemplates
                )
            })
            .collect()
    }
}

impl BuilderFactory for StubFactory {
    fn create(
        &self,
        base: &Path,
        source: ConfigSource,
    ) -> BuilderResult<Box<dyn ComponentBuilder>> {
        self.calls.lock().push(Call::Create {
            base: base.to_path_buf(),
            source: source.clone(),
        });

        if let Some(message) = &self.create_error {
            return Err(BuilderError::new(message.clone()));
        }

        let config = match source {
            ConfigSource::Inline(config) => config,
            ConfigSource::Descriptor => self.descriptor_config.clone(),
        };

        Ok(Box::new(StubBuilder {
            outputs: self.outputs.clone(),
            config,
            calls: Arc::clone(&self.calls),
        }))
    }
}

pub struct StubBuilder {
    outputs: StubOutputs,
    config: ComponentConfig,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl StubBuilder {
    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn finish<T>(&self, call: Call, value: T) -> BuilderResult<T> {
        self.record(call.clone());
        match &self.outputs.fail {
            Some((failing, message)) if *failing == call => Err(BuilderError::new(message.clone())),
            _ => Ok(value),
        }
    }
}

#[async_trait]
impl ComponentBuilder for StubBuilder {
    fn copy_assets_to(&mut self, dir: &Path) {
        self.record(Call::CopyAssetsTo(dir.to_path_buf()));
    }

    fn prefix_urls(&mut self, prefix: &str) {
        self.record(Call::PrefixUrls(prefix.to_string()));
    }

    fn development(&mut self) {
        self.record(Call::Development);
    }

    fn add_source_urls(&mut self) {
        self.record(Call::AddSourceUrls);
    }

    fn ignore(&mut self, name: &str, kind: Option<&str>) {
        self.record(Call::Ignore(name.to_string(), kind.map(str::to_string)));
    }

    fn add_lookup(&mut self, paths: &[PathBuf]) {
        self.record(Call::AddLookup(paths.to_vec()));
    }

    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn set_config(&mut self, config: ComponentConfig) {
        self.record(Call::SetConfig(config.clone()));
        self.config = config;
    }

    fn extra_js(&self) -> &str {
        &self.outputs.extra_js
    }

    async fn build(&mut self) -> BuilderResult<BuildOutput> {
        let output = BuildOutput {
            css: self.outputs.css.clone(),
            js: self.outputs.js.clone(),
        };
        self.finish(Call::Build, output)
    }

    async fn build_styles(&mut self) -> BuilderResult<String> {
        self.finish(Call::BuildStyles, self.outputs.styles.clone())
    }

    async fn build_scripts(&mut self) -> BuilderResult<String> {
        self.finish(Call::BuildScripts, self.outputs.scripts.clone())
    }

    async fn build_aliases(&mut self) -> BuilderResult<String> {
        self.finish(Call::BuildAliases, self.outputs.aliases.clone())
    }

    async fn build_templates(&mut self) -> BuilderResult<String> {
        self.finish(Call::BuildTemplates, self.outputs.templates.clone())
    }
}

/// Options with only `output` set.
pub fn options_with_output(output: &str) -> TaskOptions {
    TaskOptions {
        output: Some(PathBuf::from(output)),
        ..TaskOptions::default()
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.as_ref().display(), e))
}
