//! Builder backed by an external program.
//!
//! Every build operation spawns `<program> <args>... <operation>` with a JSON
//! request on stdin:
//!
//! ```json
//! {"operation": "scripts", "base": "/abs/base", "settings": {...}, "config": {...}}
//! ```
//!
//! and expects a JSON response on stdout: `{"css", "js"}` for the full build,
//! `{"output", "extraJs"}` for the others. A non-zero exit status (stderr is
//! the message) or an `{"error"}` response fails the operation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use cbuild_config::{BuilderCommand, ComponentConfig};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::builder::{
    BuildOutput, BuilderError, BuilderFactory, BuilderResult, ComponentBuilder, ConfigSource,
};

/// Creates [`CommandBuilder`]s for one builder program.
#[derive(Debug, Clone)]
pub struct CommandBuilderFactory {
    program: String,
    args: Vec<String>,
}

impl CommandBuilderFactory {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl From<&BuilderCommand> for CommandBuilderFactory {
    fn from(command: &BuilderCommand) -> Self {
        Self::new(command.command.clone(), command.args.clone())
    }
}

impl BuilderFactory for CommandBuilderFactory {
    fn create(
        &self,
        base: &Path,
        source: ConfigSource,
    ) -> BuilderResult<Box<dyn ComponentBuilder>> {
        let config = match source {
            ConfigSource::Inline(config) => config,
            ConfigSource::Descriptor => match ComponentConfig::load(base) {
                Ok(config) => config.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!("Starting from an empty component config: {}", e);
                    ComponentConfig::default()
                }
            },
        };

        Ok(Box::new(CommandBuilder {
            program: self.program.clone(),
            args: self.args.clone(),
            base: base.to_path_buf(),
            settings: Settings::default(),
            config,
            extra_js: String::new(),
        }))
    }
}

/// Configuration accumulated through the setter calls, sent with every
/// request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    copy_to: Option<PathBuf>,
    prefix: Option<String>,
    development: bool,
    source_urls: bool,
    ignore: Vec<Ignored>,
    lookups: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Ignored {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

#[derive(Serialize)]
struct Request<'a> {
    operation: &'a str,
    base: &'a Path,
    settings: &'a Settings,
    config: &'a ComponentConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    css: Option<String>,
    js: Option<String>,
    output: Option<String>,
    extra_js: Option<String>,
    error: Option<String>,
}

/// [`ComponentBuilder`] that runs an external program per build operation.
#[derive(Debug)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    base: PathBuf,
    settings: Settings,
    config: ComponentConfig,
    extra_js: String,
}

impl CommandBuilder {
    async fn invoke(&mut self, operation: &str) -> BuilderResult<Response> {
        let request = serde_json::to_vec(&Request {
            operation,
            base: &self.base,
            settings: &self.settings,
            config: &self.config,
        })
        .map_err(|e| BuilderError::new(format!("Failed to encode builder request: {}", e)))?;

        tracing::debug!("Running {} {:?} {}", self.program, self.args, operation);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(operation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BuilderError::new(format!("Failed to start '{}': {}", self.program, e)))?;

        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&request).await {
                    // The builder is free to exit without reading its input
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    other => other?,
                }
            }
            Ok::<(), std::io::Error>(())
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|e| {
            BuilderError::new(format!("Failed to wait for '{}': {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("'{}' {} exited with {}", self.program, operation, output.status)
            } else {
                stderr
            };
            return Err(BuilderError::new(message));
        }

        written.map_err(|e| {
            BuilderError::new(format!("Failed to send request to '{}': {}", self.program, e))
        })?;

        let response: Response = serde_json::from_slice(&output.stdout).map_err(|e| {
            BuilderError::new(format!(
                "Invalid response from '{}' {}: {}",
                self.program, operation, e
            ))
        })?;

        if let Some(error) = response.error {
            return Err(BuilderError::new(error));
        }

        if let Some(extra_js) = &response.extra_js {
            self.extra_js.clone_from(extra_js);
        }

        Ok(response)
    }

    async fn invoke_output(&mut self, operation: &str) -> BuilderResult<String> {
        let response = self.invoke(operation).await?;
        Ok(response.output.unwrap_or_default())
    }
}

#[async_trait]
impl ComponentBuilder for CommandBuilder {
    fn copy_assets_to(&mut self, dir: &Path) {
        self.settings.copy_to = Some(dir.to_path_buf());
    }

    fn prefix_urls(&mut self, prefix: &str) {
        self.settings.prefix = Some(prefix.to_string());
    }

    fn development(&mut self) {
        self.settings.development = true;
    }

    fn add_source_urls(&mut self) {
        self.settings.source_urls = true;
    }

    fn ignore(&mut self, name: &str, kind: Option<&str>) {
        self.settings.ignore.push(Ignored {
            name: name.to_string(),
            kind: kind.map(str::to_string),
        });
    }

    fn add_lookup(&mut self, paths: &[PathBuf]) {
        self.settings.lookups.extend(paths.iter().cloned());
    }

    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn set_config(&mut self, config: ComponentConfig) {
        self.config = config;
    }

    fn extra_js(&self) -> &str {
        &self.extra_js
    }

    async fn build(&mut self) -> BuilderResult<BuildOutput> {
        let response = self.invoke("build").await?;
        Ok(BuildOutput {
            css: response.css.unwrap_or_default(),
            js: response.js.unwrap_or_default(),
        })
    }

    async fn build_styles(&mut self) -> BuilderResult<String> {
        self.invoke_output("styles").await
    }

    async fn build_scripts(&mut self) -> BuilderResult<String> {
        self.invoke_output("scripts").await
    }

    async fn build_aliases(&mut self) -> BuilderResult<String> {
        self.invoke_output("aliases").await
    }

    async fn build_templates(&mut self) -> BuilderResult<String> {
        self.invoke_output("templates").await
    }
}
