//! Per-target build orchestration.
//!
//! [`run_task`] is the whole pipeline for one target: validate options,
//! [`configure`] a builder, [`run`] the selected build operation, then write
//! the artifacts.

mod configure;
mod run;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use configure::{configure, restricted_view};
pub use run::{BuildStage, join_fragments, run};

use cbuild_config::TaskOptions;

use crate::Result;
use crate::builder::{BuilderError, BuilderFactory, ComponentBuilder};
use crate::output::WrittenFile;
use crate::output::writer::{OutputPlan, write_artifacts};

/// Caller-supplied customization, invoked with the builder after all standard
/// configuration.
pub type ConfigureHook =
    Arc<dyn Fn(&mut dyn ComponentBuilder) -> std::result::Result<(), BuilderError> + Send + Sync>;

/// One named target ready to build.
#[derive(Clone)]
pub struct BuildTask {
    /// Target name; default artifact name
    pub target: String,
    pub options: TaskOptions,
    /// Directory relative paths and globs are resolved against
    pub cwd: PathBuf,
    pub configure: Option<ConfigureHook>,
}

impl BuildTask {
    pub fn new(target: impl Into<String>, options: TaskOptions, cwd: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            options,
            cwd: cwd.into(),
            configure: None,
        }
    }

    /// Set the configure hook.
    pub fn with_configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut dyn ComponentBuilder) -> std::result::Result<(), BuilderError>
            + Send
            + Sync
            + 'static,
    {
        self.configure = Some(Arc::new(hook));
        self
    }

    /// Artifact file stem: `name` if set, else the target name.
    pub fn name(&self) -> &str {
        self.options.resolve_name(&self.target)
    }
}

impl fmt::Debug for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTask")
            .field("target", &self.target)
            .field("options", &self.options)
            .field("cwd", &self.cwd)
            .field("configure", &self.configure.is_some())
            .finish()
    }
}

/// Outcome of a successful target.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub target: String,
    /// Artifact file stem
    pub name: String,
    /// Files written, CSS first
    pub files: Vec<WrittenFile>,
    /// Time spent in the builder
    pub duration: Duration,
}

/// Build one target and write its artifacts.
///
/// # Errors
///
/// Fails on invalid options, builder creation or configure hook failures, the
/// first failing build operation, and write errors. Nothing is written unless
/// every build operation succeeded.
pub async fn run_task(task: &BuildTask, factory: &dyn BuilderFactory) -> Result<TaskReport> {
    let options = &task.options;
    options.validate(&task.target)?;

    let name = task.name();
    let output = options.resolve_output(&task.target, &task.cwd)?;

    tracing::debug!("Configuring builder for target '{}'", task.target);
    let mut builder = configure(task, factory)?;

    let start = Instant::now();
    let artifacts = run(builder.as_mut(), options.asset_type).await?;
    let duration = start.elapsed();
    task_log!(options.verbose, "duration: {}ms", duration.as_millis());

    let display_dir = options.output.as_deref().unwrap_or(&output);
    let plan = OutputPlan {
        dir: &output,
        display_dir,
        name,
        write_css: options.styles,
        write_js: options.scripts,
        verbose: options.verbose,
    };
    let files = write_artifacts(&artifacts, &plan)?;

    Ok(TaskReport {
        target: task.target.clone(),
        name: name.to_string(),
        files,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_falls_back_to_target() {
        let task = BuildTask::new("app", TaskOptions::default(), "/work");
        assert_eq!(task.name(), "app");

        let options = TaskOptions {
            name: Some("bundle".to_string()),
            ..TaskOptions::default()
        };
        let task = BuildTask::new("app", options, "/work");
        assert_eq!(task.name(), "bundle");
    }

    #[test]
    fn debug_hides_hook() {
        let task = BuildTask::new("app", TaskOptions::default(), "/work").with_configure(|_| Ok(()));
        let rendered = format!("{:?}", task);
        assert!(rendered.contains("configure: true"));
    }
}
