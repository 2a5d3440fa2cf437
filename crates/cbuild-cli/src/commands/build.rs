//! Build command implementation.
//!
//! Implements `cbuild build`: every selected target is turned into a
//! [`BuildTask`] and run through [`run_task`] with a builder factory for the
//! configured external builder.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use cbuild_builder::{BuildTask, BuilderFactory, TaskReport, run_task};
use cbuild_config::TaskFile;
use tokio::task::JoinSet;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Resolve the working directory and load the task file
/// 2. Select targets (all, in file order, when none are named)
/// 3. Merge and validate every selected target's options
/// 4. Build, sequentially or with `--parallel`
/// 5. Display the build summary
///
/// # Errors
///
/// Returns errors for task file problems, unknown targets, invalid options,
/// a missing builder, and failed targets.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let cwd = utils::resolve_cwd(args.cwd.as_deref())?;
    let task_file = utils::load_task_file(args.config.as_deref(), &cwd)?;
    let targets = task_file.select(&args.targets)?;
    let tasks = prepare_tasks(&task_file, &targets, &cwd)?;
    let factory = Arc::new(utils::builder_factory(args.builder.as_deref(), &task_file)?);

    tracing::debug!("Builder program: {}", factory.program());

    let reports = if args.parallel && tasks.len() > 1 {
        ui::info(&format!("Building {} targets in parallel...", tasks.len()));
        build_parallel(tasks, factory).await?
    } else {
        build_sequential(&tasks, factory.as_ref()).await?
    };

    let elapsed = start_time.elapsed();
    ui::print_build_summary(&reports, &cwd, elapsed);
    ui::success(&format!(
        "Built {} target(s) in {}",
        reports.len(),
        ui::format_duration(elapsed)
    ));

    Ok(())
}

/// Merge options for every target up front so a bad target fails before any
/// builder runs.
fn prepare_tasks(task_file: &TaskFile, targets: &[String], cwd: &Path) -> Result<Vec<BuildTask>> {
    targets
        .iter()
        .map(|target| -> Result<BuildTask> {
            let options = task_file.target_options(target)?;
            options.validate(target)?;
            Ok(BuildTask::new(target.clone(), options, cwd))
        })
        .collect()
}

async fn build_sequential(
    tasks: &[BuildTask],
    factory: &dyn BuilderFactory,
) -> Result<Vec<TaskReport>> {
    let mut reports = Vec::with_capacity(tasks.len());

    for task in tasks {
        ui::info(&format!("Building target '{}'...", task.target));
        let report = run_task(task, factory)
            .await
            .map_err(|source| CliError::Target {
                target: task.target.clone(),
                source,
            })?;
        reports.push(report);
    }

    Ok(reports)
}

/// Run every target on its own tokio task.
///
/// All targets run to completion; failures are reported individually and the
/// first one in target order is returned. Reports keep target order.
async fn build_parallel<F>(tasks: Vec<BuildTask>, factory: Arc<F>) -> Result<Vec<TaskReport>>
where
    F: BuilderFactory + 'static,
{
    let count = tasks.len();
    let mut set = JoinSet::new();

    for (index, task) in tasks.into_iter().enumerate() {
        let factory = Arc::clone(&factory);
        set.spawn(async move {
            let result = run_task(&task, factory.as_ref()).await;
            (index, task.target, result)
        });
    }

    let mut results: Vec<Option<Result<TaskReport>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (index, target, result) = joined.map_err(|e| CliError::Join(e.to_string()))?;
        let result = result.map_err(|source| {
            ui::error(&format!("Target '{}' failed: {}", target, source));
            CliError::Target { target, source }
        });
        results[index] = Some(result);
    }

    results.into_iter().flatten().collect()
}
