use std::path::Path;

use cbuild_config::defaults::COMPONENTS_DIR;
use cbuild_config::{ComponentConfig, InlineComponentConfig, Patterns, glob};

use super::BuildTask;
use crate::builder::{BuilderFactory, ComponentBuilder, ConfigSource};
use crate::{Error, Result};

/// Create and configure a builder for `task`.
///
/// # Steps
///
/// 1. Resolve `base` and `output` against the task's working directory
/// 2. Expand the inline `config` block, if any, into a restricted view
/// 3. Create the builder, handing it the restricted view as its config source
/// 4. Apply copy destination, URL prefix, dev mode, source URLs, ignores
/// 5. Add `<base>/components` to the lookup paths
/// 6. Load `<base>/component.json`, overlay the inline view, register `paths`
/// 7. Run the configure hook
///
/// # Errors
///
/// Returns errors for a missing `output`, a glob that cannot be expanded, a
/// factory failure, or a failing configure hook. A malformed descriptor is
/// logged and ignored.
pub fn configure(task: &BuildTask, factory: &dyn BuilderFactory) -> Result<Box<dyn ComponentBuilder>> {
    let options = &task.options;

    let base = options.resolve_base(&task.cwd);
    let output = options.resolve_output(&task.target, &task.cwd)?;

    let inline = options
        .config
        .as_ref()
        .map(|config| restricted_view(config, &task.cwd))
        .transpose()?;

    let source = match &inline {
        Some(view) => ConfigSource::Inline(view.clone()),
        None => ConfigSource::Descriptor,
    };

    let mut builder = factory
        .create(&base, source)
        .map_err(|e| Error::BuilderInit {
            base: base.clone(),
            message: e.message,
        })?;

    builder.copy_assets_to(&output);

    if let Some(prefix) = &options.prefix {
        builder.prefix_urls(prefix);
    }

    if options.dev {
        builder.development();
    }

    if options.source_urls {
        builder.add_source_urls();
    }

    for (name, kind) in &options.ignore {
        builder.ignore(name, kind.as_deref());
    }

    // Dependencies may live under <base>/components rather than <cwd>/components
    builder.add_lookup(&[base.join(COMPONENTS_DIR)]);

    let mut config = match ComponentConfig::load(&base) {
        Ok(Some(config)) => config,
        Ok(None) => builder.config().clone(),
        Err(e) => {
            tracing::warn!("Ignoring component descriptor: {}", e);
            builder.config().clone()
        }
    };

    if let Some(view) = &inline {
        config.overlay(view);
    }

    if !config.paths.is_empty() {
        let paths = config.resolve_paths(&base);
        tracing::debug!("Adding {} lookup path(s) from component config", paths.len());
        builder.add_lookup(&paths);
    }

    builder.set_config(config);

    if let Some(hook) = &task.configure {
        hook(builder.as_mut()).map_err(|e| Error::Hook(e.message))?;
    }

    Ok(builder)
}

/// Build the configuration handed to the builder from an inline `config`
/// block.
///
/// Only `name`, `main`, `version`, `license` and `dependencies` are copied;
/// each asset category that was given is replaced by the files its patterns
/// match under `cwd`.
pub fn restricted_view(inline: &InlineComponentConfig, cwd: &Path) -> Result<ComponentConfig> {
    let mut view = ComponentConfig {
        name: inline.name.clone(),
        main: inline.main.clone(),
        version: inline.version.clone(),
        license: inline.license.clone(),
        dependencies: inline.dependencies.clone(),
        ..ComponentConfig::default()
    };

    for (category, patterns) in inline.asset_patterns() {
        let files = expand_category(category, patterns, cwd)?;
        if let Some(field) = view.category_mut(category) {
            *field = files;
        }
    }

    Ok(view)
}

fn expand_category(
    category: &str,
    patterns: Option<&Patterns>,
    cwd: &Path,
) -> Result<Option<Vec<String>>> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };

    let files = glob::expand(patterns.iter(), cwd)?;
    tracing::debug!("{}: {} file(s) matched", category, files.len());
    Ok(Some(files))
}
