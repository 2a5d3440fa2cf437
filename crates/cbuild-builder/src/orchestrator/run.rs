use cbuild_config::AssetType;

use crate::builder::{BuilderResult, ComponentBuilder};
use crate::output::Artifacts;
use crate::{Error, Result};

/// Builder operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Build,
    Styles,
    Scripts,
    Aliases,
    Templates,
}

impl BuildStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::Build => "build",
            BuildStage::Styles => "styles build",
            BuildStage::Scripts => "scripts build",
            BuildStage::Aliases => "aliases build",
            BuildStage::Templates => "templates build",
        }
    }
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoke the build operation(s) selected by `asset_type`.
///
/// - unset: full build, CSS and JS
/// - `styles`: styles only, CSS
/// - `scripts` / `templates`: scripts, aliases and templates in that order,
///   joined with the builder's extra JS into one JS artifact
///
/// The first failing operation aborts the run.
pub async fn run(
    builder: &mut dyn ComponentBuilder,
    asset_type: Option<AssetType>,
) -> Result<Artifacts> {
    match asset_type {
        None => {
            let output = check(BuildStage::Build, builder.build().await)?;
            Ok(Artifacts {
                css: Some(output.css),
                js: Some(output.js),
            })
        }
        Some(AssetType::Styles) => {
            let css = check(BuildStage::Styles, builder.build_styles().await)?;
            Ok(Artifacts {
                css: Some(css),
                js: None,
            })
        }
        Some(AssetType::Scripts | AssetType::Templates) => {
            let scripts = check(BuildStage::Scripts, builder.build_scripts().await)?;
            let aliases = check(BuildStage::Aliases, builder.build_aliases().await)?;
            let templates = check(BuildStage::Templates, builder.build_templates().await)?;

            let js = join_fragments([
                scripts.as_str(),
                aliases.as_str(),
                templates.as_str(),
                builder.extra_js(),
            ]);
            Ok(Artifacts { css: None, js: Some(js) })
        }
    }
}

/// Join the non-empty fragments with newlines.
pub fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn check<T>(stage: BuildStage, result: BuilderResult<T>) -> Result<T> {
    result.map_err(|e| {
        tracing::error!("{}", e.message);
        Error::Build {
            stage,
            message: e.message,
        }
    })
}
