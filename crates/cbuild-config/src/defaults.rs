/// Task file names, in discovery order.
pub const TASK_FILE_NAMES: &[&str] = &["cbuild.toml", "cbuild.json"];

/// Component descriptor file name inside a component root.
pub const COMPONENT_JSON: &str = "component.json";

/// Lookup directory registered under every component root.
pub const COMPONENTS_DIR: &str = "components";

/// Prefix for environment overrides (`CBUILD_OUTPUT`, `CBUILD_DEV`, ...).
pub const ENV_PREFIX: &str = "CBUILD_";

/// Option keys that may be overridden from the environment.
pub const ENV_KEYS: &[&str] = &["output", "base", "prefix", "dev", "verbose"];

pub fn default_enabled() -> bool {
    true // Both artifacts are written unless disabled
}
