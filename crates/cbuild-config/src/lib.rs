//! Configuration layer for cbuild.
//!
//! - [`options`] - per-target task options
//! - [`task_file`] - task file discovery and layered merging
//! - [`component`] - the `component.json` descriptor handed to the builder
//! - [`glob`] - asset pattern expansion

pub mod component;
pub mod defaults;
pub mod error;
pub mod glob;
pub mod options;
pub mod task_file;

// Re-export main types
pub use component::ComponentConfig;
pub use error::*;
pub use options::{AssetType, InlineComponentConfig, Patterns, TaskOptions};
pub use task_file::{BuilderCommand, TaskFile};

/// JSON schema of a target's options.
pub fn options_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(TaskOptions);
    serde_json::to_value(schema).unwrap_or_default()
}
