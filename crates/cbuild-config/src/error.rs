//! Error types for task file loading and option validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Task file discovery/loading errors
    #[error("task file not found (looked for cbuild.toml and cbuild.json in {0})")]
    NotFound(PathBuf),

    #[error("unsupported task file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid task file {}: {message}", .path.display())]
    InvalidTaskFile { path: PathBuf, message: String },

    #[error("unknown target '{name}' (available: {available})")]
    UnknownTarget { name: String, available: String },

    #[error("task file defines no targets")]
    NoTargets,

    #[error("invalid options for target '{target}': {message}")]
    InvalidTarget { target: String, message: String },

    // Option validation errors
    #[error("target '{target}' is missing required option '{field}'")]
    MissingOption { target: String, field: &'static str },

    #[error("invalid value for option '{field}' in target '{target}': {message}")]
    InvalidOption {
        target: String,
        field: &'static str,
        message: String,
    },

    // Component descriptor errors
    #[error("invalid component descriptor {}: {message}", .path.display())]
    InvalidDescriptor { path: PathBuf, message: String },

    // Glob expansion errors
    #[error("failed to expand pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
