//! Build artifacts and how they reach the output directory.

pub mod writer;

use std::path::PathBuf;

/// CommonJS-style `require` runtime prepended to every JS artifact.
pub const LOADER_SHIM: &str = include_str!("../../runtime/require.js");

/// Text produced by one run of the builder.
///
/// `None` means the selected build operation does not produce that artifact
/// (a styles-only build has no JS), which is different from an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub css: Option<String>,
    pub js: Option<String>,
}

/// A file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

impl WrittenFile {
    /// Size rounded down to whole kilobytes.
    pub fn kilobytes(&self) -> u64 {
        self.size / 1024
    }
}
