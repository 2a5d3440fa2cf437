//! Command implementations for the cbuild CLI.
//!
//! - [`build`] - build targets from the task file
//! - [`check`] - validate the task file
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod build;
pub mod check;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
