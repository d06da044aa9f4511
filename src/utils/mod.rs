//! Utility modules.
//!
//! - [`exec`]: external command builder
//! - [`fs`]: directory reset, copy and symlink helpers
//! - [`path`]: path normalization and source → output mapping
//! - [`plural`]: count formatting for log lines

pub mod exec;
pub mod fs;
pub mod path;
mod plural;

pub use plural::plural_count;
