//! Command-line interface module.

mod args;
pub mod build;
pub mod process;

pub use args::{Cli, Commands};
