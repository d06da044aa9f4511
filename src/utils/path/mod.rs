//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`)
//! - [`route`]: Source to output mapping (`page_output_path`, `mirror_path`)

pub mod fs;
pub mod route;

pub use fs::normalize_path;
pub use route::{is_markdown, mirror_path, page_output_path};
