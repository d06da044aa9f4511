//! Configuration section definitions.
//!
//! Each module corresponds to a section in `tufted.toml`:
//!
//! | Module   | TOML Section                 | Purpose                          |
//! |----------|------------------------------|----------------------------------|
//! | `build`  | `[build]`                    | Paths, template, assets, fragments |
//! | `pandoc` | `[pandoc]`                   | Converter command and arguments  |
//! | `site`   | `[site]`                     | Site metadata for templates      |
//! | `target` | `[target.dev]`/`[target.prod]` | Base URL and asset placement   |

mod build;
mod pandoc;
mod site;
mod target;

pub use build::{BuildSectionConfig, FragmentSlot};
pub use pandoc::PandocConfig;
pub use site::SiteSectionConfig;
pub use target::{AssetMode, Target, TargetKind, TargetsConfig};
