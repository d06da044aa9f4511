//! `[build]` section configuration.
//!
//! Contains source/output paths, the converter page template, asset
//! directories and optional include fragments.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "posts"                    # Markdown sources (relative to site root)
//! output = "output"                    # Generated site
//! template = "templates/tufte.html"    # Converter page template
//! assets = ["css", "fonts"]            # css/ → output/css/, fonts/ → output/fonts/
//! clean = true                         # Reset output directory before building
//!
//! [build.fragments]
//! header = "templates/header.html"     # Passed as -H
//! before_body = "templates/before.html"  # Passed as -B
//! after_body = "templates/after.html"    # Passed as -A
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Markdown source directory, mirrored into the output.
    pub content: PathBuf,

    /// Build output directory.
    pub output: PathBuf,

    /// Converter page template.
    pub template: Option<PathBuf>,

    /// Directories placed at `output/<name>` (copied or symlinked per target).
    pub assets: Vec<PathBuf>,

    /// Reset the output directory before building.
    pub clean: bool,

    /// Include fragments rendered before conversion.
    pub fragments: FragmentsConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "posts".into(),
            output: "output".into(),
            template: None,
            assets: vec![],
            clean: true,
            fragments: FragmentsConfig::default(),
        }
    }
}

/// `[build.fragments]`: templates rendered per build and handed to the
/// converter as header / before-body / after-body includes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    pub header: Option<PathBuf>,
    pub before_body: Option<PathBuf>,
    pub after_body: Option<PathBuf>,
}

/// Where a fragment is spliced into the converted page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentSlot {
    Header,
    BeforeBody,
    AfterBody,
}

impl FragmentSlot {
    /// Converter flag for this slot.
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Header => "-H",
            Self::BeforeBody => "-B",
            Self::AfterBody => "-A",
        }
    }

    /// Staging file name of the rendered fragment.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Header => "header.html",
            Self::BeforeBody => "before_body.html",
            Self::AfterBody => "after_body.html",
        }
    }

    const fn field(self) -> FieldPath {
        match self {
            Self::Header => FieldPath::new("build.fragments.header"),
            Self::BeforeBody => FieldPath::new("build.fragments.before_body"),
            Self::AfterBody => FieldPath::new("build.fragments.after_body"),
        }
    }
}

impl FragmentsConfig {
    /// Configured fragments, in converter argument order.
    pub fn iter(&self) -> impl Iterator<Item = (FragmentSlot, &Path)> {
        [
            (FragmentSlot::Header, &self.header),
            (FragmentSlot::BeforeBody, &self.before_body),
            (FragmentSlot::AfterBody, &self.after_body),
        ]
        .into_iter()
        .filter_map(|(slot, path)| Some((slot, path.as_deref()?)))
    }

    fn normalize(&mut self, root: &Path) {
        for path in [&mut self.header, &mut self.before_body, &mut self.after_body] {
            if let Some(p) = path.take() {
                *path = Some(normalize_path(&root.join(p)));
            }
        }
    }
}

impl BuildSectionConfig {
    pub const CONTENT: FieldPath = FieldPath::new("build.content");
    pub const TEMPLATE: FieldPath = FieldPath::new("build.template");
    pub const ASSETS: FieldPath = FieldPath::new("build.assets");

    /// Resolve every path against the site root.
    pub fn normalize(&mut self, root: &Path) {
        self.content = normalize_path(&root.join(&self.content));
        self.output = normalize_path(&root.join(&self.output));
        if let Some(template) = self.template.take() {
            self.template = Some(normalize_path(&root.join(template)));
        }
        self.assets = self
            .assets
            .iter()
            .map(|p| normalize_path(&root.join(p)))
            .collect();
        self.fragments.normalize(root);
    }

    /// Checks that need the paths as written, before normalization.
    pub fn validate_raw_paths(&self, diag: &mut ConfigDiagnostics) {
        for (i, asset) in self.assets.iter().enumerate() {
            if asset.is_absolute() {
                diag.error_with_hint(
                    Self::ASSETS,
                    format!("[{i}] '{}' is an absolute path", asset.display()),
                    "asset directories are relative to the site root",
                );
            }
        }
    }

    /// Validate normalized paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match &self.template {
            None => diag.error_with_hint(
                Self::TEMPLATE,
                "page template is required",
                "set build.template, e.g.: \"templates/tufte.html\"",
            ),
            Some(path) if !path.is_file() => diag.error(
                Self::TEMPLATE,
                format!("template '{}' not found", path.display()),
            ),
            Some(_) => {}
        }

        if !self.content.is_dir() {
            diag.error(
                Self::CONTENT,
                format!("'{}' is not a directory", self.content.display()),
            );
        }

        let mut seen: FxHashMap<&str, &Path> = FxHashMap::default();
        for (i, asset) in self.assets.iter().enumerate() {
            if !asset.is_dir() {
                diag.error(
                    Self::ASSETS,
                    format!("[{i}] directory '{}' not found", asset.display()),
                );
                continue;
            }
            let Some(name) = asset.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(prev) = seen.insert(name, asset) {
                diag.error(
                    Self::ASSETS,
                    format!(
                        "[{i}] output conflict: '{}' and '{}' both output to '/{name}'",
                        asset.display(),
                        prev.display()
                    ),
                );
            }
        }

        for (slot, path) in self.fragments.iter() {
            if !path.is_file() {
                diag.error(
                    slot.field(),
                    format!("fragment '{}' not found", path.display()),
                );
            }
        }
    }
}
