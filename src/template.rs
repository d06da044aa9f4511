//! Fragment templates: `{{ key }}` substitution from a flat string context.
//!
//! ```text
//! <link rel="stylesheet" href="{{ assets_url }}css/tufte.css">
//! <meta name="author" content="{{ site.author }}">
//! ```
//!
//! Every placeholder must resolve; an unknown key fails the render instead of
//! leaving a hole in the page.

use crate::config::{SiteConfig, Target};
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

/// `{{ key }}`, whitespace inside the braces ignored.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("valid placeholder pattern")
});

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template variable `{key}` in {}", .path.display())]
    UnknownVariable { key: String, path: PathBuf },

    #[error("failed to read template `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

// ============================================================================
// Context
// ============================================================================

/// Values visible to fragment templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: FxHashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard context for a build: site metadata, target and `extra.*`.
    pub fn for_build(config: &SiteConfig, target: &Target) -> Self {
        let mut ctx = Self::new()
            .with("site.title", &config.site.title)
            .with("site.author", &config.site.author)
            .with("site.description", &config.site.description)
            .with("target", target.kind.to_string())
            .with("base_url", &target.base_url)
            .with("assets_url", target.assets_url());
        for (key, value) in config.site.extra_strings() {
            ctx.insert(format!("extra.{key}"), value);
        }
        ctx
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

// ============================================================================
// Template
// ============================================================================

/// A fragment template loaded from disk.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    source: String,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source =
            fs::read_to_string(path).map_err(|e| TemplateError::Io(path.to_path_buf(), e))?;
        Ok(Self::from_source(path, source))
    }

    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Substitute every placeholder, failing on the first unknown key.
    pub fn render(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        if let Some(caps) = PLACEHOLDER
            .captures_iter(&self.source)
            .find(|caps| ctx.get(&caps[1]).is_none())
        {
            return Err(TemplateError::UnknownVariable {
                key: caps[1].to_string(),
                path: self.path.clone(),
            });
        }

        let rendered = PLACEHOLDER.replace_all(&self.source, |caps: &Captures| {
            ctx.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}
