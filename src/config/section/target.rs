//! `[target.dev]` / `[target.prod]` deployment profiles.
//!
//! A target selects the base URL templates see and how asset directories
//! reach the output: symlinked for fast local iteration, copied for
//! deployment.
//!
//! # Example
//!
//! ```toml
//! [target.dev]
//! base_url = "/"
//! assets = "symlink"
//!
//! [target.prod]
//! base_url = "https://example.com/"
//! assets = "copy"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Dev,
    Prod,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        })
    }
}

/// How asset directories are placed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetMode {
    Symlink,
    Copy,
}

/// One `[target.*]` table; both fields are required when the table is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Absolute URL (`https://…`) or root-relative path (`/blog/`).
    pub base_url: String,
    pub assets: AssetMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    pub dev: TargetConfig,
    pub prod: TargetConfig,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            dev: TargetConfig {
                base_url: "/".into(),
                assets: AssetMode::Symlink,
            },
            prod: TargetConfig {
                base_url: "/".into(),
                assets: AssetMode::Copy,
            },
        }
    }
}

impl TargetsConfig {
    pub const DEV_BASE_URL: FieldPath = FieldPath::new("target.dev.base_url");
    pub const PROD_BASE_URL: FieldPath = FieldPath::new("target.prod.base_url");

    pub fn get(&self, kind: TargetKind) -> &TargetConfig {
        match kind {
            TargetKind::Dev => &self.dev,
            TargetKind::Prod => &self.prod,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, target) in [
            (Self::DEV_BASE_URL, &self.dev),
            (Self::PROD_BASE_URL, &self.prod),
        ] {
            if let Err(reason) = check_base_url(&target.base_url) {
                diag.error_with_hint(
                    field,
                    reason,
                    "use an absolute URL like https://example.com/ or a path like /blog/",
                );
            }
        }
    }
}

/// Accepts root-relative paths and absolute http(s) URLs with a host.
fn check_base_url(base_url: &str) -> Result<(), String> {
    if base_url.starts_with('/') {
        return Ok(());
    }
    let parsed = url::Url::parse(base_url).map_err(|e| format!("invalid URL '{base_url}': {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "scheme '{}' not supported, must be http or https",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none() {
        return Err("URL must have a valid host".into());
    }
    Ok(())
}

// ============================================================================
// Resolved target
// ============================================================================

/// The profile a build runs with, passed explicitly to the build entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    pub base_url: String,
    pub assets: AssetMode,
}

impl Target {
    pub fn new(kind: TargetKind, config: &TargetConfig) -> Self {
        Self {
            kind,
            base_url: config.base_url.clone(),
            assets: config.assets,
        }
    }

    /// Base URL for asset references, always ending in `/`.
    pub fn assets_url(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_modes() {
        let config = test_parse_config("");
        assert_eq!(config.target.dev.assets, AssetMode::Symlink);
        assert_eq!(config.target.prod.assets, AssetMode::Copy);
    }

    #[test]
    fn test_target_resolution() {
        let config = test_parse_config(
            "[target.prod]\nbase_url = \"https://example.com/tufte\"\nassets = \"copy\"",
        );
        let target = config.target(TargetKind::Prod);
        assert_eq!(target.kind, TargetKind::Prod);
        assert_eq!(target.base_url, "https://example.com/tufte");
        assert_eq!(target.assets_url(), "https://example.com/tufte/");
        assert_eq!(config.target(TargetKind::Dev).base_url, "/");
    }

    #[test]
    fn test_base_url_checks() {
        assert!(check_base_url("/").is_ok());
        assert!(check_base_url("/blog/").is_ok());
        assert!(check_base_url("https://example.com/").is_ok());
        assert!(check_base_url("example.com").is_err());
        assert!(check_base_url("ftp://example.com/").is_err());
    }

    #[test]
    fn test_invalid_base_url_reported_per_target() {
        let config = test_parse_config(
            "[target.dev]\nbase_url = \"localhost\"\nassets = \"symlink\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.target.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, TargetsConfig::DEV_BASE_URL);
    }

    #[test]
    fn test_unknown_mode_fails_to_parse() {
        let result: Result<crate::config::SiteConfig, _> =
            toml::from_str("[target.dev]\nbase_url = \"/\"\nassets = \"hardlink\"");
        assert!(result.is_err());
    }
}
