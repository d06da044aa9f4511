//! Site configuration management for `tufted.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build], [build.fragments]
//! │   ├── pandoc     # [pandoc]
//! │   ├── site       # [site], [site.extra]
//! │   └── target     # [target.dev], [target.prod]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Loading order: find file → parse (unknown fields warned) → raw path
//! checks → CLI overrides → resolve paths against the config's directory →
//! full validation. All validation problems are reported together.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    AssetMode, BuildSectionConfig, FragmentSlot, PandocConfig, SiteSectionConfig, Target,
    TargetKind, TargetsConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    log,
    utils::path::normalize_path,
};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tufted.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Converter settings
    #[serde(default)]
    pub pandoc: PandocConfig,

    /// Deployment targets
    #[serde(default)]
    pub target: TargetsConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(ConfigError::NotFound(cli.config.clone()));
        };

        let mut config = Self::from_path(&config_path)?;

        // Validate raw paths before normalization
        config.validate_paths()?;

        config.apply_command_options(cli);
        config.finalize(&config_path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set the root and resolve every configured path against it.
    fn finalize(&mut self, config_path: &Path) {
        self.config_path = normalize_path(config_path);
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.build.normalize(&root);
        self.root = root;
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Resolve the deployment profile a build runs with.
    pub fn target(&self, kind: TargetKind) -> Target {
        Target::new(kind, self.target.get(kind))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Build { clean, output, .. } = &cli.command {
            Self::update_option(&mut self.build.output, output.as_ref());
            if *clean {
                self.build.clean = true;
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// Normalization turns every path absolute, after which a user-written
    /// absolute path can no longer be told apart.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate_raw_paths(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration, collecting all errors and returning them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        self.pandoc.validate(&mut diag);
        self.target.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("{extra}\n[site]\ntitle = \"Test\"\n");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    /// Minimal valid site on disk.
    fn site(toml: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/tufte.html"), "$body$").unwrap();
        fs::write(dir.path().join("tufted.toml"), toml).unwrap();
        dir
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tufted").chain(args.iter().copied()))
    }

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result = SiteConfig::parse_with_ignored("[base\ntitle = \"My Blog\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.site.title, "");
        assert_eq!(config.pandoc.command, "pandoc");
        assert_eq!(config.target.dev.assets, AssetMode::Symlink);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\ntitle = \"Test\"\nsubtitle = \"x\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.site.title, "Test");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
        assert!(ignored.iter().any(|f| f.contains("subtitle")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[site]\ntitle = \"Test\"\n[build]\ntemplate = \"t.html\"";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_finalize_resolves_against_config_dir() {
        let dir = site("[build]\ntemplate = \"templates/tufte.html\"\nassets = [\"css\"]");
        let mut config = SiteConfig::from_path(&dir.path().join("tufted.toml")).unwrap();
        config.finalize(&dir.path().join("tufted.toml"));

        let root = normalize_path(dir.path());
        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.content, root.join("posts"));
        assert_eq!(config.build.assets, vec![root.join("css")]);
        assert_eq!(config.root_relative(root.join("posts/a.md")), PathBuf::from("posts/a.md"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_applies_cli_overrides() {
        let dir = site("[build]\ntemplate = \"templates/tufte.html\"\nclean = false");
        let config_path = dir.path().join("tufted.toml");
        let config_arg = config_path.to_string_lossy().to_string();

        let config = SiteConfig::load(&cli(&[
            "-C", &config_arg, "build", "--clean", "-o", "public",
        ]))
        .unwrap();
        assert!(config.build.clean);
        assert_eq!(config.build.output, normalize_path(dir.path()).join("public"));
    }

    #[test]
    fn test_load_reports_all_problems() {
        let dir = site("[build]\ncontent = \"nope\"\n[pandoc]\ncommand = \"\"");
        let config_arg = dir.path().join("tufted.toml").to_string_lossy().to_string();

        let err = SiteConfig::load(&cli(&["-C", &config_arg, "build"])).unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:#}");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["build.template", "build.content", "pandoc.command"]);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let config_arg = dir.path().join("tufted.toml").to_string_lossy().to_string();
        let err = SiteConfig::load(&cli(&["-C", &config_arg, "build"])).unwrap_err();
        assert!(format!("{err}").contains("not found"));
    }

    #[test]
    fn test_target_lookup() {
        let config = test_parse_config("[target.dev]\nbase_url = \"/preview/\"\nassets = \"copy\"");
        let target = config.target(TargetKind::Dev);
        assert_eq!(target.base_url, "/preview/");
        assert_eq!(target.assets, AssetMode::Copy);
    }
}
