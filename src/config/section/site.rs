//! `[site]` section configuration.
//!
//! Site metadata exposed to fragment templates as `site.*`, plus free-form
//! `[site.extra]` entries exposed as `extra.*`.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Tufte CSS"
//! author = "Dave Liepmann"
//! description = "Notes in the margin"
//!
//! [site.extra]
//! license = "MIT"
//! year = 2024
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Site description.
    pub description: String,

    /// Custom values, available to templates as `{{ extra.<key> }}`.
    pub extra: FxHashMap<String, toml::Value>,
}

impl SiteSectionConfig {
    pub const TITLE: FieldPath = FieldPath::new("site.title");
    pub const EXTRA: FieldPath = FieldPath::new("site.extra");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.warn(Self::TITLE, "site title is empty");
        }
        for (key, value) in &self.extra {
            if extra_to_string(value).is_none() {
                diag.error_with_hint(
                    Self::EXTRA,
                    format!("'{key}' is not a plain value"),
                    "use a string, number, boolean or date",
                );
            }
        }
    }

    /// `[site.extra]` entries rendered as template strings.
    pub fn extra_strings(&self) -> impl Iterator<Item = (&str, String)> {
        self.extra
            .iter()
            .filter_map(|(k, v)| Some((k.as_str(), extra_to_string(v)?)))
    }
}

/// Scalar TOML values as template text; tables and arrays have none.
fn extra_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_extra_scalars() {
        let config = test_parse_config("[site.extra]\nlicense = \"MIT\"\nyear = 2024\ndraft = false");
        let mut extra: Vec<_> = config.site.extra_strings().collect();
        extra.sort();
        assert_eq!(
            extra,
            vec![
                ("draft", "false".to_string()),
                ("license", "MIT".to_string()),
                ("year", "2024".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_extra_rejected() {
        let config = test_parse_config("[site.extra]\nlinks = [\"a\", \"b\"]");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }

    #[test]
    fn test_empty_title_warns() {
        let config: crate::config::SiteConfig = toml::from_str("").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.errors().is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
