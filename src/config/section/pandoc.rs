//! `[pandoc]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [pandoc]
//! command = "pandoc"
//! args = ["--standalone", "-f", "markdown+smart", "-t", "html5", "--section-divs"]
//!
//! [pandoc.variables]
//! subtitle = "Dave Liepmann"
//! ```
//!
//! Pandoc 1.x spells smart punctuation as a flag; use
//! `args = ["--standalone", "--smart", "-t", "html5", "--section-divs"]` there.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arguments passed before the per-page ones.
pub const DEFAULT_ARGS: &[&str] = &[
    "--standalone",
    "-f",
    "markdown+smart",
    "-t",
    "html5",
    "--section-divs",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PandocConfig {
    /// Converter executable (name on `PATH` or a path).
    pub command: String,

    /// Leading arguments for every invocation.
    pub args: Vec<String>,

    /// Template variables, passed as `--variable key=value` (sorted by key).
    pub variables: BTreeMap<String, String>,
}

impl Default for PandocConfig {
    fn default() -> Self {
        Self {
            command: "pandoc".into(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            variables: BTreeMap::new(),
        }
    }
}

impl PandocConfig {
    pub const COMMAND: FieldPath = FieldPath::new("pandoc.command");
    pub const ARGS: FieldPath = FieldPath::new("pandoc.args");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.trim().is_empty() {
            diag.error_with_hint(
                Self::COMMAND,
                "converter command is empty",
                "set pandoc.command, e.g.: \"pandoc\"",
            );
        }

        if let Some(arg) = self.args.iter().find(|a| is_per_page_arg(a)) {
            diag.error(
                Self::ARGS,
                format!("'{arg}' is set per page and must not appear in pandoc.args"),
            );
        }
    }
}

/// Input, output and template are set by the build for each page.
fn is_per_page_arg(arg: &str) -> bool {
    matches!(arg, "-i" | "-o" | "--output" | "--template")
        || arg.starts_with("--template=")
        || arg.starts_with("--output=")
}
