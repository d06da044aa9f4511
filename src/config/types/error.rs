//! Errors raised while loading `tufted.toml`.
//!
//! Reading and parsing fail immediately. Validation instead collects every
//! problem into [`ConfigDiagnostics`] so one run reports them all:
//!
//! ```text
//! invalid tufted.toml (2 problems)
//!   build.template  required
//!                   hint: set build.template = "templates/tufte.html"
//!   pandoc.command  converter command is empty
//! ```

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file `{}` not found in this directory or any parent", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // no #[from]: a source() would print the report twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One problem with one field.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Problems collected across all sections.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics(Vec<Diagnostic>);

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.0.push(Diagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    /// Non-fatal; printed by [`Self::print_warnings`].
    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    fn of(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.severity == severity)
    }

    pub fn print_warnings(&self) {
        for d in self.of(Severity::Warning) {
            crate::log!("warning"; "{}: {}", d.field.as_str(), d.message);
        }
    }

    /// `Err` with the whole report once any error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        let has_error = self.of(Severity::Error).next().is_some();
        if has_error { Err(self) } else { Ok(()) }
    }

    #[cfg(test)]
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.of(Severity::Error).collect()
    }

    #[cfg(test)]
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.of(Severity::Warning).collect()
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.of(Severity::Error).count();
        let width = self
            .of(Severity::Error)
            .map(|d| d.field.as_str().len())
            .max()
            .unwrap_or(0);

        let noun = if count == 1 { "problem" } else { "problems" };
        write!(f, "{} ({count} {noun})", "invalid tufted.toml".red().bold())?;
        for d in self.of(Severity::Error) {
            write!(f, "\n  {:<width$}  {}", d.field.as_str().cyan(), d.message)?;
            if let Some(hint) = &d.hint {
                write!(f, "\n  {:<width$}  {} {hint}", "", "hint:".yellow())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::exec::strip_ansi;

    #[test]
    fn test_report_lists_every_error() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("build.template"), "required");
        diag.error_with_hint(
            FieldPath::new("pandoc.command"),
            "converter command is empty",
            "use \"pandoc\"",
        );
        diag.warn(FieldPath::new("site.title"), "empty title");

        assert_eq!(diag.errors().len(), 2);
        assert_eq!(diag.warnings().len(), 1);

        let report = diag.into_result().unwrap_err().to_string();
        assert_eq!(
            strip_ansi(&report),
            concat!(
                "invalid tufted.toml (2 problems)\n",
                "  build.template  required\n",
                "  pandoc.command  converter command is empty\n",
                "                  hint: use \"pandoc\"",
            )
        );
    }

    #[test]
    fn test_warnings_alone_are_ok() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("site.title"), "empty title");
        assert!(diag.errors().is_empty());
        assert!(diag.into_result().is_ok());
    }

    #[test]
    fn test_not_found_names_file() {
        let err = ConfigError::NotFound(PathBuf::from("tufted.toml"));
        assert!(err.to_string().contains("`tufted.toml` not found"));
    }
}
