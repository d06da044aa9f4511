//! Markdown → HTML through the external converter (pandoc).
//!
//! ```text
//! <command> <args...> -i <page.md> -o <page.html> --template=<template>
//!           [--variable k=v]... [-H header] [-B before] [-A after]
//! ```
//!
//! A non-zero exit is reported as a diagnostic, not an error: pandoc exits
//! non-zero for recoverable problems and still writes its output. The page
//! only fails when no output was produced.

use crate::{
    config::{FragmentSlot, SiteConfig, Target},
    debug, log,
    utils::exec::{Cmd, FilterRule, format_error},
};
use anyhow::{Context, Result, bail};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Known-harmless converter chatter.
pub static PANDOC_FILTER: FilterRule =
    FilterRule::new(&["[WARNING] This document format requires a nonempty <title>"]);

/// Converter invocation shared by every page of a build.
#[derive(Debug, Clone)]
pub struct Converter {
    program: PathBuf,
    args: Vec<String>,
    template: PathBuf,
    variables: Vec<(String, String)>,
    includes: Vec<(FragmentSlot, PathBuf)>,
    cwd: PathBuf,
}

impl Converter {
    /// Resolve the converter binary on `PATH` and collect the fixed arguments.
    pub fn new(config: &SiteConfig, target: &Target) -> Result<Self> {
        let command = &config.pandoc.command;
        let program = which::which(command).with_context(|| {
            format!("converter `{command}` not found, install pandoc or set pandoc.command")
        })?;
        debug!("convert"; "using {}", program.display());

        let template = config
            .build
            .template
            .clone()
            .context("build.template is not set")?;

        let mut variables: Vec<_> = config
            .pandoc
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !config.pandoc.variables.contains_key("base_url") {
            variables.push(("base_url".into(), target.base_url.clone()));
        }

        Ok(Self {
            program,
            args: config.pandoc.args.clone(),
            template,
            variables,
            includes: Vec::new(),
            cwd: config.get_root().to_path_buf(),
        })
    }

    /// Add a rendered include fragment.
    pub fn include(mut self, slot: FragmentSlot, path: PathBuf) -> Self {
        self.includes.push((slot, path));
        self
    }

    /// Full argument list for one page.
    pub fn args_for(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push("-i".into());
        args.push(input.into());
        args.push("-o".into());
        args.push(output.into());

        let mut template = OsString::from("--template=");
        template.push(&self.template);
        args.push(template);

        for (key, value) in &self.variables {
            args.push("--variable".into());
            args.push(format!("{key}={value}").into());
        }
        for (slot, path) in &self.includes {
            args.push(slot.flag().into());
            args.push(path.into());
        }
        args
    }

    /// Convert `input` into `output`.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let result = Cmd::new(&self.program)
            .args(self.args_for(input, output))
            .cwd(&self.cwd)
            .filter(&PANDOC_FILTER)
            .output()?;

        if !result.status.success() {
            let name = self.program.file_name().unwrap_or(self.program.as_os_str());
            log!("convert"; "{}: {}", input.display(), format_error(&name.to_string_lossy(), &result, &PANDOC_FILTER));
        }
        if !output.is_file() {
            bail!("converter produced no output for {}", input.display());
        }
        Ok(())
    }
}
