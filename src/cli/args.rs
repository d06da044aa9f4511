//! Command-line interface definitions.

use crate::config::TargetKind;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Markdown to Tufte CSS site generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tufted.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "tufted.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild the whole site
    #[command(visible_alias = "b")]
    Build {
        /// Deployment target
        #[arg(short, long, value_enum, default_value_t = TargetKind::Prod)]
        target: TargetKind,

        /// Clean output directory completely before building
        #[arg(short, long)]
        clean: bool,

        /// Output directory path (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Run the Tufte rewrite passes on converted HTML files in place
    #[command(visible_alias = "p")]
    Process {
        /// HTML files produced by the converter
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
}
