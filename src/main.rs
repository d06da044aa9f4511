//! Tufted - Markdown to Tufte CSS static site generator.

mod cli;
mod config;
mod convert;
mod dom;
mod logger;
mod pipeline;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_site, process::process_files};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Build { target, .. } => {
            let config = SiteConfig::load(&cli)?;
            build_site(&config, &config.target(*target))
        }
        Commands::Process { files } => process_files(files),
    }
}
