//! Resolve subcommand for gvasp CLI
//!
//! Prints the INCAR, UValue and submit template active for a directory.

use crate::config::ConfigLoader;
use crate::format::{OutputFormat, format_templates_text, to_json_pretty};
use crate::resolver::{ConfigResolver, working_dir};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the resolve subcommand
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Working directory (default: current directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run_resolve(loader: &ConfigLoader, args: &ResolveArgs) -> Result<String> {
    let dir = working_dir(args.dir.as_deref())?;
    let resolver = ConfigResolver::new(loader.defaults());
    let templates = resolver.resolve(&dir)?;

    match args.format {
        OutputFormat::Text => Ok(format_templates_text(&templates)),
        OutputFormat::Json => {
            to_json_pretty(&templates).context("failed to serialize resolved templates")
        }
    }
}
