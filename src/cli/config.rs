//! Config subcommand for gvasp CLI
//!
//! Shows the effective global configuration or replaces it from a file.

use crate::config::{ConfigLoader, ConfigPaths};
use crate::format::{OutputFormat, config_json, format_config_text, to_json_pretty};
use crate::resolver::FsListing;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Arguments for the config subcommand
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration and default template status
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Replace the user configuration with a config.json file
    Reset {
        /// config.json to validate and install
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

/// Render the effective configuration.
pub fn run_show(loader: &ConfigLoader, format: OutputFormat) -> Result<String> {
    let defaults = loader.defaults().status(&FsListing);
    match format {
        OutputFormat::Text => Ok(format_config_text(loader, &defaults)),
        OutputFormat::Json => {
            let view = config_json(loader, &defaults);
            to_json_pretty(&view).context("failed to serialize configuration")
        }
    }
}

/// Validate `source` and install it as the user configuration.
pub fn run_reset(paths: ConfigPaths, source: &Path) -> Result<String> {
    let user_file = paths.user_file();
    let loader = ConfigLoader::reset_from(paths, source)
        .with_context(|| format!("failed to reset configuration from {}", source.display()))?;

    let mut out = format!("Configuration written to {}\n\n", user_file.display());
    out.push_str(&run_show(&loader, OutputFormat::Text)?);
    Ok(out)
}
