//! CLI command definitions for gvasp.
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod config;
pub mod resolve;
pub mod uvalue;

use clap::{Parser, Subcommand};
use config::ConfigArgs;
use resolve::ResolveArgs;
use std::path::PathBuf;
use uvalue::UValueArgs;

use crate::config::Overrides;

/// VASP job configuration resolver
#[derive(Parser, Debug)]
#[command(name = "gvasp", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: ~/.gvasp/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Template directory holding INCAR, UValue.yaml and pot/ (overrides config)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Path to log directory (overrides config)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), dir, or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Command-line tier overrides.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_dir: self.config_dir.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or reset the global configuration
    Config(ConfigArgs),

    /// Show the template of each kind active for a directory
    Resolve(ResolveArgs),

    /// Show +U parameters from the active UValue template
    Uvalue(UValueArgs),
}
