//! gvasp - VASP job configuration resolver

use anyhow::Result;
use clap::Parser;
use gvasp::cli::config::{ConfigCommand, run_reset, run_show};
use gvasp::cli::resolve::run_resolve;
use gvasp::cli::uvalue::run_uvalue;
use gvasp::cli::{Cli, Command};
use gvasp::config::{ConfigLoader, ConfigPaths, ConfigTier, DEFAULT_LOG_SUBDIR, Overrides};
use gvasp::logging::{LogTarget, init_logging};
use tracing::debug;

/// Load configuration with tier merging, then start logging into its `log_dir`.
fn load_config(cli: &Cli, paths: ConfigPaths, target: &LogTarget) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::load_with_paths(paths)?;
    loader.apply_overrides(&Overrides::from_env(), ConfigTier::Environment)?;
    loader.apply_overrides(&cli.overrides(), ConfigTier::CommandLine)?;

    init_logging(target, cli.verbose, &loader.config().log_dir)?;
    debug!(config_file = ?loader.config_path(), "configuration loaded");
    Ok(loader)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let target = LogTarget::parse(&cli.log);

    let mut paths = ConfigPaths::discover()?;
    if let Some(ref config_path) = cli.config {
        paths = paths.with_explicit_file(config_path);
    }

    let output = match cli.command {
        Command::Config(ref args) => match args.command {
            ConfigCommand::Show { format } => {
                let loader = load_config(&cli, paths, &target)?;
                run_show(&loader, format)?
            }
            // Skips loading so a broken config.json can be replaced
            ConfigCommand::Reset { ref path } => {
                let log_dir = cli
                    .log_dir
                    .clone()
                    .unwrap_or_else(|| paths.home.join(DEFAULT_LOG_SUBDIR));
                init_logging(&target, cli.verbose, &log_dir)?;
                run_reset(paths, path)?
            }
        },
        Command::Resolve(ref args) => {
            let loader = load_config(&cli, paths, &target)?;
            run_resolve(&loader, args)?
        }
        Command::Uvalue(ref args) => {
            let loader = load_config(&cli, paths, &target)?;
            run_uvalue(&loader, args)?
        }
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
