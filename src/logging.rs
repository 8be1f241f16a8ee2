//! Logging setup for the `gvasp` binary.
//!
//! The `--log` flag picks the sink; `--verbose` lowers the level to debug.
//! When `GVASP_LOG` is set it is used as an `EnvFilter` directive instead.

use chrono::Local;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding an `EnvFilter` directive.
pub const ENV_LOG_FILTER: &str = "GVASP_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    /// Dated file inside the configured log directory
    LogDir,
    File(PathBuf),
}

impl LogTarget {
    /// Parse a `--log` value: `0|off`, `1|stdout`, `2|stderr`, `dir`, or a filename.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            "dir" => LogTarget::LogDir,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }

    /// File this target writes to, if any.
    pub fn file_path(&self, log_dir: &Path) -> Option<PathBuf> {
        match self {
            LogTarget::LogDir => Some(dated_log_file(log_dir)),
            LogTarget::File(path) => Some(path.clone()),
            _ => None,
        }
    }
}

/// `<log_dir>/gvasp-YYYYMMDD.log` for today.
pub fn dated_log_file(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("gvasp-{}.log", Local::now().format("%Y%m%d")))
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber.
pub fn init_logging(target: &LogTarget, verbose: bool, log_dir: &Path) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::LogDir | LogTarget::File(_) => {
            let Some(path) = target.file_path(log_dir) else {
                return Ok(());
            };
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            // Append so repeated runs share one file
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
