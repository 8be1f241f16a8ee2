//! Configuration types and structures.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the global configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Subdirectory of the home directory used for logs by default.
pub const DEFAULT_LOG_SUBDIR: &str = "logs";

/// External job scheduler that receives submit scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    #[default]
    Slurm,
}

impl Scheduler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheduler::Slurm => "slurm",
        }
    }

    /// Name of the default submit template inside `config_dir`.
    pub fn template_name(&self) -> &'static str {
        match self {
            Scheduler::Slurm => "submit.slurm",
        }
    }
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pseudopotential family used when assembling POTCAR files downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Potential {
    #[serde(rename = "PAW_LDA")]
    PawLda,
    #[default]
    #[serde(rename = "PAW_PBE")]
    PawPbe,
    #[serde(rename = "PAW_PW91")]
    PawPw91,
    #[serde(rename = "USPP_LDA")]
    UsppLda,
    #[serde(rename = "USPP_PW91")]
    UsppPw91,
}

impl Potential {
    pub fn as_str(&self) -> &'static str {
        match self {
            Potential::PawLda => "PAW_LDA",
            Potential::PawPbe => "PAW_PBE",
            Potential::PawPw91 => "PAW_PW91",
            Potential::UsppLda => "USPP_LDA",
            Potential::UsppPw91 => "USPP_PW91",
        }
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global configuration, read once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory holding the default templates (INCAR, UValue.yaml, pot/).
    pub config_dir: PathBuf,

    /// Scheduler that submit templates target.
    pub scheduler: Scheduler,

    /// Directory for log files.
    pub log_dir: PathBuf,

    /// Pseudopotential family (default: PAW_PBE).
    #[serde(default)]
    pub potential: Potential,
}

impl GlobalConfig {
    /// Built-in defaults rooted at the gvasp home directory.
    pub fn rooted_at(home: &Path) -> Self {
        Self {
            config_dir: home.to_path_buf(),
            scheduler: Scheduler::default(),
            log_dir: home.join(DEFAULT_LOG_SUBDIR),
            potential: Potential::default(),
        }
    }

    /// Load configuration from a JSON file without tier merging.
    ///
    /// Every required key must be present. Use `ConfigLoader` to layer a
    /// partial file over the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::malformed_config(path, e))
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::write(parent, e))?;
        }
        let mut content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::malformed_config(path, e))?;
        content.push('\n');
        std::fs::write(path, content).map_err(|e| ConfigError::write(path, e))
    }
}
