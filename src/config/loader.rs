//! Configuration loader with tier-based merging.
//!
//! Loads `config.json` over the built-in defaults and applies environment and
//! command-line overrides on top.

use super::defaults::DefaultTemplates;
use super::merge::deep_merge_all;
use super::types::{CONFIG_FILE_NAME, GlobalConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{absolutize, current_dir, resolve_config_path};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG_PATH: &str = "GVASP_CONFIG_PATH";
/// Environment variable overriding the gvasp home directory.
pub const ENV_HOME: &str = "GVASP_HOME";
/// Environment variable overriding `config_dir`.
pub const ENV_CONFIG_DIR: &str = "GVASP_CONFIG_DIR";
/// Environment variable overriding `log_dir`.
pub const ENV_LOG_DIR: &str = "GVASP_LOG_DIR";

/// Fields of `config.json`.
const FIELDS: [&str; 4] = ["config_dir", "scheduler", "log_dir", "potential"];

/// Fields whose values are paths and get anchored at the config file's directory.
const PATH_KEYS: [&str; 2] = ["config_dir", "log_dir"];

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// `config.json`
    File = 1,
    /// Environment variables
    Environment = 2,
    /// Command-line flags (highest priority)
    CommandLine = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::File => write!(f, "file"),
            ConfigTier::Environment => write!(f, "environment"),
            ConfigTier::CommandLine => write!(f, "command line"),
        }
    }
}

/// Where configuration files live.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// gvasp home directory (default: `~/.gvasp`)
    pub home: PathBuf,
    /// Explicit config file; must exist when set
    pub explicit_file: Option<PathBuf>,
    /// User's home directory, for `~` expansion
    pub user_home: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    ///
    /// A relative `GVASP_HOME` is anchored at the working directory.
    pub fn discover() -> ConfigResult<Self> {
        let user_home = dirs::home_dir();

        // Home: GVASP_HOME or ~/.gvasp
        let home = std::env::var(ENV_HOME)
            .ok()
            .map(PathBuf::from)
            .or_else(|| user_home.as_ref().map(|h| h.join(".gvasp")))
            .unwrap_or_else(|| PathBuf::from(".gvasp"));

        let explicit_file = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);

        Ok(Self {
            home: absolutize(&home, &current_dir()?),
            explicit_file,
            user_home,
        })
    }

    /// Create paths with an explicit home and no explicit file.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            explicit_file: None,
            user_home: dirs::home_dir(),
        }
    }

    /// Use `path` as the config file instead of the user file.
    pub fn with_explicit_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// The persistent user config file (`<home>/config.json`).
    pub fn user_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILE_NAME)
    }
}

/// Overrides applied above the file tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub config_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Overrides {
    /// Read `GVASP_CONFIG_DIR` and `GVASP_LOG_DIR`.
    pub fn from_env() -> Self {
        Self {
            config_dir: std::env::var(ENV_CONFIG_DIR).ok().map(PathBuf::from),
            log_dir: std::env::var(ENV_LOG_DIR).ok().map(PathBuf::from),
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths used for discovery
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: GlobalConfig,
    /// Path to the config file that was used (if any)
    config_path: Option<PathBuf>,
    /// Tier that supplied each field
    sources: BTreeMap<&'static str, ConfigTier>,
}

impl ConfigLoader {
    /// Load defaults and the config file for explicit paths.
    ///
    /// An explicit file must exist. A missing user file means defaults only.
    pub fn load_with_paths(paths: ConfigPaths) -> ConfigResult<Self> {
        let defaults = GlobalConfig::rooted_at(&paths.home);
        let mut tiers = vec![
            serde_json::to_value(&defaults)
                .map_err(|e| ConfigError::malformed_config(&paths.home, e))?,
        ];

        let mut sources: BTreeMap<&'static str, ConfigTier> = FIELDS
            .into_iter()
            .map(|field| (field, ConfigTier::Defaults))
            .collect();

        let file = match paths.explicit_file {
            Some(ref explicit) => Some(absolutize(explicit, &current_dir()?)),
            None => {
                let user_file = paths.user_file();
                user_file.is_file().then_some(user_file)
            }
        };

        let config_path = match file {
            Some(path) => {
                let value = read_config_file(&path, paths.user_home.as_deref())?;
                if let Value::Object(ref map) = value {
                    for field in FIELDS {
                        if map.get(field).is_some_and(|v| !v.is_null()) {
                            sources.insert(field, ConfigTier::File);
                        }
                    }
                }
                tiers.push(value);
                debug!(path = %path.display(), "loaded config file");
                Some(path)
            }
            None => {
                debug!(home = %paths.home.display(), "no config file found; using defaults");
                None
            }
        };

        let merged = deep_merge_all(tiers);
        let error_path = config_path.clone().unwrap_or_else(|| paths.user_file());
        let config: GlobalConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::malformed_config(&error_path, e))?;

        Ok(Self {
            paths,
            config,
            config_path,
            sources,
        })
    }

    /// Replace the persistent user config with the file at `source`.
    ///
    /// The source is merged over the defaults and its `config_dir` must hold
    /// the mandatory default templates. The normalized result is written to
    /// the user file and returned as a loader reading from it.
    pub fn reset_from(paths: ConfigPaths, source: &Path) -> ConfigResult<Self> {
        let staged = Self::load_with_paths(paths.clone().with_explicit_file(source))?;
        DefaultTemplates::from_config(staged.config()).verify_on_disk()?;

        let user_file = paths.user_file();
        staged.config.save(&user_file)?;
        info!(
            source = %source.display(),
            target = %user_file.display(),
            "configuration reset"
        );

        let mut persisted = paths;
        persisted.explicit_file = None;
        Self::load_with_paths(persisted)
    }

    /// Apply overrides above the file tier.
    pub fn apply_overrides(
        &mut self,
        overrides: &Overrides,
        tier: ConfigTier,
    ) -> ConfigResult<()> {
        let base = current_dir()?;
        if let Some(ref config_dir) = overrides.config_dir {
            self.config.config_dir = absolutize(config_dir, &base);
            self.sources.insert("config_dir", tier);
        }
        if let Some(ref log_dir) = overrides.log_dir {
            self.config.log_dir = absolutize(log_dir, &base);
            self.sources.insert("log_dir", tier);
        }
        Ok(())
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> GlobalConfig {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Tier that supplied `field`, if it is a known field.
    pub fn source_of(&self, field: &str) -> Option<ConfigTier> {
        self.sources.get(field).copied()
    }

    /// All fields with the tier that supplied them.
    pub fn sources(&self) -> &BTreeMap<&'static str, ConfigTier> {
        &self.sources
    }

    /// Default templates for the loaded configuration.
    pub fn defaults(&self) -> DefaultTemplates {
        DefaultTemplates::from_config(&self.config)
    }
}

/// Read a config file into a JSON object with path values anchored at the
/// file's directory.
fn read_config_file(path: &Path, user_home: Option<&Path>) -> ConfigResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
    let mut value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::malformed_config(path, e))?;

    let Value::Object(ref mut map) = value else {
        let err = <serde_json::Error as serde::de::Error>::custom("expected a JSON object");
        return Err(ConfigError::malformed_config(path, err));
    };

    // Checked before merging, which would drop unknown keys set to null
    if let Some(key) = map.keys().find(|key| !FIELDS.contains(&key.as_str())) {
        let err = <serde_json::Error as serde::de::Error>::unknown_field(key, &FIELDS);
        return Err(ConfigError::malformed_config(path, err));
    }

    let file_dir = path.parent().unwrap_or_else(|| Path::new("/"));
    for key in PATH_KEYS {
        if let Some(Value::String(raw)) = map.get(key) {
            let resolved = resolve_config_path(Path::new(raw), file_dir, user_home);
            map.insert(
                key.to_string(),
                Value::String(resolved.to_string_lossy().into_owned()),
            );
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Potential, Scheduler};
    use tempfile::TempDir;

    fn paths_in(temp: &TempDir) -> ConfigPaths {
        ConfigPaths::with_home(temp.path().join("home"))
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::load_with_paths(paths_in(&temp)).unwrap();
        let config = loader.config();

        assert_eq!(config.config_dir, temp.path().join("home"));
        assert_eq!(config.log_dir, temp.path().join("home").join("logs"));
        assert_eq!(config.scheduler, Scheduler::Slurm);
        assert!(loader.config_path().is_none());
        assert_eq!(loader.source_of("config_dir"), Some(ConfigTier::Defaults));
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        std::fs::create_dir_all(&paths.home).unwrap();
        std::fs::write(
            paths.user_file(),
            r#"{ "config_dir": "/opt/vasp-templates", "potential": "USPP_LDA" }"#,
        )
        .unwrap();

        let loader = ConfigLoader::load_with_paths(paths.clone()).unwrap();
        let config = loader.config();

        assert_eq!(config.config_dir, PathBuf::from("/opt/vasp-templates"));
        assert_eq!(config.potential, Potential::UsppLda);
        // log_dir should be default
        assert_eq!(config.log_dir, paths.home.join("logs"));
        assert_eq!(loader.config_path(), Some(paths.user_file().as_path()));
        assert_eq!(loader.source_of("config_dir"), Some(ConfigTier::File));
        assert_eq!(loader.source_of("log_dir"), Some(ConfigTier::Defaults));
    }

    #[test]
    fn test_relative_paths_anchor_at_file_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("site").join("config.json");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, r#"{ "config_dir": "templates", "log_dir": "../logs" }"#).unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let config = ConfigLoader::load_with_paths(paths).unwrap().into_config();

        assert_eq!(config.config_dir, temp.path().join("site").join("templates"));
        assert_eq!(config.log_dir, temp.path().join("logs"));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp).with_explicit_file(temp.path().join("missing.json"));
        let err = ConfigLoader::load_with_paths(paths).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, "{ \"scheduler\": slurm }").unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let err = ConfigLoader::load_with_paths(paths).unwrap_err();
        match err {
            ConfigError::MalformedConfig { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_file_is_malformed() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, "[1, 2, 3]").unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let err = ConfigLoader::load_with_paths(paths).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedConfig { .. }));
    }

    #[test]
    fn test_unsupported_scheduler_is_malformed() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, r#"{ "scheduler": "pbs" }"#).unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let err = ConfigLoader::load_with_paths(paths).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedConfig { .. }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, r#"{ "log_dir": "/var/log/gvasp" }"#).unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let mut loader = ConfigLoader::load_with_paths(paths).unwrap();
        loader.apply_overrides(
            &Overrides {
                config_dir: None,
                log_dir: Some(PathBuf::from("/scratch/logs")),
            },
            ConfigTier::CommandLine,
        )
        .unwrap();

        assert_eq!(loader.config().log_dir, PathBuf::from("/scratch/logs"));
        assert_eq!(loader.source_of("log_dir"), Some(ConfigTier::CommandLine));
        assert_eq!(loader.source_of("config_dir"), Some(ConfigTier::Defaults));
    }

    #[test]
    fn test_unknown_key_with_null_value_is_malformed() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, r#"{ "config_dri": null }"#).unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let err = ConfigLoader::load_with_paths(paths).unwrap_err();
        match err {
            ConfigError::MalformedConfig { ref path, .. } => assert_eq!(path, &file),
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("config_dri"));
    }

    #[test]
    fn test_known_key_with_null_value_keeps_default() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, r#"{ "log_dir": null, "scheduler": "slurm" }"#).unwrap();

        let paths = paths_in(&temp).with_explicit_file(&file);
        let loader = ConfigLoader::load_with_paths(paths.clone()).unwrap();
        assert_eq!(loader.config().log_dir, paths.home.join("logs"));
        assert_eq!(loader.source_of("log_dir"), Some(ConfigTier::Defaults));
        assert_eq!(loader.source_of("scheduler"), Some(ConfigTier::File));
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ConfigTier::Defaults < ConfigTier::File);
        assert!(ConfigTier::File < ConfigTier::Environment);
        assert!(ConfigTier::Environment < ConfigTier::CommandLine);
    }
}
