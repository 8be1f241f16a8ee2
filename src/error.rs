//! Structured error types for configuration and template resolution.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Global configuration
    MissingConfigDir,
    MissingDefault,
    MalformedConfig,

    // Template resolution
    AmbiguousTemplate,
    MalformedTemplate,

    // Filesystem
    Io,
}

/// Errors raised while loading the global configuration or resolving templates.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration directory {} does not exist", .path.display())]
    MissingConfigDir { path: PathBuf },

    #[error("default template '{name}' is missing from configuration directory ({})", .path.display())]
    MissingDefault { name: &'static str, path: PathBuf },

    #[error("failed to parse config file {}: {source}", .path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "found more than one '{suffix}' template in {}: {}",
        .dir.display(),
        .files.join(", ")
    )]
    AmbiguousTemplate {
        suffix: &'static str,
        dir: PathBuf,
        files: Vec<String>,
    },

    #[error("failed to parse template {}: {source}", .path.display())]
    MalformedTemplate {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::MissingConfigDir { .. } => ErrorCode::MissingConfigDir,
            ConfigError::MissingDefault { .. } => ErrorCode::MissingDefault,
            ConfigError::MalformedConfig { .. } => ErrorCode::MalformedConfig,
            ConfigError::AmbiguousTemplate { .. } => ErrorCode::AmbiguousTemplate,
            ConfigError::MalformedTemplate { .. } => ErrorCode::MalformedTemplate,
            ConfigError::Io { .. } => ErrorCode::Io,
        }
    }

    // Convenience constructors

    pub fn missing_default(name: &'static str, path: impl Into<PathBuf>) -> Self {
        ConfigError::MissingDefault {
            name,
            path: path.into(),
        }
    }

    pub fn malformed_config(path: &Path, source: serde_json::Error) -> Self {
        ConfigError::MalformedConfig {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn read(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            action: "failed to read",
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            action: "failed to write",
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::MissingConfigDir => "MISSING_CONFIG_DIR",
            ErrorCode::MissingDefault => "MISSING_DEFAULT",
            ErrorCode::MalformedConfig => "MALFORMED_CONFIG",
            ErrorCode::AmbiguousTemplate => "AMBIGUOUS_TEMPLATE",
            ErrorCode::MalformedTemplate => "MALFORMED_TEMPLATE",
            ErrorCode::Io => "IO_ERROR",
        };
        f.write_str(name)
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
