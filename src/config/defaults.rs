//! Global default templates stored in the configuration directory.
//!
//! The names below are reserved: user overrides never replace them on disk,
//! they only shadow them during resolution.

use super::types::{GlobalConfig, Scheduler};
use crate::error::{ConfigError, ConfigResult};
use crate::resolver::{DirectoryListing, FsListing};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default INCAR template.
pub const INCAR_NAME: &str = "INCAR";

/// Default Hubbard U table.
pub const UVALUE_NAME: &str = "UValue.yaml";

/// Directory holding the pseudopotential library.
pub const POT_DIR_NAME: &str = "pot";

/// Presence of one default inside `config_dir`.
#[derive(Debug, Clone, Serialize)]
pub struct DefaultStatus {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
    pub required: bool,
}

/// Paths of the default templates derived from a [`GlobalConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTemplates {
    config_dir: PathBuf,
    scheduler: Scheduler,
}

impl DefaultTemplates {
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            config_dir: config.config_dir.clone(),
            scheduler: config.scheduler,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn incar(&self) -> PathBuf {
        self.config_dir.join(INCAR_NAME)
    }

    pub fn uvalue(&self) -> PathBuf {
        self.config_dir.join(UVALUE_NAME)
    }

    pub fn pot_dir(&self) -> PathBuf {
        self.config_dir.join(POT_DIR_NAME)
    }

    pub fn submit_name(&self) -> &'static str {
        self.scheduler.template_name()
    }

    pub fn submit(&self) -> PathBuf {
        self.config_dir.join(self.submit_name())
    }

    /// Check that the configuration directory and the mandatory defaults
    /// (`INCAR`, `UValue.yaml`, `pot/`) exist.
    ///
    /// The submit template is not checked here; it is only required when a
    /// submit resolution falls back to it.
    pub fn verify(&self, listing: &impl DirectoryListing) -> ConfigResult<()> {
        if !listing.is_dir(&self.config_dir) {
            return Err(ConfigError::MissingConfigDir {
                path: self.config_dir.clone(),
            });
        }

        let incar = self.incar();
        if !listing.is_file(&incar) {
            return Err(ConfigError::missing_default(INCAR_NAME, incar));
        }

        let uvalue = self.uvalue();
        if !listing.is_file(&uvalue) {
            return Err(ConfigError::missing_default(UVALUE_NAME, uvalue));
        }

        let pot_dir = self.pot_dir();
        if !listing.is_dir(&pot_dir) {
            return Err(ConfigError::missing_default(POT_DIR_NAME, pot_dir));
        }

        Ok(())
    }

    /// [`verify`](Self::verify) against the real filesystem.
    pub fn verify_on_disk(&self) -> ConfigResult<()> {
        self.verify(&FsListing)
    }

    /// Report every default and whether it exists.
    pub fn status(&self, listing: &impl DirectoryListing) -> Vec<DefaultStatus> {
        let pot_dir = self.pot_dir();
        let submit = self.submit();
        let mut statuses = vec![
            file_status(listing, INCAR_NAME, self.incar(), true),
            file_status(listing, UVALUE_NAME, self.uvalue(), true),
        ];
        statuses.push(DefaultStatus {
            name: POT_DIR_NAME,
            present: listing.is_dir(&pot_dir),
            path: pot_dir,
            required: true,
        });
        statuses.push(file_status(listing, self.submit_name(), submit, false));
        statuses
    }
}

fn file_status(
    listing: &impl DirectoryListing,
    name: &'static str,
    path: PathBuf,
    required: bool,
) -> DefaultStatus {
    DefaultStatus {
        name,
        present: listing.is_file(&path),
        path,
        required,
    }
}
