//! Global configuration.
//!
//! Consolidates configuration from four tiers with field-by-field JSON merging:
//! 1. **Defaults** - rooted at the gvasp home directory (`~/.gvasp`)
//! 2. **File** - `config.json` (explicit path or `<home>/config.json`)
//! 3. **Environment** - `GVASP_CONFIG_DIR`, `GVASP_LOG_DIR`
//! 4. **Command line** - `--config-dir`, `--log-dir`
//!
//! ## Environment Variables
//! - `GVASP_HOME` - gvasp home directory (default: `~/.gvasp`)
//! - `GVASP_CONFIG_PATH` - Explicit config file (overrides the user file)
//! - `GVASP_CONFIG_DIR` - Template directory
//! - `GVASP_LOG_DIR` - Log directory

mod defaults;
mod loader;
mod merge;
mod types;

pub use defaults::{DefaultStatus, DefaultTemplates, INCAR_NAME, POT_DIR_NAME, UVALUE_NAME};
pub use loader::{
    ConfigLoader, ConfigPaths, ConfigTier, ENV_CONFIG_DIR, ENV_CONFIG_PATH, ENV_HOME, ENV_LOG_DIR,
    Overrides,
};
pub use merge::{deep_merge, deep_merge_all, merge_into};
pub use types::*;
