//! gvasp configuration library
//!
//! Resolves the INCAR, UValue and submit templates for a VASP job directory
//! from per-directory overrides and the global configuration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;
pub mod resolver;
pub mod uvalue;

pub use config::{ConfigLoader, GlobalConfig};
pub use error::{ConfigError, ConfigResult};
pub use resolver::{ConfigResolver, EffectiveTemplates, TemplateKind, TemplateSet};
