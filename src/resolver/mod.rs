//! Parent-chain template resolution.
//!
//! For each template kind the resolver walks from the working directory up
//! to the filesystem root and takes the first directory holding a file with
//! the kind's suffix. Kinds are resolved independently, so the INCAR override
//! may come from a different level than the submit script. Kinds with no
//! override anywhere in the chain fall back to the global defaults.

mod listing;
mod template;

pub use listing::{DirectoryListing, FsListing, MemoryListing};
pub use template::{
    EffectiveTemplates, ResolvedTemplate, TemplateKind, TemplateOverride, TemplateSet,
    TemplateSource,
};

use crate::config::DefaultTemplates;
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{absolutize, current_dir, normalize_path_components, parent_chain};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find the nearest override of `kind` along `chain`.
///
/// `chain` must be ordered nearest first; the position of the matching
/// directory becomes the override distance. Two files with the same suffix
/// in one directory are rejected rather than picked by name.
pub fn nearest_override<I, P>(
    chain: I,
    listing: &impl DirectoryListing,
    kind: TemplateKind,
) -> ConfigResult<Option<TemplateOverride>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for (distance, dir) in chain.into_iter().enumerate() {
        let dir = dir.as_ref();
        let mut matches: Vec<OsString> = listing
            .files_in(dir)
            .into_iter()
            .filter(|name| kind.matches(name))
            .collect();

        match matches.len() {
            0 => continue,
            1 => {
                let name = matches.remove(0);
                return Ok(Some(TemplateOverride {
                    path: dir.join(name),
                    distance,
                }));
            }
            _ => {
                matches.sort();
                return Err(ConfigError::AmbiguousTemplate {
                    suffix: kind.suffix(),
                    dir: dir.to_path_buf(),
                    files: matches
                        .iter()
                        .map(|name| name.to_string_lossy().into_owned())
                        .collect(),
                });
            }
        }
    }
    Ok(None)
}

/// Resolves template overrides against a set of global defaults.
#[derive(Debug, Clone)]
pub struct ConfigResolver<L = FsListing> {
    defaults: DefaultTemplates,
    listing: L,
}

impl ConfigResolver<FsListing> {
    pub fn new(defaults: DefaultTemplates) -> Self {
        Self::with_listing(defaults, FsListing)
    }
}

impl<L: DirectoryListing> ConfigResolver<L> {
    pub fn with_listing(defaults: DefaultTemplates, listing: L) -> Self {
        Self { defaults, listing }
    }

    /// Nearest override of one kind, starting at `start`.
    pub fn find_override(
        &self,
        start: &Path,
        kind: TemplateKind,
    ) -> ConfigResult<Option<TemplateOverride>> {
        let start = working_dir(Some(start))?;
        nearest_override(parent_chain(&start), &self.listing, kind)
    }

    /// All overrides active for `start`, without consulting the defaults.
    pub fn template_set(&self, start: &Path) -> ConfigResult<TemplateSet> {
        let start = working_dir(Some(start))?;
        let chain: Vec<PathBuf> = parent_chain(&start).collect();
        Ok(TemplateSet::new(
            nearest_override(&chain, &self.listing, TemplateKind::Incar)?,
            nearest_override(&chain, &self.listing, TemplateKind::UValue)?,
            nearest_override(&chain, &self.listing, TemplateKind::Submit)?,
        ))
    }

    /// Effective template for every kind.
    ///
    /// The mandatory defaults are checked first, so a broken configuration
    /// directory fails even when every kind is overridden. The scheduler's
    /// submit template is only required when no `.submit` override exists.
    pub fn resolve(&self, start: &Path) -> ConfigResult<EffectiveTemplates> {
        self.defaults.verify(&self.listing)?;

        let working_dir = working_dir(Some(start))?;
        let set = self.template_set(&working_dir)?;

        let pick = |kind| self.or_default(kind, set.get(kind).cloned());
        Ok(EffectiveTemplates {
            incar: pick(TemplateKind::Incar)?,
            uvalue: pick(TemplateKind::UValue)?,
            submit: pick(TemplateKind::Submit)?,
            working_dir,
        })
    }

    /// Effective template of a single kind.
    pub fn resolve_kind(
        &self,
        start: &Path,
        kind: TemplateKind,
    ) -> ConfigResult<ResolvedTemplate> {
        self.defaults.verify(&self.listing)?;
        let found = self.find_override(start, kind)?;
        self.or_default(kind, found)
    }

    /// Path of the global default for `kind`.
    pub fn default_path(&self, kind: TemplateKind) -> PathBuf {
        match kind {
            TemplateKind::Incar => self.defaults.incar(),
            TemplateKind::UValue => self.defaults.uvalue(),
            TemplateKind::Submit => self.defaults.submit(),
        }
    }

    fn or_default(
        &self,
        kind: TemplateKind,
        found: Option<TemplateOverride>,
    ) -> ConfigResult<ResolvedTemplate> {
        if let Some(found) = found {
            debug!(%kind, path = %found.path.display(), distance = found.distance, "using override");
            return Ok(ResolvedTemplate::from_override(found));
        }

        let path = self.default_path(kind);
        if kind == TemplateKind::Submit && !self.listing.is_file(&path) {
            return Err(ConfigError::missing_default(self.defaults.submit_name(), path));
        }
        debug!(%kind, path = %path.display(), "using default");
        Ok(ResolvedTemplate::from_default(path))
    }
}

/// Absolute, normalized form of a working directory.
///
/// `None` means the process working directory.
pub fn working_dir(dir: Option<&Path>) -> ConfigResult<PathBuf> {
    match dir {
        Some(dir) if dir.is_absolute() => Ok(normalize_path_components(dir)),
        Some(dir) => Ok(absolutize(dir, &current_dir()?)),
        None => current_dir(),
    }
}
