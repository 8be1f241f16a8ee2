//! Template kinds and resolution results.

use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of template a directory can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Incar,
    UValue,
    Submit,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [TemplateKind::Incar, TemplateKind::UValue, TemplateKind::Submit];

    /// File-name suffix that marks a user override.
    pub fn suffix(&self) -> &'static str {
        match self {
            TemplateKind::Incar => ".incar",
            TemplateKind::UValue => ".uvalue",
            TemplateKind::Submit => ".submit",
        }
    }

    /// Whether `file_name` carries this kind's suffix.
    ///
    /// Compares raw bytes, so names that are not valid UTF-8 still match.
    pub fn matches(&self, file_name: impl AsRef<OsStr>) -> bool {
        file_name
            .as_ref()
            .as_encoded_bytes()
            .ends_with(self.suffix().as_bytes())
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Incar => write!(f, "incar"),
            TemplateKind::UValue => write!(f, "uvalue"),
            TemplateKind::Submit => write!(f, "submit"),
        }
    }
}

/// A user override found in the parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateOverride {
    /// The override file
    pub path: PathBuf,
    /// Levels above the working directory (0 = the working directory)
    pub distance: usize,
}

/// Where a resolved template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateSource {
    /// Found in the parent chain
    Override { distance: usize },
    /// Global default in `config_dir`
    Default,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Override { distance: 0 } => write!(f, "override (working directory)"),
            TemplateSource::Override { distance: 1 } => write!(f, "override (1 level up)"),
            TemplateSource::Override { distance } => write!(f, "override ({distance} levels up)"),
            TemplateSource::Default => write!(f, "default"),
        }
    }
}

/// A template path with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTemplate {
    pub path: PathBuf,
    pub source: TemplateSource,
}

impl ResolvedTemplate {
    pub fn from_override(found: TemplateOverride) -> Self {
        Self {
            path: found.path,
            source: TemplateSource::Override {
                distance: found.distance,
            },
        }
    }

    pub fn from_default(path: PathBuf) -> Self {
        Self {
            path,
            source: TemplateSource::Default,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self.source, TemplateSource::Override { .. })
    }
}

/// The overrides active for one working directory.
///
/// Resolved once per command; there are no mutators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateSet {
    incar_template: Option<TemplateOverride>,
    uvalue_template: Option<TemplateOverride>,
    submit_template: Option<TemplateOverride>,
}

impl TemplateSet {
    pub(crate) fn new(
        incar_template: Option<TemplateOverride>,
        uvalue_template: Option<TemplateOverride>,
        submit_template: Option<TemplateOverride>,
    ) -> Self {
        Self {
            incar_template,
            uvalue_template,
            submit_template,
        }
    }

    pub fn get(&self, kind: TemplateKind) -> Option<&TemplateOverride> {
        match kind {
            TemplateKind::Incar => self.incar_template.as_ref(),
            TemplateKind::UValue => self.uvalue_template.as_ref(),
            TemplateKind::Submit => self.submit_template.as_ref(),
        }
    }

    pub fn incar_template(&self) -> Option<&Path> {
        self.incar_template.as_ref().map(|o| o.path.as_path())
    }

    pub fn uvalue_template(&self) -> Option<&Path> {
        self.uvalue_template.as_ref().map(|o| o.path.as_path())
    }

    pub fn submit_template(&self) -> Option<&Path> {
        self.submit_template.as_ref().map(|o| o.path.as_path())
    }

    pub fn is_empty(&self) -> bool {
        TemplateKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// Overrides merged with the global defaults: one template per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveTemplates {
    pub working_dir: PathBuf,
    pub incar: ResolvedTemplate,
    pub uvalue: ResolvedTemplate,
    pub submit: ResolvedTemplate,
}

impl EffectiveTemplates {
    pub fn get(&self, kind: TemplateKind) -> &ResolvedTemplate {
        match kind {
            TemplateKind::Incar => &self.incar,
            TemplateKind::UValue => &self.uvalue,
            TemplateKind::Submit => &self.submit,
        }
    }

    /// Templates in [`TemplateKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateKind, &ResolvedTemplate)> {
        TemplateKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}
