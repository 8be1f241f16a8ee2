//! Hubbard `+U` parameter tables.
//!
//! A UValue template is a YAML mapping keyed `Element <Symbol>`:
//!
//! ```yaml
//! Element Ce:
//!   orbital: 3
//!   U: 5.0
//!   J: 0.0
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

const ELEMENT_PREFIX: &str = "Element ";

/// `+U` parameters for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubbardU {
    pub orbital: i64,
    #[serde(rename = "U")]
    pub u: f64,
    #[serde(rename = "J")]
    pub j: f64,
}

impl HubbardU {
    /// Parameters used for elements missing from the table (no `+U`).
    pub const NONE: HubbardU = HubbardU {
        orbital: -1,
        u: 0.0,
        j: 0.0,
    };

    /// Effective `U - J`.
    pub fn effective(&self) -> f64 {
        self.u - self.j
    }
}

/// INCAR `+U` tags for a list of elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdauParams {
    pub ldaul: Vec<i64>,
    pub ldauu: Vec<f64>,
    pub ldauj: Vec<f64>,
    pub lmaxmix: u32,
}

/// Per-element `+U` parameters parsed from a UValue template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UValueTable {
    entries: BTreeMap<String, HubbardU>,
}

impl UValueTable {
    /// Parse YAML content. `path` is only used in error messages.
    ///
    /// Keys without the `Element ` prefix are skipped with a warning whatever
    /// their value; a malformed `Element` entry fails the whole table.
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let malformed = |source| ConfigError::MalformedTemplate {
            path: path.to_path_buf(),
            source,
        };
        let raw: Option<Mapping> = serde_yaml::from_str(content).map_err(malformed)?;

        let mut entries = BTreeMap::new();
        for (key, value) in raw.unwrap_or_default() {
            let Some(symbol) = key.as_str().and_then(|k| k.strip_prefix(ELEMENT_PREFIX)) else {
                warn!(key = ?key, path = %path.display(), "ignoring UValue entry without 'Element' prefix");
                continue;
            };
            let params: HubbardU = serde_yaml::from_value(value).map_err(malformed)?;
            entries.insert(symbol.trim().to_string(), params);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::parse(&content, path)
    }

    pub fn get(&self, element: &str) -> Option<&HubbardU> {
        self.entries.get(element)
    }

    /// Parameters for `element`, or [`HubbardU::NONE`] with a warning.
    pub fn lookup(&self, element: &str) -> HubbardU {
        match self.entries.get(element) {
            Some(params) => *params,
            None => {
                warn!(
                    element,
                    "{element} not found in UValue, +U parameters set default: LDAUL = -1, LDAUU = 0.0, LDAUJ = 0.0"
                );
                HubbardU::NONE
            }
        }
    }

    /// LDAUL/LDAUU/LDAUJ in element order.
    ///
    /// LMAXMIX is 6 when any element has f electrons (orbital 3), else 4.
    pub fn ldau<S: AsRef<str>>(&self, elements: &[S]) -> LdauParams {
        let mut params = LdauParams {
            ldaul: Vec::with_capacity(elements.len()),
            ldauu: Vec::with_capacity(elements.len()),
            ldauj: Vec::with_capacity(elements.len()),
            lmaxmix: 4,
        };
        for element in elements {
            let u = self.lookup(element.as_ref());
            params.ldaul.push(u.orbital);
            params.ldauu.push(u.u);
            params.ldauj.push(u.j);
        }
        if params.ldaul.contains(&3) {
            params.lmaxmix = 6;
        }
        params
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Element Ce:
  orbital: 3
  U: 5.0
  J: 0.0
Element Fe:
  orbital: 2
  U: 5.3
  J: 1.0
";

    fn table() -> UValueTable {
        UValueTable::parse(TABLE, Path::new("UValue.yaml")).unwrap()
    }

    #[test]
    fn test_parse_strips_element_prefix() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("Ce"),
            Some(&HubbardU {
                orbital: 3,
                u: 5.0,
                j: 0.0
            })
        );
        assert!(table.get("Element Ce").is_none());
    }

    #[test]
    fn test_lookup_missing_element_falls_back() {
        assert_eq!(table().lookup("O"), HubbardU::NONE);
    }

    #[test]
    fn test_ldau_with_f_electrons() {
        let params = table().ldau(&["Ce", "O"]);
        assert_eq!(params.ldaul, vec![3, -1]);
        assert_eq!(params.ldauu, vec![5.0, 0.0]);
        assert_eq!(params.ldauj, vec![0.0, 0.0]);
        assert_eq!(params.lmaxmix, 6);
    }

    #[test]
    fn test_ldau_without_f_electrons() {
        let params = table().ldau(&["Fe", "O"]);
        assert_eq!(params.ldaul, vec![2, -1]);
        assert_eq!(params.lmaxmix, 4);
    }

    #[test]
    fn test_empty_file_is_empty_table() {
        let table = UValueTable::parse("", Path::new("empty.uvalue")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_yaml_names_file() {
        let err = UValueTable::parse("Element Ce: [1, 2", Path::new("/calc/bad.uvalue")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTemplate { .. }));
        assert!(err.to_string().contains("/calc/bad.uvalue"));
    }

    #[test]
    fn test_unprefixed_keys_are_skipped_whatever_their_shape() {
        let content = format!("comment: hand-tuned for CeO2\n1: [a, b]\n{TABLE}");
        let table = UValueTable::parse(&content, Path::new("UValue.yaml")).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("comment").is_none());
    }

    #[test]
    fn test_malformed_element_entry_is_error() {
        let content = "Element Ce:\n  orbital: f\n  U: 5.0\n  J: 0.0\n";
        let err = UValueTable::parse(content, Path::new("/calc/ce.uvalue")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_effective_u() {
        let fe = table().lookup("Fe");
        assert!((fe.effective() - 4.3).abs() < 1e-9);
    }
}
