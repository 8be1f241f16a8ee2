//! Lexical path helpers.
//!
//! Apart from [`current_dir`], everything here is pure path manipulation:
//! - Normalizes `.` and `..` components
//! - Makes relative paths absolute against a supplied base
//! - Expands a leading `~/` to a supplied home directory
//! - Produces the parent chain of a directory, nearest first

use crate::error::{ConfigError, ConfigResult};
use std::path::{Component, Path, PathBuf};

/// The process working directory.
pub fn current_dir() -> ConfigResult<PathBuf> {
    std::env::current_dir().map_err(|e| ConfigError::read(Path::new("."), e))
}

/// Normalize a path by resolving `.` and `..` components lexically.
///
/// `..` above the root of an absolute path is dropped; on a relative path it
/// is kept so `../x` stays meaningful.
pub fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => components.push(component),
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(Component::ParentDir),
            },
            Component::Normal(name) => components.push(Component::Normal(name)),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Make `path` absolute against `base` and normalize it.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path_components(path)
    } else {
        normalize_path_components(&base.join(path))
    }
}

/// Expand a leading `~` component to `home`.
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve a path read from a config file: expand `~` and anchor relative
/// paths at the directory holding the file.
pub fn resolve_config_path(path: &Path, file_dir: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = expand_home(path, home);
    absolutize(&expanded, file_dir)
}

/// Ancestor directories of a starting directory, nearest first.
///
/// The starting directory itself is yielded first (distance 0), then each
/// parent in turn, ending with the filesystem root.
#[derive(Debug, Clone)]
pub struct ParentChain {
    next: Option<PathBuf>,
}

impl Iterator for ParentChain {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Some(current)
    }
}

/// Build the parent chain of `dir`.
///
/// `dir` is normalized first so `a/./b/../c` walks `a/c`, `a`. Callers
/// wanting the chain up to the real root should pass an absolute path.
pub fn parent_chain(dir: &Path) -> ParentChain {
    let start = normalize_path_components(dir);
    let next = if start == Path::new(".") {
        None
    } else {
        Some(start)
    };
    ParentChain { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_to_forward_slashes(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    fn chain(dir: &str) -> Vec<String> {
        parent_chain(Path::new(dir))
            .map(|p| path_to_forward_slashes(&p))
            .collect()
    }

    #[test]
    fn test_normalize_with_dot_components() {
        let result = normalize_path_components(Path::new("/work/./slab/../bulk/opt"));
        assert_eq!(result, PathBuf::from("/work/bulk/opt"));
    }

    #[test]
    fn test_normalize_parent_above_root_is_dropped() {
        let result = normalize_path_components(Path::new("/../../etc"));
        assert_eq!(result, PathBuf::from("/etc"));
    }

    #[test]
    fn test_normalize_relative_keeps_leading_parent() {
        let result = normalize_path_components(Path::new("../x/./y"));
        assert_eq!(result, PathBuf::from("../x/y"));
    }

    #[test]
    fn test_absolutize_relative() {
        let result = absolutize(Path::new("../calc"), Path::new("/home/u/proj"));
        assert_eq!(result, PathBuf::from("/home/u/calc"));
    }

    #[test]
    fn test_absolutize_absolute_ignores_base() {
        let result = absolutize(Path::new("/opt/gvasp"), Path::new("/home/u"));
        assert_eq!(result, PathBuf::from("/opt/gvasp"));
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/u");
        assert_eq!(
            expand_home(Path::new("~/.gvasp"), Some(home)),
            PathBuf::from("/home/u/.gvasp")
        );
        assert_eq!(
            expand_home(Path::new("/abs/~/x"), Some(home)),
            PathBuf::from("/abs/~/x")
        );
        assert_eq!(
            expand_home(Path::new("~/.gvasp"), None),
            PathBuf::from("~/.gvasp")
        );
    }

    #[test]
    fn test_resolve_config_path_anchors_at_file_dir() {
        let result = resolve_config_path(
            Path::new("templates"),
            Path::new("/home/u/.gvasp"),
            Some(Path::new("/home/u")),
        );
        assert_eq!(result, PathBuf::from("/home/u/.gvasp/templates"));
    }

    #[test]
    fn test_parent_chain_nearest_first() {
        assert_eq!(chain("/a/b/c"), vec!["/a/b/c", "/a/b", "/a", "/"]);
    }

    #[test]
    fn test_parent_chain_of_root() {
        assert_eq!(chain("/"), vec!["/"]);
    }

    #[test]
    fn test_parent_chain_normalizes_first() {
        assert_eq!(chain("/a/./b/../c"), vec!["/a/c", "/a", "/"]);
    }

    #[test]
    fn test_parent_chain_relative_stops_at_first_component() {
        assert_eq!(chain("calc/opt"), vec!["calc/opt", "calc"]);
    }

    #[test]
    fn test_parent_chain_distance_via_enumerate() {
        let distances: Vec<(usize, String)> = parent_chain(Path::new("/a/b"))
            .enumerate()
            .map(|(d, p)| (d, path_to_forward_slashes(&p)))
            .collect();
        assert_eq!(
            distances,
            vec![
                (0, "/a/b".to_string()),
                (1, "/a".to_string()),
                (2, "/".to_string())
            ]
        );
    }
}
