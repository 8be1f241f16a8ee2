//! Directory listings consulted by the resolver.
//!
//! The resolver only asks three questions of the filesystem, so they live
//! behind a trait: the real implementation reads the disk, the in-memory one
//! is built from a list of file paths.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read-only view of a directory tree.
pub trait DirectoryListing {
    /// Names of the regular files directly inside `dir`, as stored on disk.
    ///
    /// A directory that does not exist yields no names.
    fn files_in(&self, dir: &Path) -> Vec<OsString>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

impl<T: DirectoryListing + ?Sized> DirectoryListing for &T {
    fn files_in(&self, dir: &Path) -> Vec<OsString> {
        (**self).files_in(dir)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}

/// Listing backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn files_in(&self, dir: &Path) -> Vec<OsString> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                return Vec::new();
            }
        };

        entries
            .flatten()
            // Follows symlinks so linked templates count as files.
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name())
            .collect()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory listing built from file paths.
///
/// Every ancestor of a listed file counts as a directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryListing {
    files: BTreeMap<PathBuf, BTreeSet<OsString>>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a listing from file paths such as `"/a/b/relax.incar"`.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut listing = Self::new();
        for path in paths {
            listing.add_file(path.as_ref());
        }
        listing
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        self.files
            .entry(parent.to_path_buf())
            .or_default()
            .insert(name.to_os_string());
        for ancestor in parent.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl DirectoryListing for MemoryListing {
    fn files_in(&self, dir: &Path) -> Vec<OsString> {
        self.files
            .get(dir)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn is_file(&self, path: &Path) -> bool {
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => self
                .files
                .get(parent)
                .is_some_and(|names| names.contains(name)),
            _ => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}
