//! Removal of default files shipped in the archives

use camino::Utf8Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Deletes an enumerated set of paths. Absent paths are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pruner;

impl Pruner {
    pub fn new() -> Self {
        Self
    }

    /// Remove each path recursively and return how many existed.
    ///
    /// Stops at the first genuine I/O failure; paths removed before it stay
    /// removed.
    pub fn prune<P: AsRef<Utf8Path>>(&self, paths: &[P]) -> Result<usize> {
        let mut removed = 0;

        for path in paths {
            let path = path.as_ref();
            if remove_path(path).map_err(|e| Error::prune(path.as_str(), e))? {
                debug!("Removed {}", path);
                removed += 1;
            } else {
                debug!("Already absent: {}", path);
            }
        }

        Ok(removed)
    }

    /// Remove each directory that exists and is empty, returning how many
    /// were removed. Files and directories with contents are left alone.
    pub fn prune_if_empty<P: AsRef<Utf8Path>>(&self, paths: &[P]) -> Result<usize> {
        let mut removed = 0;

        for path in paths {
            let path = path.as_ref();
            if remove_empty_dir(path).map_err(|e| Error::prune(path.as_str(), e))? {
                debug!("Removed empty directory {}", path);
                removed += 1;
            } else {
                debug!("Kept {}", path);
            }
        }

        Ok(removed)
    }
}

/// Returns `Ok(false)` when the path is absent, not a directory, or not
/// empty
fn remove_empty_dir(path: &Utf8Path) -> std::io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }

    if std::fs::read_dir(path)?.next().is_some() {
        return Ok(false);
    }

    match std::fs::remove_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Returns `Ok(false)` when nothing was there to remove
fn remove_path(path: &Utf8Path) -> std::io::Result<bool> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
