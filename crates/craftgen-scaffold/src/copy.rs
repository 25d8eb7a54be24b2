//! Recursive directory copy

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Copy the tree at `from` into `to`, returning the number of files copied.
///
/// `to` is created if needed and existing files are overwritten.
pub fn copy_tree(from: &Utf8Path, to: &Utf8Path) -> Result<usize> {
    let fail = |cause: std::io::Error| Error::copy(from.as_str(), to.as_str(), cause);

    if !from.is_dir() {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "source directory does not exist",
        )));
    }

    std::fs::create_dir_all(to).map_err(fail)?;

    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| fail(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| fail(std::io::Error::other(e)))?;
        let relative = Utf8PathBuf::try_from(relative.to_path_buf())
            .map_err(|e| fail(std::io::Error::other(e)))?;
        let target = to.join(&relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(fail)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(fail)?;
            copied += 1;
        }
    }

    debug!("Copied {} files from {} to {}", copied, from, to);
    Ok(copied)
}
