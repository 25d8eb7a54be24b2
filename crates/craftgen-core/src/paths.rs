//! Project root handling
//!
//! Every path the scaffold writes is expressed relative to a single
//! [`ProjectRoot`]. Relative paths are checked before they are joined so a
//! settings file cannot point a step outside the project.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::error::{Error, Result};

/// Absolute directory that a scaffold run writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    root: Utf8PathBuf,
}

impl ProjectRoot {
    /// Establish a project root, resolving relative paths against the
    /// current working directory.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = if path.is_absolute() {
            path
        } else {
            let cwd = std::env::current_dir()?;
            let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
                Error::invalid_path(e.into_path_buf().display().to_string(), "not valid UTF-8")
            })?;
            cwd.join(path)
        };

        Ok(Self {
            root: normalize(&root),
        })
    }

    /// The absolute root path
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Join a project-relative path onto the root
    pub fn resolve(&self, relative: impl AsRef<Utf8Path>) -> Result<Utf8PathBuf> {
        let relative = relative.as_ref();
        validate_relative(relative)?;
        Ok(normalize(&self.root.join(relative)))
    }

    /// Strip the root from an absolute path for display
    pub fn display_relative<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Check that a path stays inside whatever directory it is joined onto
pub fn validate_relative(path: &Utf8Path) -> Result<()> {
    if path.as_str().is_empty() {
        return Err(Error::invalid_path(path.as_str(), "path is empty"));
    }

    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => {
                return Err(Error::invalid_path(path.as_str(), "must be relative"));
            }
            Utf8Component::ParentDir => {
                return Err(Error::invalid_path(
                    path.as_str(),
                    "directory traversal (..) is not allowed",
                ));
            }
            Utf8Component::CurDir | Utf8Component::Normal(_) => {}
        }
    }

    Ok(())
}

/// Drop `.` components
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        if !matches!(component, Utf8Component::CurDir) {
            normalized.push(component.as_str());
        }
    }
    normalized
}
