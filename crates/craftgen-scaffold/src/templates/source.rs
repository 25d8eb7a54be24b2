//! Where template files are read from

use std::borrow::Cow;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Read-only view over a tree of template files
pub trait TemplateSource: Send + Sync + fmt::Debug {
    /// Contents of one file
    fn read(&self, path: &Utf8Path) -> Result<Cow<'static, [u8]>>;

    /// Files below `dir`, relative to it, sorted. `None` if `dir` is not a
    /// directory in this source.
    fn list_dir(&self, dir: &Utf8Path) -> Result<Option<Vec<Utf8PathBuf>>>;

    /// Permission bits to give a file written from `path`. `None` leaves
    /// the writer's default.
    fn mode(&self, _path: &Utf8Path) -> Option<u32> {
        None
    }

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct BundledTemplates;

/// The default template set shipped with craftgen
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn read(&self, path: &Utf8Path) -> Result<Cow<'static, [u8]>> {
        BundledTemplates::get(path.as_str())
            .map(|file| file.data)
            .ok_or_else(|| Error::template_not_found(path.as_str()))
    }

    fn list_dir(&self, dir: &Utf8Path) -> Result<Option<Vec<Utf8PathBuf>>> {
        let prefix = format!("{}/", dir.as_str().trim_end_matches('/'));
        let mut files: Vec<Utf8PathBuf> = BundledTemplates::iter()
            .filter_map(|name| name.strip_prefix(prefix.as_str()).map(Utf8PathBuf::from))
            .collect();

        if files.is_empty() {
            return Ok(None);
        }
        files.sort();
        Ok(Some(files))
    }

    fn describe(&self) -> String {
        "built-in templates".to_string()
    }
}

/// Templates read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: Utf8PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirectoryTemplates {
    fn read(&self, path: &Utf8Path) -> Result<Cow<'static, [u8]>> {
        let full = self.root.join(path);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::template_not_found(full.as_str()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn list_dir(&self, dir: &Utf8Path) -> Result<Option<Vec<Utf8PathBuf>>> {
        let base = self.root.join(dir);
        if !base.is_dir() {
            return Ok(None);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&base)
                .map_err(std::io::Error::other)?;
            let relative = Utf8PathBuf::try_from(relative.to_path_buf())
                .map_err(std::io::Error::other)?;
            files.push(relative);
        }

        files.sort();
        Ok(Some(files))
    }

    #[cfg(unix)]
    fn mode(&self, path: &Utf8Path) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(self.root.join(path))
            .ok()
            .map(|metadata| metadata.permissions().mode() & 0o777)
    }

    fn describe(&self) -> String {
        self.root.to_string()
    }
}
