//! Template rendering with `${name}` variable substitution.
//!
//! Handles:
//! - Placeholder substitution for files marked as templates
//! - Byte-for-byte copies for everything else
//! - Mirroring whole directories, rendering only the listed files
//!
//! A template is rendered completely in memory before anything is written,
//! and the result goes through a temporary file in the destination
//! directory, so a failed render never leaves a partial file behind.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use craftgen_core::types::{EntryKind, TemplateEntry};
use craftgen_core::ProjectRoot;
use regex::{Captures, Regex};
use tracing::debug;

use super::source::TemplateSource;
use crate::error::{Error, Result};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid")
});

/// Variables available to templates, by name
pub type TemplateVars = BTreeMap<String, String>;

/// One unit of rendering work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Path inside the template source
    pub source: Utf8PathBuf,

    /// Absolute destination path
    pub dest: Utf8PathBuf,

    pub kind: EntryKind,

    /// Substitute placeholders (file specs)
    pub is_template: bool,

    /// Files inside a directory spec to render, relative to the directory
    pub templates: BTreeSet<Utf8PathBuf>,

    pub variables: TemplateVars,
}

impl TemplateSpec {
    /// A single file, rendered with `variables`
    pub fn template(
        source: impl Into<Utf8PathBuf>,
        dest: impl Into<Utf8PathBuf>,
        variables: TemplateVars,
    ) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            kind: EntryKind::File,
            is_template: true,
            templates: BTreeSet::new(),
            variables,
        }
    }

    /// A directory, mirrored verbatim
    pub fn directory(source: impl Into<Utf8PathBuf>, dest: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            kind: EntryKind::Directory,
            is_template: false,
            templates: BTreeSet::new(),
            variables: TemplateVars::new(),
        }
    }

    /// Resolve a manifest entry against the project root
    pub fn from_entry(
        entry: &TemplateEntry,
        root: &ProjectRoot,
        variables: &TemplateVars,
    ) -> Result<Self> {
        Ok(Self {
            source: entry.source.clone(),
            dest: root.resolve(&entry.dest)?,
            kind: entry.kind,
            is_template: entry.template,
            templates: entry.templates.clone(),
            variables: variables.clone(),
        })
    }
}

/// Renders [`TemplateSpec`]s from a [`TemplateSource`]
#[derive(Debug)]
pub struct TemplateRenderer<'a> {
    source: &'a dyn TemplateSource,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(source: &'a dyn TemplateSource) -> Self {
        Self { source }
    }

    /// Render every spec in order and return the number of files written
    pub fn render(&self, specs: &[TemplateSpec]) -> Result<usize> {
        let mut written = 0;
        for spec in specs {
            written += match spec.kind {
                EntryKind::File => {
                    self.render_file(&spec.source, &spec.dest, spec.is_template, &spec.variables)?;
                    1
                }
                EntryKind::Directory => self.render_directory(spec)?,
            };
        }
        Ok(written)
    }

    fn render_directory(&self, spec: &TemplateSpec) -> Result<usize> {
        let files = self
            .source
            .list_dir(&spec.source)?
            .ok_or_else(|| Error::template_not_found(spec.source.as_str()))?;

        std::fs::create_dir_all(&spec.dest).map_err(|e| Error::write(spec.dest.as_str(), e))?;

        for relative in &files {
            let is_template = spec.templates.contains(relative);
            self.render_file(
                &spec.source.join(relative),
                &spec.dest.join(relative),
                is_template,
                &spec.variables,
            )?;
        }

        debug!("Mirrored {} files from {} to {}", files.len(), spec.source, spec.dest);
        Ok(files.len())
    }

    fn render_file(
        &self,
        source: &Utf8Path,
        dest: &Utf8Path,
        is_template: bool,
        variables: &TemplateVars,
    ) -> Result<()> {
        let bytes = self.source.read(source)?;
        let mode = self.source.mode(source);

        if is_template {
            let text = std::str::from_utf8(&bytes).map_err(|_| Error::InvalidTemplate {
                source_path: source.to_string(),
            })?;
            let rendered = render_string(source.as_str(), text, variables)?;
            write_atomic(dest, rendered.as_bytes(), mode)?;
            debug!("Rendered {} -> {}", source, dest);
        } else {
            write_atomic(dest, &bytes, mode)?;
            debug!("Copied {} -> {}", source, dest);
        }

        Ok(())
    }
}

/// Substitute every `${name}` in `template`.
///
/// Fails on the first placeholder whose name is not in `variables`.
/// `source_path` is only used to label the error.
pub fn render_string(source_path: &str, template: &str, variables: &TemplateVars) -> Result<String> {
    if let Some(missing) = PLACEHOLDER_RE
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| !variables.contains_key(name))
    {
        return Err(Error::render(source_path, missing));
    }

    let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| {
        variables[&caps[1]].clone()
    });
    Ok(rendered.into_owned())
}

/// Files written without a source mode get this one
const DEFAULT_MODE: u32 = 0o644;

fn write_atomic(dest: &Utf8Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
    let fail = |e: std::io::Error| Error::write(dest.as_str(), e);

    let parent = dest.parent().filter(|p| !p.as_str().is_empty());
    let parent = parent.unwrap_or(Utf8Path::new("."));
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
    file.write_all(contents).map_err(fail)?;

    // NamedTempFile is created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = mode.unwrap_or(DEFAULT_MODE);
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(fail)?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.persist(dest).map_err(|e| fail(e.error))?;
    Ok(())
}
