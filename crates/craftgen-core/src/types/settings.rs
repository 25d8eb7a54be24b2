//! Scaffold settings: the URLs, paths and file lists a run works from
//!
//! Nothing here is design; it is the data the scaffold pipeline is built
//! from. The defaults live in `config/defaults.yaml`.

use std::collections::{BTreeSet, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::paths::validate_relative;

/// Complete settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldSettings {
    /// Archives to download and expand, in order
    pub archives: Vec<ArchiveSettings>,

    /// Directories copied out of expanded archives
    #[serde(default)]
    pub copies: Vec<CopySettings>,

    /// Project-relative paths removed after extraction
    #[serde(default)]
    pub prune: Vec<Utf8PathBuf>,

    /// Directories removed after extraction only when they are empty
    #[serde(default)]
    pub prune_if_empty: Vec<Utf8PathBuf>,

    /// Template manifest, rendered after pruning
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,

    /// Empty directories created alongside the templates
    #[serde(default)]
    pub directories: Vec<Utf8PathBuf>,

    /// Dependency installers run last
    #[serde(default)]
    pub install: Vec<InstallCommand>,

    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub extract: ExtractSettings,
}

/// One remote archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSettings {
    /// Short name used in step names (`fetch-<name>`)
    pub name: String,

    /// Download URL
    pub url: String,

    /// Project-relative download location
    pub path: Utf8PathBuf,

    /// Project-relative directory the archive is expanded into
    #[serde(default = "default_extract_to")]
    pub extract_to: Utf8PathBuf,
}

/// A directory copied from one project path to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySettings {
    pub name: String,
    pub from: Utf8PathBuf,
    pub to: Utf8PathBuf,
}

/// Whether a template entry names a file or a directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Directory,
}

/// One template manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Path inside the template source
    pub source: Utf8PathBuf,

    /// Project-relative destination
    pub dest: Utf8PathBuf,

    #[serde(default)]
    pub kind: EntryKind,

    /// Substitute `${name}` placeholders (file entries)
    #[serde(default)]
    pub template: bool,

    /// Files under a directory entry to render rather than copy, relative
    /// to the directory
    #[serde(default)]
    pub templates: BTreeSet<Utf8PathBuf>,
}

/// External command run by the install step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl InstallCommand {
    /// Command line for display, e.g. `npm install`
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Limit on establishing the connection
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,

    /// Whole-request timeout, body included; unset means a slow download
    /// is never cut off
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSettings {
    /// Decompression utility, invoked as `<program> -o -q <archive> -d <dir>`
    #[serde(default = "default_extract_program")]
    pub program: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            program: default_extract_program(),
            timeout_secs: None,
        }
    }
}

fn default_extract_to() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

fn default_user_agent() -> String {
    format!("craftgen/{}", env!("CARGO_PKG_VERSION"))
}

fn default_extract_program() -> String {
    "unzip".to_string()
}

impl ScaffoldSettings {
    /// Parse settings from YAML and validate them
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml_ng::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check names, URLs and that every path is project-relative
    pub fn validate(&self) -> Result<()> {
        if self.archives.is_empty() {
            return Err(Error::invalid_settings("at least one archive is required"));
        }

        let mut names = HashSet::new();
        for archive in &self.archives {
            check_name("archive", &archive.name, &mut names)?;
            check_url(&archive.name, &archive.url)?;
            check_path(&archive.path)?;
            check_path(&archive.extract_to)?;
        }

        let mut names = HashSet::new();
        for copy in &self.copies {
            check_name("copy", &copy.name, &mut names)?;
            check_path(&copy.from)?;
            check_path(&copy.to)?;
        }

        for path in self
            .prune
            .iter()
            .chain(&self.prune_if_empty)
            .chain(&self.directories)
        {
            check_path(path)?;
        }

        for entry in &self.templates {
            check_path(&entry.source)?;
            check_path(&entry.dest)?;
            for inner in &entry.templates {
                check_path(inner)?;
            }
            if entry.kind == EntryKind::File && !entry.templates.is_empty() {
                return Err(Error::invalid_settings(format!(
                    "template entry '{}' is a file but lists inner templates",
                    entry.source
                )));
            }
        }

        for command in &self.install {
            if command.program.trim().is_empty() {
                return Err(Error::invalid_settings("install command has no program"));
            }
        }

        if self.extract.program.trim().is_empty() {
            return Err(Error::invalid_settings("extract program is empty"));
        }

        Ok(())
    }
}

fn check_name(kind: &str, name: &str, seen: &mut HashSet<String>) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(Error::invalid_settings(format!(
            "{} name '{}' must be lowercase alphanumeric with hyphens",
            kind, name
        )));
    }
    if !seen.insert(name.to_string()) {
        return Err(Error::invalid_settings(format!(
            "duplicate {} name '{}'",
            kind, name
        )));
    }
    Ok(())
}

fn check_url(name: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| {
        Error::invalid_settings(format!("archive '{}' has an invalid URL: {}", name, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::invalid_settings(format!(
            "archive '{}' uses unsupported scheme '{}'",
            name, scheme
        ))),
    }
}

fn check_path(path: &Utf8Path) -> Result<()> {
    validate_relative(path)
}
