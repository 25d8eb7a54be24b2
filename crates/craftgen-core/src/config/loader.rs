//! Settings file loading
//!
//! Settings are resolved in order:
//! 1. An explicit path (`--settings` / `CRAFTGEN_SETTINGS`)
//! 2. `settings.yaml` in the user config directory, if present
//! 3. The defaults compiled into the binary

use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ProjectAnswers, ScaffoldSettings};

const EMBEDDED_SETTINGS: &str = include_str!("defaults.yaml");

const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Where a settings document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    Embedded,
    File(Utf8PathBuf),
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "built-in defaults"),
            Self::File(path) => write!(f, "{}", path),
        }
    }
}

/// Loads [`ScaffoldSettings`] from the first available source
#[derive(Debug, Default)]
pub struct SettingsLoader {
    explicit: Option<Utf8PathBuf>,
    user_dir: Option<Utf8PathBuf>,
}

impl SettingsLoader {
    /// Loader that also looks in the user's config directory
    pub fn new() -> Self {
        let user_dir = ProjectDirs::from("com", "line58", "craftgen")
            .and_then(|dirs| Utf8PathBuf::try_from(dirs.config_dir().to_path_buf()).ok());

        Self {
            explicit: None,
            user_dir,
        }
    }

    /// Use an explicit settings file; it must exist
    pub fn with_path(mut self, path: Option<&Utf8Path>) -> Self {
        self.explicit = path.map(Utf8Path::to_path_buf);
        self
    }

    /// Override the user config directory
    pub fn with_user_dir(mut self, dir: Option<Utf8PathBuf>) -> Self {
        self.user_dir = dir;
        self
    }

    /// The built-in defaults
    pub fn embedded() -> Result<ScaffoldSettings> {
        ScaffoldSettings::from_yaml(EMBEDDED_SETTINGS)
    }

    /// Resolve and load settings
    pub fn load(&self) -> Result<(ScaffoldSettings, SettingsSource)> {
        if let Some(path) = &self.explicit {
            return Ok((read_settings(path)?, SettingsSource::File(path.clone())));
        }

        if let Some(dir) = &self.user_dir {
            let path = dir.join(SETTINGS_FILE_NAME);
            if path.is_file() {
                return Ok((read_settings(&path)?, SettingsSource::File(path)));
            }
            debug!("No user settings at {}", path);
        }

        Ok((Self::embedded()?, SettingsSource::Embedded))
    }
}

fn read_settings(path: &Utf8Path) -> Result<ScaffoldSettings> {
    debug!("Loading settings from {}", path);
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::settings_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;
    ScaffoldSettings::from_yaml(&content)
}

/// Read a non-interactive answers file
pub fn load_answers(path: &Utf8Path) -> Result<ProjectAnswers> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::settings_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_yaml_ng::from_str(&content)?)
}
