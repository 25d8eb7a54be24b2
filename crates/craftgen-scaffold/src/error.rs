//! Error types for craftgen-scaffold
//!
//! Each pipeline stage has its own variant so a failed run names both the
//! step and the kind of work that broke. Lower-level causes (exit codes,
//! `io::Error`, `reqwest::Error`) are kept in the payload.

use thiserror::Error;

/// Result type alias using craftgen-scaffold's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a download failed
#[derive(Error, Debug)]
pub enum FetchCause {
    /// Server answered with a non-2xx status
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// Connection, TLS or timeout failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Writing the downloaded bytes failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Scaffold pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Archive download failed
    #[error("Failed to fetch {url}: {cause}")]
    Fetch {
        url: String,
        #[source]
        cause: FetchCause,
    },

    /// Archive expansion failed
    #[error("Failed to extract {archive_path}{}: {message}", exit_suffix(.exit_code))]
    Extract {
        archive_path: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// Directory copy failed
    #[error("Failed to copy {from} to {to}: {cause}")]
    Copy {
        from: String,
        to: String,
        #[source]
        cause: std::io::Error,
    },

    /// Removing a path failed for a reason other than absence
    #[error("Failed to remove {path}: {cause}")]
    Prune {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    /// Template references a variable that was not declared
    #[error("Template {source_path} references undeclared variable '{missing_variable}'")]
    Render {
        source_path: String,
        missing_variable: String,
    },

    /// Template source does not exist
    #[error("Template not found: {source_path}")]
    TemplateNotFound { source_path: String },

    /// Template file is not valid UTF-8
    #[error("Template {source_path} is not valid UTF-8")]
    InvalidTemplate { source_path: String },

    /// Writing a rendered or copied file failed
    #[error("Failed to write {path}: {cause}")]
    Write {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    /// Dependency installer failed
    #[error("Dependency installation `{command}` failed{}: {message}", exit_suffix(.exit_code))]
    Install {
        command: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// A pipeline step failed; wraps the step's own error
    #[error("Step '{step}' failed")]
    StepFailed {
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Core library error (configuration, project paths)
    #[error(transparent)]
    Core(#[from] craftgen_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" (exit code {})", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, cause: impl Into<FetchCause>) -> Self {
        Self::Fetch {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// Create an extract error
    pub fn extract(
        archive_path: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::Extract {
            archive_path: archive_path.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create a copy error
    pub fn copy(from: impl Into<String>, to: impl Into<String>, cause: std::io::Error) -> Self {
        Self::Copy {
            from: from.into(),
            to: to.into(),
            cause,
        }
    }

    /// Create a prune error
    pub fn prune(path: impl Into<String>, cause: std::io::Error) -> Self {
        Self::Prune {
            path: path.into(),
            cause,
        }
    }

    /// Create a render error for an undeclared variable
    pub fn render(source_path: impl Into<String>, missing_variable: impl Into<String>) -> Self {
        Self::Render {
            source_path: source_path.into(),
            missing_variable: missing_variable.into(),
        }
    }

    /// Create a template not found error
    pub fn template_not_found(source_path: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            source_path: source_path.into(),
        }
    }

    /// Create a write error
    pub fn write(path: impl Into<String>, cause: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            cause,
        }
    }

    /// Create an install error
    pub fn install(
        command: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::Install {
            command: command.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Wrap a step's error with the step name
    pub fn step_failed(step: impl Into<String>, source: Error) -> Self {
        Self::StepFailed {
            step: step.into(),
            source: Box::new(source),
        }
    }

    /// Short label for the failing stage, used in user-facing summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } | Self::Http(_) => "fetch",
            Self::Extract { .. } => "extract",
            Self::Copy { .. } => "copy",
            Self::Prune { .. } => "prune",
            Self::Render { .. } | Self::TemplateNotFound { .. } | Self::InvalidTemplate { .. } => {
                "render"
            }
            Self::Write { .. } | Self::Io(_) => "io",
            Self::Install { .. } => "install",
            Self::StepFailed { source, .. } => source.kind(),
            Self::Core(_) => "config",
        }
    }
}
