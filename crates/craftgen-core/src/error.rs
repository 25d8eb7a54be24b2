//! Error types for craftgen-core

use thiserror::Error;

/// Result type alias using craftgen-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for craftgen
#[derive(Error, Debug)]
pub enum Error {
    /// The license prompt was answered with a decline
    #[error("You must accept the terms of the Craft license to run this generator")]
    PromptRejected,

    /// An answer could not be interpreted
    #[error("Invalid answer '{answer}' for {field}: expected one of {expected}")]
    InvalidAnswer {
        field: String,
        answer: String,
        expected: String,
    },

    /// Required answer is empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Settings file not found
    #[error("Settings file not found: {path}")]
    SettingsNotFound { path: String },

    /// Settings are structurally valid YAML but semantically wrong
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// Path escapes or is not relative to the project root
    #[error("Invalid project path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid answer error
    pub fn invalid_answer(
        field: impl Into<String>,
        answer: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidAnswer {
            field: field.into(),
            answer: answer.into(),
            expected: expected.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a settings not found error
    pub fn settings_not_found(path: impl Into<String>) -> Self {
        Self::SettingsNotFound { path: path.into() }
    }

    /// Create an invalid settings error
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
