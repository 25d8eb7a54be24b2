//! # craftgen-core
//!
//! Core library for craftgen providing:
//! - The immutable project configuration gathered at startup
//! - Scaffold settings (archive URLs, prune list, template manifest)
//! - Project-root path resolution

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::SettingsLoader;
pub use error::{Error, Result};
pub use paths::ProjectRoot;
pub use types::{ProjectConfig, ScaffoldSettings};
