//! Type definitions shared by the scaffold pipeline and the CLI

mod project;
mod settings;

pub use project::{
    Acceptance, LicenseAnswer, ProjectAnswers, ProjectConfig, DEFAULT_PRODUCTION_TLD,
    DEFAULT_STAGING_DOMAIN,
};
pub use settings::{
    ArchiveSettings, CopySettings, EntryKind, ExtractSettings, InstallCommand, NetworkSettings,
    ScaffoldSettings, TemplateEntry,
};
