//! # craftgen-scaffold
//!
//! Provisioning pipeline for craftgen providing:
//! - Archive download and extraction
//! - Plugin copy and default-file pruning
//! - Template rendering into the new project
//! - Dependency installation
//!
//! Steps run strictly one after another; each finishes before the next
//! starts.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use craftgen_core::{ProjectConfig, ProjectRoot, SettingsLoader};
//! use craftgen_core::types::{LicenseAnswer, ProjectAnswers};
//! use craftgen_scaffold::{build_pipeline, EmbeddedTemplates, PipelineOptions, StepContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProjectConfig::from_answers(ProjectAnswers {
//!     site_name: "Acme Widgets".to_string(),
//!     domain_name: "acme".to_string(),
//!     production_tld: None,
//!     staging_domain: None,
//!     accept_license: LicenseAnswer::Flag(true),
//! })?;
//! let ctx = StepContext::new(config, ProjectRoot::new("/srv/acme")?);
//!
//! let settings = SettingsLoader::embedded()?;
//! let pipeline = build_pipeline(
//!     &settings,
//!     Arc::new(EmbeddedTemplates::new()),
//!     &PipelineOptions::default(),
//! )?;
//!
//! let report = pipeline.run(&ctx).await;
//! println!("completed: {:?}", report.completed_names());
//! report.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod copy;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod prune;
pub mod steps;
pub mod templates;

pub use error::{Error, Result};
pub use pipeline::{
    CompletedStep, NoOpObserver, Pipeline, PipelineObserver, RunOutcome, RunReport, Step,
    StepContext, TracingObserver,
};
pub use steps::{build_pipeline, PipelineOptions};
pub use templates::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
