//! State shared with every step of a run

use craftgen_core::{ProjectConfig, ProjectRoot};

/// Read-only inputs of a pipeline run
#[derive(Debug, Clone)]
pub struct StepContext {
    config: ProjectConfig,
    root: ProjectRoot,
}

impl StepContext {
    /// Build the context for a run. A [`ProjectConfig`] only exists once
    /// the license has been accepted.
    pub fn new(config: ProjectConfig, root: ProjectRoot) -> Self {
        Self { config, root }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }
}
