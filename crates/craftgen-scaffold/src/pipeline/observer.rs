//! Pipeline progress observation
//!
//! The runner reports step boundaries through [`PipelineObserver`]. The CLI
//! drives spinners from it; [`TracingObserver`] logs them.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::Error;

/// Callbacks at step boundaries
pub trait PipelineObserver: Send + Sync {
    /// Called before a step runs
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the step (1-indexed)
    /// * `total` - Number of steps in the pipeline
    /// * `name` - Step name
    /// * `description` - What the step is about to do
    fn on_step_start(&self, index: usize, total: usize, name: &str, description: &str);

    /// Called after a step returned success
    fn on_step_complete(&self, name: &str, elapsed: Duration);

    /// Called when a step fails; no further steps will run
    fn on_step_failed(&self, name: &str, error: &Error);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {
    fn on_step_start(&self, _index: usize, _total: usize, _name: &str, _description: &str) {}

    fn on_step_complete(&self, _name: &str, _elapsed: Duration) {}

    fn on_step_failed(&self, _name: &str, _error: &Error) {}
}

/// Observer that logs step events with `tracing`
///
/// # Log Levels
///
/// - `on_step_start`: INFO
/// - `on_step_complete`: DEBUG
/// - `on_step_failed`: ERROR
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_step_start(&self, index: usize, total: usize, name: &str, description: &str) {
        info!(step = name, "[{}/{}] {}", index, total, description);
    }

    fn on_step_complete(&self, name: &str, elapsed: Duration) {
        debug!(step = name, "Completed in {}ms", elapsed.as_millis());
    }

    fn on_step_failed(&self, name: &str, error: &Error) {
        error!(step = name, kind = error.kind(), "{}", error);
    }
}
