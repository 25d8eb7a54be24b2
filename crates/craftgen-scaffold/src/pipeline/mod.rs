//! Sequential step runner
//!
//! A [`Pipeline`] is an ordered list of [`Step`]s. Running it awaits each
//! step to completion before starting the next and stops at the first
//! failure. Completed steps are not rolled back; the [`RunReport`] records
//! which ones finished so the caller can tell the user what state the
//! project directory is in.

mod context;
mod observer;

pub use context::StepContext;
pub use observer::{NoOpObserver, PipelineObserver, TracingObserver};

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// One named unit of provisioning work
#[async_trait]
pub trait Step: Send + Sync {
    /// Stable, kebab-case name shown in reports
    fn name(&self) -> &str;

    /// One-line description of what the step will do
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Do the work. The step must be finished when this returns.
    async fn run(&self, ctx: &StepContext) -> Result<()>;
}

/// A step that finished successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStep {
    pub name: String,
    pub elapsed: Duration,
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    Success,
    Failed { step: String, error: Error },
}

/// Result of [`Pipeline::run`]
#[derive(Debug)]
pub struct RunReport {
    /// Steps that completed, in execution order
    pub completed: Vec<CompletedStep>,

    /// Steps that never started because an earlier one failed
    pub skipped: Vec<String>,

    pub outcome: RunOutcome,

    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success)
    }

    /// Name of the failed step, if any
    pub fn failed_step(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Success => None,
            RunOutcome::Failed { step, .. } => Some(step),
        }
    }

    /// Names of the completed steps
    pub fn completed_names(&self) -> Vec<&str> {
        self.completed.iter().map(|s| s.name.as_str()).collect()
    }

    /// Convert into a `Result`, wrapping a failure as [`Error::StepFailed`]
    pub fn into_result(self) -> Result<Vec<CompletedStep>> {
        match self.outcome {
            RunOutcome::Success => Ok(self.completed),
            RunOutcome::Failed { step, error } => Err(Error::step_failed(step, error)),
        }
    }
}

/// Ordered list of steps
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    /// Empty pipeline logging through [`TracingObserver`]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Append a step
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append a boxed step
    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// `(name, description)` pairs in execution order
    pub fn plan(&self) -> Vec<(String, String)> {
        self.steps
            .iter()
            .map(|s| (s.name().to_string(), s.describe()))
            .collect()
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run(&self, ctx: &StepContext) -> RunReport {
        let started = Instant::now();
        let total = self.steps.len();
        let mut completed = Vec::with_capacity(total);

        for (i, step) in self.steps.iter().enumerate() {
            let name = step.name().to_string();
            self.observer
                .on_step_start(i + 1, total, &name, &step.describe());

            let step_started = Instant::now();
            match step.run(ctx).await {
                Ok(()) => {
                    let elapsed = step_started.elapsed();
                    self.observer.on_step_complete(&name, elapsed);
                    completed.push(CompletedStep { name, elapsed });
                }
                Err(error) => {
                    self.observer.on_step_failed(&name, &error);
                    let skipped = self.steps[i + 1..]
                        .iter()
                        .map(|s| s.name().to_string())
                        .collect();
                    return RunReport {
                        completed,
                        skipped,
                        outcome: RunOutcome::Failed { step: name, error },
                        elapsed: started.elapsed(),
                    };
                }
            }
        }

        RunReport {
            completed,
            skipped: Vec::new(),
            outcome: RunOutcome::Success,
            elapsed: started.elapsed(),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
