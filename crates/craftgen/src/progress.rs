//! Spinner-driven pipeline progress

use std::sync::Mutex;
use std::time::Duration;

use craftgen_scaffold::{Error, PipelineObserver};
use indicatif::ProgressBar;

use crate::output;

/// Shows one spinner per running step and a ✓/✗ line when it ends
#[derive(Default)]
pub struct SpinnerObserver {
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Option<ProgressBar> {
        self.current.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl PipelineObserver for SpinnerObserver {
    fn on_step_start(&self, index: usize, total: usize, _name: &str, description: &str) {
        let spinner = output::step_spinner(index, total, description);
        if let Ok(mut slot) = self.current.lock() {
            if let Some(previous) = slot.replace(spinner) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_step_complete(&self, name: &str, elapsed: Duration) {
        if let Some(spinner) = self.take() {
            spinner.finish_and_clear();
        }
        output::step_done(name, elapsed);
    }

    fn on_step_failed(&self, name: &str, _error: &Error) {
        if let Some(spinner) = self.take() {
            spinner.finish_and_clear();
        }
        output::step_failed(name);
    }
}
