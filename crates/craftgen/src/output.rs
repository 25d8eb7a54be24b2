//! What the scaffold command prints
//!
//! Progress and results go to stdout; anything that explains a failure goes
//! to stderr so `craftgen ... 2>err.log` keeps the reason.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn done_mark() -> StyledObject<&'static str> {
    style("✓").green().bold()
}

fn failed_mark() -> StyledObject<&'static str> {
    style("✗").red().bold()
}

/// Title line before the prompts
pub fn banner(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

/// The `--dry-run` listing: where the run would write and what it would do
pub fn plan(project: &str, settings: &str, templates: &str, steps: &[(String, String)]) {
    banner("Scaffold plan");
    for (label, value) in [
        ("Project", project),
        ("Settings", settings),
        ("Templates", templates),
    ] {
        println!("  {}: {}", style(label).dim(), value);
    }
    println!();
    for (i, (name, description)) in steps.iter().enumerate() {
        println!(
            "  {:>2}. {:<22} {}",
            i + 1,
            style(name).cyan(),
            description
        );
    }
}

/// Announce the project about to be written
pub fn starting(project: &str, root: &str) {
    println!("{} Scaffolding {} into {}", style("→").blue().bold(), project, root);
}

/// Spinner for a running step, labelled `[index/total]`
pub fn step_spinner(index: usize, total: usize, description: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {prefix:.dim} {msg}") {
        pb.set_style(template.tick_chars(SPINNER_TICKS));
    }
    pb.set_prefix(format!("[{}/{}]", index, total));
    pb.set_message(description.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn step_done(name: &str, elapsed: Duration) {
    println!("{} {} {}", done_mark(), name, style(duration(elapsed)).dim());
}

pub fn step_failed(name: &str) {
    eprintln!("{} {}", failed_mark(), name);
}

pub fn license_declined() {
    eprintln!(
        "{} The Craft license was not accepted; nothing was written.",
        failed_mark()
    );
}

pub fn finished(steps: usize, elapsed: Duration) {
    println!(
        "{} Project ready: {} steps in {}",
        done_mark(),
        steps,
        duration(elapsed)
    );
}

/// What a failed run got through, and what it never reached
pub fn interrupted(completed: &[&str], skipped: &[String]) {
    if !completed.is_empty() {
        eprintln!("  {}: {}", style("Completed").dim(), completed.join(", "));
    }
    if !skipped.is_empty() {
        eprintln!(
            "  {}: {}",
            style("Not run").yellow(),
            skipped.join(", ")
        );
    }
}

/// Format a step duration, e.g. `850ms` or `12.3s`
fn duration(elapsed: Duration) -> String {
    if elapsed.as_secs() == 0 {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
