//! The scaffold command: gather answers, then run the pipeline

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use craftgen_core::config::load_answers;
use craftgen_core::{
    Error as CoreError, ProjectConfig, ProjectRoot, ScaffoldSettings, SettingsLoader,
};
use craftgen_scaffold::{
    build_pipeline, DirectoryTemplates, EmbeddedTemplates, Pipeline, PipelineObserver,
    PipelineOptions, RunOutcome, RunReport, StepContext, TemplateSource, TracingObserver,
};

use crate::cli::Cli;
use crate::output;
use crate::progress::SpinnerObserver;
use crate::prompts;

pub async fn run(cli: Cli) -> Result<()> {
    let (settings, settings_source) = SettingsLoader::new()
        .with_path(cli.settings.as_deref())
        .load()
        .context("Failed to load scaffold settings")?;

    let templates = template_source(&cli);
    let pipeline = build(&cli, &settings, Arc::clone(&templates))?;

    let root = ProjectRoot::new(cli.dest.clone().unwrap_or_else(|| Utf8PathBuf::from(".")))
        .context("Failed to resolve project directory")?;

    if cli.dry_run {
        output::plan(
            root.path().as_str(),
            &settings_source.to_string(),
            &templates.describe(),
            &pipeline.plan(),
        );
        return Ok(());
    }

    if !cli.quiet {
        output::banner("Welcome to the Craft CMS generator!");
    }

    let answers = match &cli.answers {
        Some(path) => load_answers(path)
            .with_context(|| format!("Failed to read answers from {}", path))?,
        None => prompts::ask()?,
    };
    let config = match ProjectConfig::from_answers(answers) {
        Ok(config) => config,
        Err(err @ CoreError::PromptRejected) => {
            output::license_declined();
            return Err(err.into());
        }
        Err(err) => return Err(anyhow::Error::new(err).context("Invalid project answers")),
    };

    std::fs::create_dir_all(root.path())
        .with_context(|| format!("Failed to create project directory {}", root.path()))?;
    let ctx = StepContext::new(config, root);

    if !cli.quiet {
        output::starting(&ctx.config().to_string(), ctx.root().path().as_str());
    }

    let observer: Arc<dyn PipelineObserver> = if cli.quiet || cli.verbose > 0 {
        Arc::new(TracingObserver)
    } else {
        Arc::new(SpinnerObserver::new())
    };

    let report = pipeline.with_observer(observer).run(&ctx).await;
    finish(report, cli.quiet)
}

fn template_source(cli: &Cli) -> Arc<dyn TemplateSource> {
    match &cli.templates {
        Some(dir) => Arc::new(DirectoryTemplates::new(dir.clone())),
        None => Arc::new(EmbeddedTemplates::new()),
    }
}

fn build(
    cli: &Cli,
    settings: &ScaffoldSettings,
    templates: Arc<dyn TemplateSource>,
) -> Result<Pipeline> {
    let options = PipelineOptions {
        skip_install: cli.skip_install,
    };
    build_pipeline(settings, templates, &options).context("Invalid scaffold settings")
}

/// Print the run summary and turn a failure into the command's error
fn finish(report: RunReport, quiet: bool) -> Result<()> {
    match report.outcome {
        RunOutcome::Success => {
            if !quiet {
                output::finished(report.completed.len(), report.elapsed);
            }
            Ok(())
        }
        RunOutcome::Failed { step, error } => {
            let done: Vec<_> = report.completed.iter().map(|s| s.name.as_str()).collect();
            output::interrupted(&done, &report.skipped);
            Err(anyhow::Error::new(error).context(format!("Step '{}' failed", step)))
        }
    }
}
