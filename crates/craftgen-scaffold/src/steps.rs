//! The scaffold's pipeline steps and the builder that orders them
//!
//! Order, for settings with archives `a` and `b`:
//! `fetch-a`, `extract-a`, `fetch-b`, `extract-b`, `copy-*`,
//! `prune-defaults`, `render-templates`, `install-dependencies`.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use craftgen_core::types::{
    ArchiveSettings, CopySettings, InstallCommand, ScaffoldSettings, TemplateEntry,
};
use tokio::process::Command;
use tracing::{debug, info};

use crate::copy::copy_tree;
use crate::error::{Error, Result};
use crate::extract::ArchiveExtractor;
use crate::fetch::ArchiveFetcher;
use crate::pipeline::{Pipeline, Step, StepContext};
use crate::prune::Pruner;
use crate::templates::{TemplateRenderer, TemplateSource, TemplateSpec};

/// Download one archive into the project
#[derive(Debug)]
pub struct FetchArchive {
    name: String,
    archive: ArchiveSettings,
    fetcher: ArchiveFetcher,
}

impl FetchArchive {
    pub fn new(archive: ArchiveSettings, fetcher: ArchiveFetcher) -> Self {
        Self {
            name: format!("fetch-{}", archive.name),
            archive,
            fetcher,
        }
    }
}

#[async_trait]
impl Step for FetchArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("Downloading {} archive", self.archive.name)
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        let dest = ctx.root().resolve(&self.archive.path)?;
        self.fetcher.fetch(&self.archive.url, &dest).await?;
        Ok(())
    }
}

/// Expand a previously fetched archive
#[derive(Debug)]
pub struct ExtractArchive {
    name: String,
    archive: ArchiveSettings,
    extractor: ArchiveExtractor,
}

impl ExtractArchive {
    pub fn new(archive: ArchiveSettings, extractor: ArchiveExtractor) -> Self {
        Self {
            name: format!("extract-{}", archive.name),
            archive,
            extractor,
        }
    }
}

#[async_trait]
impl Step for ExtractArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("Unzipping {} archive", self.archive.name)
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        let archive = ctx.root().resolve(&self.archive.path)?;
        let working_dir = ctx.root().resolve(&self.archive.extract_to)?;
        let roots = self.extractor.extract(&archive, &working_dir).await?;
        info!(
            "Extracted {}: {}",
            self.archive.name,
            roots.into_iter().collect::<Vec<_>>().join(", ")
        );
        Ok(())
    }
}

/// Copy a directory from an expanded archive into place
#[derive(Debug)]
pub struct CopyTree {
    name: String,
    copy: CopySettings,
}

impl CopyTree {
    pub fn new(copy: CopySettings) -> Self {
        Self {
            name: format!("copy-{}", copy.name),
            copy,
        }
    }
}

#[async_trait]
impl Step for CopyTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("Copying {} to {}", self.copy.from, self.copy.to)
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        let from = ctx.root().resolve(&self.copy.from)?;
        let to = ctx.root().resolve(&self.copy.to)?;
        let copied = copy_tree(&from, &to)?;
        info!(
            "Copied {} files to {}",
            copied,
            ctx.root().display_relative(&to)
        );
        Ok(())
    }
}

/// Remove the defaults the archives ship with, and the archives themselves
#[derive(Debug)]
pub struct PruneDefaults {
    paths: Vec<Utf8PathBuf>,
    if_empty: Vec<Utf8PathBuf>,
}

impl PruneDefaults {
    pub const NAME: &'static str = "prune-defaults";

    /// `paths` are removed outright; `if_empty` directories only when
    /// nothing is left in them.
    pub fn new(paths: Vec<Utf8PathBuf>, if_empty: Vec<Utf8PathBuf>) -> Self {
        Self { paths, if_empty }
    }
}

#[async_trait]
impl Step for PruneDefaults {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn describe(&self) -> String {
        format!("Cleaning up {} default paths", self.paths.len())
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        let root = ctx.root();
        let resolve = |paths: &[Utf8PathBuf]| {
            paths
                .iter()
                .map(|p| root.resolve(p))
                .collect::<std::result::Result<Vec<_>, _>>()
        };
        let paths = resolve(&self.paths)?;
        let if_empty = resolve(&self.if_empty)?;

        let pruner = Pruner::new();
        let removed = pruner.prune(&paths)?;
        info!("Removed {} of {} default paths", removed, paths.len());

        pruner.prune_if_empty(&if_empty)?;
        for dir in if_empty.iter().filter(|dir| dir.exists()) {
            info!("Kept {}: not empty", root.display_relative(dir));
        }
        Ok(())
    }
}

/// Render the template manifest and create empty project directories
#[derive(Debug)]
pub struct RenderTemplates {
    entries: Vec<TemplateEntry>,
    directories: Vec<Utf8PathBuf>,
    source: Arc<dyn TemplateSource>,
}

impl RenderTemplates {
    pub const NAME: &'static str = "render-templates";

    pub fn new(
        entries: Vec<TemplateEntry>,
        directories: Vec<Utf8PathBuf>,
        source: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            entries,
            directories,
            source,
        }
    }
}

#[async_trait]
impl Step for RenderTemplates {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn describe(&self) -> String {
        format!("Writing project files from {}", self.source.describe())
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        let variables = ctx.config().template_vars();
        let specs = self
            .entries
            .iter()
            .map(|entry| TemplateSpec::from_entry(entry, ctx.root(), &variables))
            .collect::<Result<Vec<_>>>()?;

        let written = TemplateRenderer::new(self.source.as_ref()).render(&specs)?;
        info!("Wrote {} project files", written);

        for dir in &self.directories {
            let path = ctx.root().resolve(dir)?;
            std::fs::create_dir_all(&path).map_err(|e| Error::write(path.as_str(), e))?;
            debug!("Created directory {}", ctx.root().display_relative(&path));
        }

        Ok(())
    }
}

/// Run the dependency installers in the project root
#[derive(Debug)]
pub struct InstallDependencies {
    commands: Vec<InstallCommand>,
}

impl InstallDependencies {
    pub const NAME: &'static str = "install-dependencies";

    pub fn new(commands: Vec<InstallCommand>) -> Self {
        Self { commands }
    }
}

#[async_trait]
impl Step for InstallDependencies {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn describe(&self) -> String {
        let commands: Vec<_> = self.commands.iter().map(InstallCommand::display).collect();
        format!("Installing dependencies ({})", commands.join(", "))
    }

    async fn run(&self, ctx: &StepContext) -> Result<()> {
        for command in &self.commands {
            run_installer(command, ctx).await?;
        }
        Ok(())
    }
}

async fn run_installer(command: &InstallCommand, ctx: &StepContext) -> Result<()> {
    let shown = command.display();

    let program = which::which(&command.program).map_err(|_| {
        Error::install(
            &shown,
            None,
            format!("'{}' not found in PATH", command.program),
        )
    })?;

    debug!("Running: {} in {}", shown, ctx.root().path());
    let output = Command::new(program)
        .args(&command.args)
        .current_dir(ctx.root().path())
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::install(&shown, None, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::install(
            &shown,
            output.status.code(),
            tail(&stderr, 20),
        ));
    }

    info!("{} finished", shown);
    Ok(())
}

/// Last `lines` lines of `text`, trimmed
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

/// Options that change which steps a pipeline contains
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Leave out `install-dependencies`
    pub skip_install: bool,
}

/// Build the scaffold pipeline described by `settings`
pub fn build_pipeline(
    settings: &ScaffoldSettings,
    templates: Arc<dyn TemplateSource>,
    options: &PipelineOptions,
) -> Result<Pipeline> {
    settings.validate()?;

    let fetcher = ArchiveFetcher::new(&settings.network)?;
    let extractor = ArchiveExtractor::new(&settings.extract);
    let mut pipeline = Pipeline::new();

    for archive in &settings.archives {
        pipeline.push(Box::new(FetchArchive::new(archive.clone(), fetcher.clone())));
        pipeline.push(Box::new(ExtractArchive::new(
            archive.clone(),
            extractor.clone(),
        )));
    }

    for copy in &settings.copies {
        pipeline.push(Box::new(CopyTree::new(copy.clone())));
    }

    pipeline.push(Box::new(PruneDefaults::new(
        settings.prune.clone(),
        settings.prune_if_empty.clone(),
    )));
    pipeline.push(Box::new(RenderTemplates::new(
        settings.templates.clone(),
        settings.directories.clone(),
        templates,
    )));

    if !options.skip_install && !settings.install.is_empty() {
        pipeline.push(Box::new(InstallDependencies::new(settings.install.clone())));
    }

    Ok(pipeline)
}
