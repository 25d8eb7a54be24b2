//! Archive expansion through the system `unzip` utility
//!
//! The archive is listed first (`unzip -Z1`) to learn its root entries and to
//! reject a corrupt file before anything is written, then expanded with
//! `unzip -o -q <archive> -d <dir>`. Entries keep their archive paths; nothing
//! is renamed afterwards.

use std::collections::BTreeSet;
use std::process::Stdio;
use std::time::Duration;

use camino::Utf8Path;
use craftgen_core::types::ExtractSettings;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Runs the configured decompressor
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    program: String,
    timeout: Option<Duration>,
}

impl ArchiveExtractor {
    pub fn new(settings: &ExtractSettings) -> Self {
        Self {
            program: settings.program.clone(),
            timeout: settings.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Expand `archive` into `working_dir`.
    ///
    /// Returns the set of top-level names the archive contains.
    pub async fn extract(
        &self,
        archive: &Utf8Path,
        working_dir: &Utf8Path,
    ) -> Result<BTreeSet<String>> {
        if !archive.is_file() {
            return Err(Error::extract(archive.as_str(), None, "archive not found"));
        }

        tokio::fs::create_dir_all(working_dir).await.map_err(|e| {
            Error::extract(
                archive.as_str(),
                None,
                format!("cannot create {}: {}", working_dir, e),
            )
        })?;

        let listing = self.run(archive, &["-Z1", archive.as_str()]).await?;
        let roots = root_entries(&listing);
        debug!("{} contains {:?}", archive, roots);

        info!("Extracting {} into {}", archive, working_dir);
        self.run(
            archive,
            &["-o", "-q", archive.as_str(), "-d", working_dir.as_str()],
        )
        .await?;

        Ok(roots)
    }

    async fn run(&self, archive: &Utf8Path, args: &[&str]) -> Result<String> {
        debug!("Running: {} {}", self.program, args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                Error::extract(
                    archive.as_str(),
                    None,
                    format!("{} timed out after {}s", self.program, limit.as_secs()),
                )
            })?,
            None => output.await,
        }
        .map_err(|e| {
            Error::extract(
                archive.as_str(),
                None,
                format!("failed to run {}: {}", self.program, e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::extract(
                archive.as_str(),
                output.status.code(),
                message,
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// First path component of every listed entry
fn root_entries(listing: &str) -> BTreeSet<String> {
    listing
        .lines()
        .filter_map(|line| line.trim_start_matches("./").split('/').next())
        .filter(|root| !root.is_empty())
        .map(str::to_string)
        .collect()
}
