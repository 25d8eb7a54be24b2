//! Project fixtures: answers, roots and stand-in archives

use camino::{Utf8Path, Utf8PathBuf};
use craftgen_core::types::{LicenseAnswer, ProjectAnswers};
use craftgen_core::{ProjectConfig, ProjectRoot};
use craftgen_scaffold::StepContext;
use tempfile::TempDir;

use super::zip::stored_zip;

/// Temporary directory with a UTF-8 path
pub struct TestDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 temp path");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

pub fn acme_config() -> ProjectConfig {
    ProjectConfig::from_answers(ProjectAnswers {
        site_name: "Acme Widgets".to_string(),
        domain_name: "acme".to_string(),
        production_tld: None,
        staging_domain: None,
        accept_license: LicenseAnswer::Text("y".to_string()),
    })
    .expect("valid answers")
}

pub fn context_in(dir: &Utf8Path) -> StepContext {
    let root = ProjectRoot::new(dir).expect("project root");
    StepContext::new(acme_config(), root)
}

/// `unzip` is required by extraction tests; they are skipped without it
pub fn has_unzip() -> bool {
    which::which("unzip").is_ok()
}

/// Stand-in for the Craft download: the layout the prune list expects
pub fn craft_archive() -> Vec<u8> {
    stored_zip(&[
        ("craft/", ""),
        ("craft/app/", ""),
        ("craft/app/index.php", "<?php // app"),
        ("craft/config/", ""),
        ("craft/config/db.php", "<?php // stock d"),
        ("craft/config/general.php", "<?php // stock general"),
        ("craft/plugins/", ""),
        ("craft/templates/", ""),
        ("craft/templates/index.html", "stock index"),
        ("craft/web.config", "<configuration/>"),
        ("public/", ""),
        ("public/index.php", "<?php // front controller"),
        ("public/htaccess", "# stock"),
        ("public/web.config", "<configuration/>"),
    ])
}

/// Stand-in for the Parsedown plugin download
pub fn parsedown_archive() -> Vec<u8> {
    stored_zip(&[
        ("Parsedown-master/", ""),
        ("Parsedown-master/README.md", "# Parsedown"),
        ("Parsedown-master/parsedown/", ""),
        (
            "Parsedown-master/parsedown/ParsedownPlugin.php",
            "<?php class ParsedownPlugin {}",
        ),
        ("Parsedown-master/parsedown/vendor/", ""),
        (
            "Parsedown-master/parsedown/vendor/Parsedown.php",
            "<?php class Parsedown {}",
        ),
    ])
}
