//! End-to-end scaffold tests
//!
//! Archives are served by a local wiremock server. Tests that extract need
//! the system `unzip` and return early when it is not installed.

mod common;

use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use common::*;
use craftgen_core::types::{InstallCommand, NetworkSettings, ScaffoldSettings};
use craftgen_core::SettingsLoader;
use craftgen_scaffold::error::FetchCause;
use craftgen_scaffold::extract::ArchiveExtractor;
use craftgen_scaffold::fetch::ArchiveFetcher;
use craftgen_scaffold::steps::{InstallDependencies, PruneDefaults, RenderTemplates};
use craftgen_scaffold::{
    build_pipeline, DirectoryTemplates, EmbeddedTemplates, Error, NoOpObserver, Pipeline,
    PipelineOptions, RunOutcome,
};
use wiremock::MockServer;

/// Embedded settings with archive URLs pointed at `server`
fn settings_for(server: &MockServer) -> ScaffoldSettings {
    let mut settings = SettingsLoader::embedded().unwrap();
    for archive in &mut settings.archives {
        archive.url = match archive.name.as_str() {
            "craft" => format!("{}/latest.zip?accept_license=yes", server.uri()),
            "parsedown" => format!("{}/Parsedown/archive/master.zip", server.uri()),
            other => panic!("unexpected archive {other}"),
        };
    }
    settings
}

async fn archive_server() -> MockServer {
    let server = MockServer::start().await;
    mock_archive(&server, "/latest.zip", craft_archive()).await;
    mock_archive(&server, "/Parsedown/archive/master.zip", parsedown_archive()).await;
    server
}

fn skip_install() -> PipelineOptions {
    PipelineOptions { skip_install: true }
}

#[tokio::test]
async fn test_fetch_writes_archive() {
    let server = MockServer::start().await;
    mock_archive(&server, "/master.zip", parsedown_archive()).await;
    let dir = TestDir::new();
    let dest = dir.path().join("tmp/master.zip");

    let fetcher = ArchiveFetcher::new(&NetworkSettings::default()).unwrap();
    let written = fetcher
        .fetch(&format!("{}/master.zip", server.uri()), &dest)
        .await
        .unwrap();

    assert_eq!(written, dest);
    assert_eq!(fs::read(&dest).unwrap(), parsedown_archive());
    assert!(!dir.path().join("tmp/master.zip.part").exists());
}

#[tokio::test]
async fn test_fetch_rejects_error_status() {
    let server = MockServer::start().await;
    mock_status(&server, "/latest.zip", 404).await;
    let dir = TestDir::new();
    let dest = dir.path().join("tmp/Craft.zip");

    let fetcher = ArchiveFetcher::new(&NetworkSettings::default()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/latest.zip", server.uri()), &dest)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch {
            cause: FetchCause::Status(404),
            ..
        }
    ));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_fetch_into_unwritable_location_is_io_error() {
    let server = MockServer::start().await;
    mock_archive(&server, "/master.zip", parsedown_archive()).await;
    let dir = TestDir::new();
    fs::write(dir.path().join("tmp"), "a file where a directory should be").unwrap();
    let dest = dir.path().join("tmp/master.zip");

    let fetcher = ArchiveFetcher::new(&NetworkSettings::default()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/master.zip", server.uri()), &dest)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch {
            cause: FetchCause::Io(_),
            ..
        }
    ));
    assert!(dir.path().join("tmp").is_file());
}

#[tokio::test]
async fn test_extract_into_unusable_directory_has_no_exit_code() {
    let dir = TestDir::new();
    let archive = dir.path().join("master.zip");
    fs::write(&archive, parsedown_archive()).unwrap();
    fs::write(dir.path().join("site"), "not a directory").unwrap();

    let err = ArchiveExtractor::new(&Default::default())
        .extract(&archive, &dir.path().join("site/nested"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Extract { exit_code: None, .. }));
}

#[tokio::test]
async fn test_prune_defaults_keep_user_files_in_tmp() {
    let settings = SettingsLoader::embedded().unwrap();
    let dir = TestDir::new();
    let root = dir.path();
    fs::create_dir_all(root.join("tmp")).unwrap();
    fs::write(root.join("tmp/Craft.zip"), "zip").unwrap();
    fs::write(root.join("tmp/user-notes.txt"), "do not lose me").unwrap();
    fs::create_dir_all(root.join("craft/templates")).unwrap();

    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(PruneDefaults::new(settings.prune, settings.prune_if_empty))
        .run(&context_in(root))
        .await;

    assert!(report.is_success(), "{:?}", report.outcome);
    assert!(!root.join("tmp/Craft.zip").exists());
    assert!(!root.join("craft/templates").exists());
    assert_eq!(
        fs::read_to_string(root.join("tmp/user-notes.txt")).unwrap(),
        "do not lose me"
    );
}

#[tokio::test]
async fn test_prune_failure_is_reported_with_path() {
    let dir = TestDir::new();
    fs::write(dir.path().join("craft"), "a file where a directory should be").unwrap();

    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(PruneDefaults::new(
            vec![Utf8PathBuf::from("craft/web.config")],
            Vec::new(),
        ))
        .run(&context_in(dir.path()))
        .await;

    match report.outcome {
        RunOutcome::Failed { error, step } => {
            assert_eq!(step, "prune-defaults");
            assert!(matches!(
                error,
                Error::Prune { ref path, .. } if path.ends_with("craft/web.config")
            ));
        }
        RunOutcome::Success => panic!("expected prune failure"),
    }
}

#[tokio::test]
async fn test_extract_lists_root_entries() {
    if !has_unzip() {
        eprintln!("unzip not installed; skipping");
        return;
    }
    let dir = TestDir::new();
    let archive = dir.path().join("master.zip");
    fs::write(&archive, parsedown_archive()).unwrap();

    let extractor = ArchiveExtractor::new(&Default::default());
    let roots = extractor.extract(&archive, dir.path()).await.unwrap();

    assert_eq!(roots.into_iter().collect::<Vec<_>>(), vec!["Parsedown-master"]);
    assert!(dir
        .path()
        .join("Parsedown-master/parsedown/ParsedownPlugin.php")
        .is_file());
}

#[tokio::test]
async fn test_extract_corrupt_archive_fails() {
    if !has_unzip() {
        eprintln!("unzip not installed; skipping");
        return;
    }
    let dir = TestDir::new();
    let archive = dir.path().join("tmp/Craft.zip");
    fs::create_dir_all(archive.parent().unwrap()).unwrap();
    fs::write(&archive, "<html>not a zip</html>").unwrap();

    let err = ArchiveExtractor::new(&Default::default())
        .extract(&archive, dir.path())
        .await
        .unwrap_err();

    match err {
        Error::Extract { exit_code, .. } => assert!(exit_code.is_some_and(|c| c != 0)),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_full_scaffold() {
    if !has_unzip() {
        eprintln!("unzip not installed; skipping");
        return;
    }
    let server = archive_server().await;
    let dir = TestDir::new();
    let root = dir.path();

    let pipeline = build_pipeline(
        &settings_for(&server),
        Arc::new(EmbeddedTemplates::new()),
        &skip_install(),
    )
    .unwrap()
    .with_observer(Arc::new(NoOpObserver));

    let report = pipeline.run(&context_in(root)).await;
    assert!(report.is_success(), "{:?}", report.outcome);
    assert_eq!(report.completed.len(), 7);

    // pruned
    for gone in [
        "tmp",
        "master.zip",
        "Parsedown-master",
        "craft/web.config",
        "public/web.config",
        "public/htaccess",
    ] {
        assert!(!root.join(gone).exists(), "{gone} should be removed");
    }

    // kept from the archives
    assert!(root.join("craft/app/index.php").is_file());
    assert!(root.join("public/index.php").is_file());
    assert!(root
        .join("craft/plugins/parsedown/ParsedownPlugin.php")
        .is_file());
    assert!(root
        .join("craft/plugins/parsedown/vendor/Parsedown.php")
        .is_file());

    // rendered
    let db = fs::read_to_string(root.join("craft/config/db.php")).unwrap();
    assert!(db.contains("'acme.com' => array("));
    assert!(db.contains("'line58.com' => array("));
    assert!(!db.contains("${"));

    let general = fs::read_to_string(root.join("craft/config/general.php")).unwrap();
    assert!(general.contains("http://www.acme.com/"));
    assert!(general.contains("http://acme.line58.com/"));

    let package = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(package.contains("\"name\": \"acme\""));
    assert!(package.contains("Acme Widgets website"));

    let gulpfile = fs::read_to_string(root.join("gulpfile.js")).unwrap();
    assert!(gulpfile.contains("proxy: 'acme.dev'"));

    // copied verbatim
    for file in [".editorconfig", ".jshintrc", ".gitignore", "public/.htaccess"] {
        assert!(root.join(file).is_file(), "{file}");
    }
    assert!(root.join("public/ui/css/main.css").is_file());
    assert!(root.join("src/scss/main.scss").is_file());

    let index = fs::read_to_string(root.join("craft/templates/index.html")).unwrap();
    assert!(index.contains("{{ siteName }}"));
    assert!(root.join("public/images/cache").is_dir());
}

#[tokio::test]
async fn test_scaffold_twice_in_same_directory() {
    if !has_unzip() {
        eprintln!("unzip not installed; skipping");
        return;
    }
    let server = archive_server().await;
    let dir = TestDir::new();
    let settings = settings_for(&server);

    for _ in 0..2 {
        let pipeline = build_pipeline(&settings, Arc::new(EmbeddedTemplates::new()), &skip_install())
            .unwrap()
            .with_observer(Arc::new(NoOpObserver));
        let report = pipeline.run(&context_in(dir.path())).await;
        assert!(report.is_success(), "{:?}", report.outcome);
    }

    assert!(dir.path().join("craft/config/db.php").is_file());
    assert!(!dir.path().join("master.zip").exists());
}

#[tokio::test]
async fn test_download_failure_stops_before_extract() {
    let server = MockServer::start().await;
    mock_status(&server, "/latest.zip", 500).await;
    let dir = TestDir::new();

    let pipeline = build_pipeline(
        &settings_for(&server),
        Arc::new(EmbeddedTemplates::new()),
        &skip_install(),
    )
    .unwrap()
    .with_observer(Arc::new(NoOpObserver));

    let report = pipeline.run(&context_in(dir.path())).await;

    assert_eq!(report.failed_step(), Some("fetch-craft"));
    assert!(report.completed.is_empty());
    assert_eq!(report.skipped.first().map(String::as_str), Some("extract-craft"));
    assert!(!dir.path().join("craft").exists());
    assert!(!dir.path().join("package.json").exists());
}

#[tokio::test]
async fn test_render_fails_on_undeclared_variable() {
    let templates = TestDir::new();
    fs::write(templates.path().join("_db.php"), "user=${dbUser}").unwrap();

    let mut settings = SettingsLoader::embedded().unwrap();
    settings.templates.retain(|t| t.source == "_db.php");
    let step = RenderTemplates::new(
        settings.templates,
        Vec::new(),
        Arc::new(DirectoryTemplates::new(templates.path())),
    );

    let dir = TestDir::new();
    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(step)
        .run(&context_in(dir.path()))
        .await;

    match report.outcome {
        RunOutcome::Failed { error, step } => {
            assert_eq!(step, "render-templates");
            assert!(matches!(
                error,
                Error::Render { ref missing_variable, .. } if missing_variable == "dbUser"
            ));
        }
        RunOutcome::Success => panic!("expected render failure"),
    }
    assert!(!dir.path().join("craft/config/db.php").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_failure_reports_exit_code() {
    let dir = TestDir::new();
    let step = InstallDependencies::new(vec![InstallCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "echo 'npm ERR! boom' >&2; exit 3".to_string()],
    }]);

    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(step)
        .run(&context_in(dir.path()))
        .await;

    match report.outcome {
        RunOutcome::Failed { error, .. } => match error {
            Error::Install {
                exit_code, message, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert!(message.contains("npm ERR! boom"));
            }
            other => panic!("unexpected error: {other}"),
        },
        RunOutcome::Success => panic!("expected install failure"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_runs_in_project_root() {
    let dir = TestDir::new();
    let step = InstallDependencies::new(vec![InstallCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "touch installed.marker".to_string()],
    }]);

    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(step)
        .run(&context_in(dir.path()))
        .await;

    assert!(report.is_success(), "{:?}", report.outcome);
    assert!(dir.path().join("installed.marker").is_file());
}

#[tokio::test]
async fn test_install_missing_program() {
    let dir = TestDir::new();
    let step = InstallDependencies::new(vec![InstallCommand {
        program: "craftgen-no-such-installer".to_string(),
        args: Vec::new(),
    }]);

    let report = Pipeline::new()
        .with_observer(Arc::new(NoOpObserver))
        .with_step(step)
        .run(&context_in(dir.path()))
        .await;

    match report.outcome {
        RunOutcome::Failed { error, .. } => {
            assert!(matches!(error, Error::Install { exit_code: None, .. }));
        }
        RunOutcome::Success => panic!("expected install failure"),
    }
}

#[test]
fn test_custom_settings_change_the_plan() {
    let yaml = r#"
archives:
  - name: theme
    url: https://example.test/theme.zip
    path: theme.zip
prune:
  - theme.zip
templates:
  - source: gitignore
    dest: .gitignore
"#;
    let settings = ScaffoldSettings::from_yaml(yaml).unwrap();
    let pipeline = build_pipeline(
        &settings,
        Arc::new(DirectoryTemplates::new(Utf8PathBuf::from("unused"))),
        &PipelineOptions::default(),
    )
    .unwrap();

    assert_eq!(
        pipeline.step_names(),
        vec!["fetch-theme", "extract-theme", "prune-defaults", "render-templates"]
    );
}
