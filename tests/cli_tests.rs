use assert_cmd::Command;
use predicates::prelude::*;
use release_conductor::state::{ConfigurationStore, FileConfigurationStore};
use release_conductor::ReleaseConfiguration;
use tempfile::TempDir;

fn conductor(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("release_conductor").expect("Binary exists");
    cmd.arg("--working-dir")
        .arg(dir.path())
        .env_remove("RELEASE_STATE_DIR")
        .env("RUST_LOG", "warn");
    cmd
}

async fn seed_record(dir: &TempDir, completed: &str) {
    let store = FileConfigurationStore::new(dir.path());
    let config = ReleaseConfiguration::new("org.example", "widget")
        .with_working_directory(dir.path())
        .with_scm_connection_url("scm:git:https://example.org/widget.git")
        .with_versions("1.0", "1.1-SNAPSHOT")
        .with_completed_phase(completed);
    store.write(&config).await.expect("seed record");
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().expect("tempdir");
    conductor(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("prepare")
                .and(predicate::str::contains("perform"))
                .and(predicate::str::contains("clean"))
                .and(predicate::str::contains("status")),
        );
}

#[test]
fn status_without_record_reports_fresh() {
    let dir = TempDir::new().expect("tempdir");
    conductor(&dir)
        .args(["status", "-g", "org.example", "-a", "widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No release in progress for org.example:widget"));
}

#[test]
fn status_json_without_record() {
    let dir = TempDir::new().expect("tempdir");
    conductor(&dir)
        .args(["status", "-g", "org.example", "-a", "widget", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "fresh""#));
}

#[tokio::test]
async fn status_reports_next_phase_of_interrupted_release() {
    let dir = TempDir::new().expect("tempdir");
    seed_record(&dir, "scm-check-modifications").await;

    conductor(&dir)
        .args(["status", "-g", "org.example", "-a", "widget", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""status": "in_progress""#)
                .and(predicate::str::contains("rewrite-poms-for-release")),
        );
}

#[tokio::test]
async fn status_reports_prepared_release() {
    let dir = TempDir::new().expect("tempdir");
    seed_record(&dir, "end-release").await;

    conductor(&dir)
        .args(["status", "-g", "org.example", "-a", "widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to perform"));
}

#[tokio::test]
async fn clean_removes_record_and_backup() {
    let dir = TempDir::new().expect("tempdir");
    seed_record(&dir, "rewrite-poms-for-release").await;
    std::fs::write(dir.path().join("pom.xml.releaseBackup"), "<project/>").expect("backup");

    conductor(&dir)
        .args(["clean", "-g", "org.example", "-a", "widget"])
        .assert()
        .success();

    assert!(!dir.path().join("release-org.example-widget.json").exists());
    assert!(!dir.path().join("pom.xml.releaseBackup").exists());
}

#[test]
fn clean_without_record_succeeds() {
    let dir = TempDir::new().expect("tempdir");
    conductor(&dir)
        .args(["clean", "-g", "org.example", "-a", "widget"])
        .assert()
        .success();
}

#[test]
fn state_dir_can_be_moved() {
    let dir = TempDir::new().expect("tempdir");
    let state = TempDir::new().expect("state tempdir");
    conductor(&dir)
        .arg("--state-dir")
        .arg(state.path())
        .args(["status", "-g", "org.example", "-a", "widget"])
        .assert()
        .success();
}

#[test]
fn blank_project_identity_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    conductor(&dir)
        .args(["status", "-g", "", "-a", "widget"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid arguments"));
}
