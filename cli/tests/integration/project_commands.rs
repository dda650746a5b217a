//! Integration tests for project commands against a temporary local store.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn asyd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("asyd"));
    cmd.env("NO_COLOR", "1")
        .env("ASYD_HOME", home)
        .env_remove("ASYD_LOG")
        .env_remove("ASYD_TIMEOUT");
    cmd
}

fn write_config(home: &Path, name: &str, body: &str) {
    let dir = home.join(name);
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("config.cfg"), body).expect("write config");
}

const API_CFG: &str = "\
config_type=server
project_description=Public API
service_username=sudo
server_hostname=deploy@example.com
working_directory=/home/me/api
entry_point=start.sh
server_home_directory=/home/deploy
server_shell_path=/usr/bin/bash
deployed_at=
";

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

// --- new ---

#[test]
fn test_new_rejects_traversal_name_without_side_effects() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let home = tmp.path().join("store");

    asyd(&home)
        .args([
            "new", "server", "../evil", "-y", "--host", "me@box", "--workdir", "/srv/app",
            "--entry", "start.sh",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project name"));

    assert!(!home.exists());
    assert!(!tmp.path().join("evil").exists());
}

#[test]
fn test_new_job_without_schedule_fails_non_interactively() {
    let tmp = tempfile::tempdir().expect("tempdir");

    asyd(tmp.path())
        .args([
            "new", "job", "nightly", "-y", "--host", "me@box", "--workdir", "/srv/app",
            "--entry", "run.sh",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Schedule"));

    assert_eq!(entries(tmp.path()), 0);
}

#[test]
fn test_new_invalid_entry_point_reports_validation_code_in_json() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = asyd(tmp.path())
        .args([
            "--json", "new", "server", "api", "--host", "me@box", "--workdir", "/srv/app",
            "--entry", "../start.sh",
        ])
        .output()
        .expect("runs");

    assert!(!output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "VALIDATION_FAILED");
    assert_eq!(entries(tmp.path()), 0);
}

#[test]
fn test_new_refuses_existing_project() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_config(tmp.path(), "api", API_CFG);

    asyd(tmp.path())
        .args([
            "new", "server", "api", "-y", "--host", "me@box", "--workdir", "/srv/app",
            "--entry", "start.sh",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let config = std::fs::read_to_string(tmp.path().join("api/config.cfg")).expect("kept");
    assert_eq!(config, API_CFG);
}

// --- projects ---

#[test]
fn test_projects_empty_store() {
    let tmp = tempfile::tempdir().expect("tempdir");

    asyd(tmp.path())
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects"));
}

#[test]
fn test_projects_json_empty_array() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = asyd(tmp.path())
        .args(["projects", "--json"])
        .output()
        .expect("runs");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn test_projects_lists_stored_configs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_config(tmp.path(), "api", API_CFG);

    asyd(tmp.path())
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("api"))
        .stdout(predicate::str::contains("deploy@example.com"))
        .stdout(predicate::str::contains("never"));

    let output = asyd(tmp.path())
        .args(["projects", "--json"])
        .output()
        .expect("runs");
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value[0]["name"], "api");
    assert_eq!(value[0]["kind"], "server");
}

// --- commands on existing projects ---

#[test]
fn test_deploy_missing_project_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");

    asyd(tmp.path())
        .args(["deploy", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status_invalid_name_fails_with_validation_code() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = asyd(tmp.path())
        .args(["--json", "status", "a/b"])
        .output()
        .expect("runs");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["code"], "VALIDATION_FAILED");
}

#[test]
fn test_corrupt_config_reports_config_code() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_config(tmp.path(), "api", "config_type=server\ncolour=blue\n");

    let output = asyd(tmp.path())
        .args(["--json", "stop", "api"])
        .output()
        .expect("runs");

    assert!(!output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["code"], "CONFIG_INVALID");
}

#[test]
fn test_remove_missing_project_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");

    asyd(tmp.path())
        .args(["remove", "ghost", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_list_rejects_option_like_host() {
    let tmp = tempfile::tempdir().expect("tempdir");

    asyd(tmp.path())
        .args(["list", "--", "-oProxyCommand=evil"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid host"));
}
