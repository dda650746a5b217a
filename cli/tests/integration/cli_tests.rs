//! Integration tests for the CLI surface: help, version, argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn asyd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("asyd"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    asyd().assert().code(2).stderr(predicate::str::contains(
        "Deploy projects as systemd services on remote hosts over ssh",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let mut assert = asyd().arg("--help").assert().success();
    for command in ["new", "deploy", "remove", "start", "stop", "restart", "status", "list", "projects"] {
        assert = assert.stdout(predicate::str::contains(command));
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    asyd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("asyd ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_version_command_shows_version() {
    asyd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("asyd ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = asyd()
        .args(["version", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "true", ""] {
        Command::new(assert_cmd::cargo::cargo_bin!("asyd"))
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("asyd "));
    }
}

#[test]
fn test_no_color_flag_is_still_accepted() {
    asyd().args(["--no-color", "version"]).assert().success();
}

// --- Argument parsing ---

#[test]
fn test_new_rejects_unknown_kind() {
    asyd()
        .args(["new", "daemon", "api"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("daemon"));
}

#[test]
fn test_start_requires_project_name() {
    asyd().arg("start").assert().code(2);
}

#[test]
fn test_list_requires_host() {
    asyd().arg("list").assert().code(2);
}

#[test]
fn test_timeout_must_be_numeric() {
    asyd()
        .args(["--timeout", "soon", "projects"])
        .assert()
        .code(2);
}

#[test]
fn test_new_help_mentions_schedule_flag() {
    asyd()
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--schedule"))
        .stdout(predicate::str::contains("--identity-file"));
}
