//! Exit codes and suggestions for failing invocations.

mod common;

use predicates::prelude::*;

use common::Workspace;

#[test]
fn non_empty_target_is_refused_with_exit_2() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.path("taken")).unwrap();
    std::fs::write(ws.path("taken/file.txt"), "x").unwrap();

    ws.new_project("taken", "basic")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert!(!ws.path("taken/Cargo.toml").exists());
}

#[test]
fn missing_template_exits_3_with_coordinate() {
    let ws = Workspace::new();

    ws.new_project("ghost", "nonexistent")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("local:rust/cli/nonexistent"))
        .stderr(predicate::str::contains("strata list"));
}

#[test]
fn unbalanced_block_exits_2_and_names_the_file() {
    let ws = Workspace::new();

    ws.new_project("broken-app", "broken")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("notes.marker.txt"));
}

#[test]
fn remote_without_configuration_exits_4() {
    let ws = Workspace::new();

    ws.new_project("far", "basic")
        .arg("--remote")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("[remote]"));
}

#[test]
fn missing_config_file_exits_4() {
    let ws = Workspace::new();

    assert_cmd::Command::cargo_bin("strata")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(ws.path("absent.toml"))
        .arg("list")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn malformed_var_is_a_usage_error() {
    let ws = Workspace::new();

    ws.new_project("x", "basic")
        .args(["--var", "no-equals-sign"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn dot_name_is_rejected() {
    let ws = Workspace::new();

    ws.new_project(".hidden", "basic")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));
}
