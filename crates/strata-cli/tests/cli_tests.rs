//! End-to-end tests for the `strata` binary.

mod common;

use predicates::prelude::*;
use pretty_assertions::assert_eq;

use common::{Workspace, read};

#[test]
fn help_lists_subcommands() {
    let ws = Workspace::new();
    ws.strata()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let ws = Workspace::new();
    ws.strata()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_color_accepts_any_non_empty_value() {
    let ws = Workspace::new();
    for value in ["1", "yes", "true"] {
        ws.strata()
            .env("NO_COLOR", value)
            .args(["list", "--format", "list", "--templates-dir"])
            .arg(ws.templates())
            .assert()
            .success()
            .stdout("rust\n");
    }
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn new_composes_renders_and_keeps_public_files() {
    let ws = Workspace::new();

    ws.new_project("my-app", "basic").assert().success();

    let project = ws.path("my-app");
    assert_eq!(
        read(project.join("README.md")),
        "# my-app\n\nuses ${{ secrets.TOKEN }}\n"
    );
    assert!(read(project.join("Cargo.toml")).contains("name = \"my-app\""));
    assert!(read(project.join("Cargo.toml")).contains("Config Author"));
    assert!(project.join("rustfmt.toml").is_file());
    assert!(project.join("src/main.rs").is_file());
    assert!(project.join("CONTRIBUTING.md").is_file());
    assert!(!project.join("README.marker.md").exists());
    assert!(!project.join("Cargo.marker.toml").exists());
}

#[test]
fn private_generation_prunes_and_flags_context() {
    let ws = Workspace::new();

    ws.new_project("internal-tool", "basic")
        .arg("--private")
        .assert()
        .success();

    let project = ws.path("internal-tool");
    assert!(!project.join("CONTRIBUTING.md").exists());
    assert!(read(project.join("README.md")).contains("internal build"));
}

#[test]
fn var_overrides_config_variables() {
    let ws = Workspace::new();

    ws.new_project("MyTool", "basic")
        .args(["--var", "author=Cli Author"])
        .assert()
        .success();

    let cargo = read(ws.path("MyTool/Cargo.toml"));
    assert!(cargo.contains("name = \"my-tool\""), "{cargo}");
    assert!(cargo.contains("Cli Author"), "{cargo}");
}

#[test]
fn dry_run_writes_nothing() {
    let ws = Workspace::new();

    ws.new_project("dry", "basic")
        .args(["--dry-run", "--private"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local:rust/cli/basic"))
        .stdout(predicate::str::contains("CONTRIBUTING.md"));

    assert!(!ws.path("dry").exists());
}

#[test]
fn json_report_counts_work_done() {
    let ws = Workspace::new();

    let out = ws
        .new_project("counted", "basic")
        .args(["--output-format", "json", "--private"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["layers_applied"], 3);
    assert_eq!(report["layers_skipped"], 1);
    assert_eq!(report["files_copied"], 5);
    assert_eq!(report["entries_pruned"], 1);
    assert_eq!(report["files_rendered"], 2);
}

#[test]
fn force_allows_non_empty_target() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.path("busy")).unwrap();
    std::fs::write(ws.path("busy/keep.txt"), "mine").unwrap();

    ws.new_project("busy", "basic")
        .arg("--force")
        .assert()
        .success();

    assert_eq!(read(ws.path("busy/keep.txt")), "mine");
    assert!(ws.path("busy/Cargo.toml").is_file());
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn list_levels_as_json() {
    let ws = Workspace::new();
    ws.template("go/api/chi/go.mod", "module x\n");

    let languages = ws
        .strata()
        .args(["list", "--format", "json", "--templates-dir"])
        .arg(ws.templates())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let languages: serde_json::Value = serde_json::from_slice(&languages).unwrap();
    assert_eq!(languages["level"], "languages");
    assert_eq!(languages["names"], serde_json::json!(["go", "rust"]));

    let templates = ws
        .strata()
        .args(["list", "--lang", "rust", "--kind", "cli", "--format", "json", "--templates-dir"])
        .arg(ws.templates())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let templates: serde_json::Value = serde_json::from_slice(&templates).unwrap();
    assert_eq!(templates["level"], "templates");
    assert_eq!(templates["names"], serde_json::json!(["basic", "broken"]));
}

#[test]
fn list_plain_prints_one_name_per_line() {
    let ws = Workspace::new();

    ws.strata()
        .args(["list", "--lang", "rust", "--format", "list", "--templates-dir"])
        .arg(ws.templates())
        .assert()
        .success()
        .stdout("cli\n");
}

#[test]
fn list_unknown_language_is_empty_not_error() {
    let ws = Workspace::new();

    ws.strata()
        .args(["list", "--lang", "zig", "--format", "list", "--templates-dir"])
        .arg(ws.templates())
        .assert()
        .success()
        .stdout("");
}

// ── init / completions ────────────────────────────────────────────────────────

#[test]
fn init_writes_config_at_given_path() {
    let ws = Workspace::new();
    let target = ws.path("fresh/strata.toml");

    assert_cmd::Command::cargo_bin("strata")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&target)
        .arg("init")
        .assert()
        .success();

    let text = read(&target);
    assert!(text.contains("[templates]"));
    assert!(text.contains("marker = \".marker.\""));
}

#[test]
fn completions_mention_binary() {
    let ws = Workspace::new();
    ws.strata()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strata"));
}
