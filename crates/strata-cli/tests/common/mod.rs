//! Shared fixtures for the CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A workspace with a template root and an isolated config file.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Layout:
    ///
    /// ```text
    /// templates/shared/README.marker.md
    /// templates/shared/CONTRIBUTING.md
    /// templates/rust/shared/rustfmt.toml
    /// templates/rust/cli/basic/Cargo.marker.toml
    /// templates/rust/cli/basic/src/main.rs
    /// templates/rust/cli/broken/notes.marker.txt
    /// ```
    pub fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        ws.template(
            "shared/README.marker.md",
            "# {{project_name}}\n{{#private}}internal build{{/private}}\nuses ${{ secrets.TOKEN }}\n",
        );
        ws.template("shared/CONTRIBUTING.md", "Open an issue first.\n");
        ws.template("rust/shared/rustfmt.toml", "edition = \"2024\"\n");
        ws.template(
            "rust/cli/basic/Cargo.marker.toml",
            "[package]\nname = \"{{project_name_kebab}}\"\nauthors = [\"{{author}}\"]\n",
        );
        ws.template("rust/cli/basic/src/main.rs", "fn main() {}\n");
        ws.template("rust/cli/broken/notes.marker.txt", "{{#open}}never closed\n");

        fs::write(
            ws.config_path(),
            "[prune]\nshared = [\"CONTRIBUTING.md\"]\n\n[variables]\nauthor = \"Config Author\"\n",
        )
        .unwrap();
        ws
    }

    pub fn template(&self, relative: &str, content: &str) {
        let path = self.templates().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn templates(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("strata.toml")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// `strata` with the workspace config, no colour and no inherited
    /// `STRATA*` settings.
    pub fn strata(&self) -> Command {
        let mut cmd = Command::cargo_bin("strata").unwrap();
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("STRATA_TEMPLATES_DIR")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }

    /// `strata new <target> -l rust -k cli -t <template> --templates-dir ...`
    pub fn new_project(&self, target: &str, template: &str) -> Command {
        let mut cmd = self.strata();
        cmd.args(["new", target, "--lang", "rust", "--kind", "cli", "--template", template])
            .arg("--templates-dir")
            .arg(self.templates());
        cmd
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}
