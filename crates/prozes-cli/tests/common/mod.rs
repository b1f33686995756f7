//! Shared harness for the `prozes` binary tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated store, config file and working directory.
pub struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("work")).unwrap();
        Self { root }
    }

    pub fn store(&self) -> PathBuf {
        self.root.path().join("store")
    }

    pub fn config(&self) -> PathBuf {
        self.root.path().join("config.toml")
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// `prozes` pointed at this sandbox, with no colour and no ambient env.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("prozes");
        cmd.current_dir(self.work())
            .env_remove("PROZES_STORE")
            .env_remove("PROZES_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.config())
            .arg("--store")
            .arg(self.store());
        cmd
    }

    /// Write `content` at `rel` under the working directory.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.work().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// A small project under `work/<dir>` with one placeholder.
    pub fn project(&self, dir: &str) -> PathBuf {
        self.write(
            &format!("{dir}/app.py"),
            "NAME = \"{{project_name}}\"\nAUTHOR = \"{{author}}\"\n",
        );
        self.write(&format!("{dir}/README.md"), "# {{project_name}}\n");
        self.work().join(dir)
    }

    pub fn save(&self, dir: &str, name: &str) {
        self.cmd()
            .args(["template", "save", dir, name])
            .assert()
            .success();
    }

    pub fn read(&self, rel: impl AsRef<Path>) -> String {
        fs::read_to_string(self.work().join(rel)).unwrap()
    }
}
