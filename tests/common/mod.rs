//! Common test utilities for CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// A test context that provides a temporary directory tree and selection
/// store.
pub struct TestContext {
    pub root: TempDir,
}

impl TestContext {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        for (path, content) in files {
            let file_path = root.path().join(path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dirs");
            }
            fs::write(file_path, content).expect("Failed to write file");
        }
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write the selection store as the codec would: one path per line.
    pub fn write_store(&self, paths: &[&str]) {
        let mut content = String::new();
        for p in paths {
            content.push_str(p);
            content.push('\n');
        }
        fs::write(self.path().join(".synopsis"), content).expect("Failed to write store");
    }

    pub fn store_content(&self) -> String {
        fs::read_to_string(self.path().join(".synopsis")).expect("Failed to read store")
    }
}

/// Command against the synopsis binary, forced non-interactive so no test
/// ever blocks waiting for a key.
pub fn synopsis_cmd() -> Command {
    let mut cmd = Command::cargo_bin("synopsis").expect("binary builds");
    cmd.env("CI", "1");
    cmd
}

pub fn sample_project() -> Vec<(&'static str, &'static str)> {
    vec![
        ("src/a.py", "print('a')\n"),
        ("src/b.py", "print('b')\n"),
        ("docs/guide.md", "# Guide\n"),
        ("README.md", "# Sample\n"),
    ]
}
