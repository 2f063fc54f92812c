//! Shared test utilities for CLI E2E tests.
//!
//! This module provides a fixture that lays out a container-like directory
//! tree (config document, fragments directory, code directory) inside a
//! temporary directory, plus a helper to run the binary against it.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_fragment("run.sh", "MAIN\n");
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
}

/// A temporary container layout.
///
/// ```text
/// <tmp>/entrypoint.json
/// <tmp>/fragments/
/// <tmp>/code/
/// <tmp>/docs/
/// ```
///
/// The config document points every path into the temporary directory and
/// is rewritten whenever the fixture's settings change.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    execution: Value,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture with the default patterns and no files.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            execution: json!({}),
        };
        fixture.write_config();
        fixture
    }

    /// Set the ordered executable search patterns.
    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.execution["patterns"] = json!(patterns);
        self.write_config();
        self
    }

    /// Set `execution.makeExecutable`.
    pub fn with_make_executable(mut self, value: bool) -> Self {
        self.execution["makeExecutable"] = json!(value);
        self.write_config();
        self
    }

    /// Add a file to the fragments directory.
    pub fn with_fragment(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("fragments")
            .child(name)
            .write_str(content)
            .expect("Failed to write fragment file");
        self
    }

    /// Add a file to the code directory.
    pub fn with_code_file(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("code")
            .child(name)
            .write_str(content)
            .expect("Failed to write code file");
        self
    }

    /// Create an empty code directory.
    pub fn with_code_dir(self) -> Self {
        self.temp_dir
            .child("code")
            .create_dir_all()
            .expect("Failed to create code directory");
        self
    }

    /// Add a document to the docs directory.
    pub fn with_doc(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("docs")
            .child(name)
            .write_str(content)
            .expect("Failed to write document");
        self
    }

    /// Overwrite the config document with raw text.
    pub fn with_raw_config(self, content: &str) -> Self {
        std::fs::write(self.config_path(), content).expect("Failed to write config file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("entrypoint.json")
    }

    pub fn code_dir(&self) -> PathBuf {
        self.path().join("code")
    }

    pub fn fragments_dir(&self) -> PathBuf {
        self.path().join("fragments")
    }

    /// Create a command for the entrypoint binary pointed at this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("entrypoint");
        cmd.current_dir(self.path())
            .env("ENTRYPOINT_CONFIG", self.config_path())
            .env_remove("ENTRYPOINT_LOG_LEVEL");
        cmd
    }

    fn write_config(&self) {
        let root = self.path();
        let config = json!({
            "version": "test",
            "paths": {
                "code": root.join("code"),
                "fragments": root.join("fragments"),
                "howTo": root.join("docs/how-to.md"),
                "agentHelp": root.join("docs/agent-help.md"),
            },
            "fragments": { "marker": "MAIN" },
            "execution": self.execution,
        });
        std::fs::write(self.config_path(), config.to_string())
            .expect("Failed to write config file");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
