//! # Configuration
//!
//! This module defines the configuration value consumed by every pipeline
//! stage, and the logic for loading it from an optional JSON document.
//!
//! ## Key Components
//!
//! - **`Config`**: The root value: directory paths, the fragment marker and
//!   the execution settings.
//!
//! - **`Execution`**: Search patterns plus two tri-state flags. An unset flag
//!   falls back to its default (`make_executable` true, `use_sudo` false).
//!
//! ## Loading
//!
//! [`Config::load`] starts from [`Config::default`] and overrides it field by
//! field with whatever the document sets. A missing document yields pure
//! defaults; a malformed one is a fatal [`Error::ConfigParse`]. The resulting
//! value is passed explicitly to each stage; there is no global instance.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};

/// Root configuration for an entrypoint invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Free-form version tag of the configuration document.
    pub version: String,
    pub paths: Paths,
    pub fragments: Fragments,
    pub execution: Execution,
}

/// Directory and document locations
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    /// Working directory that is overlaid, rewritten and run from.
    pub code: PathBuf,
    /// Optional source of supplementary files and the fragment file.
    pub fragments: PathBuf,
    /// Document printed by the `how-to` keyword.
    pub how_to: PathBuf,
    /// Document printed by the `agent-help` and `help` keywords.
    pub agent_help: PathBuf,
}

/// Fragment injection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Fragments {
    /// Token that marks injection points and names the fragment file.
    pub marker: String,
}

/// Program discovery and launch settings
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Glob patterns, relative to the code directory, tried in order.
    pub patterns: Vec<String>,
    pub make_executable: Option<bool>,
    pub use_sudo: Option<bool>,
}

impl Execution {
    /// Whether the selected file is chmod'ed before launch. Defaults to true.
    pub fn should_make_executable(&self) -> bool {
        self.make_executable.unwrap_or(true)
    }

    /// Whether chmod goes through `sudo`. Defaults to false.
    pub fn should_use_sudo(&self) -> bool {
        self.use_sudo.unwrap_or(false)
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            code: PathBuf::from(defaults::CODE_DIR),
            fragments: PathBuf::from(defaults::FRAGMENTS_DIR),
            how_to: PathBuf::from(defaults::HOW_TO_PATH),
            agent_help: PathBuf::from(defaults::AGENT_HELP_PATH),
        }
    }
}

impl Default for Fragments {
    fn default() -> Self {
        Self {
            marker: defaults::MARKER.to_string(),
        }
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self {
            patterns: defaults::default_patterns(),
            make_executable: None,
            use_sudo: None,
        }
    }
}

/// Shape of the on-disk document. Every field is optional so that absent
/// keys and empty values can be told apart from defaults during the merge.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileConfig {
    version: Option<String>,
    paths: FilePaths,
    fragments: FileFragments,
    execution: FileExecution,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FilePaths {
    code: Option<PathBuf>,
    fragments: Option<PathBuf>,
    how_to: Option<PathBuf>,
    agent_help: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileFragments {
    marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileExecution {
    patterns: Option<Vec<String>>,
    make_executable: Option<bool>,
    use_sudo: Option<bool>,
}

impl Config {
    /// Load configuration from `path`, merged over the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                return Ok(config);
            }
            Err(e) => {
                return Err(Error::Filesystem {
                    message: format!("Failed to read config file '{}': {}", path.display(), e),
                })
            }
        };

        config.merge_str(&content).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Parse a JSON document and merge it over `self`.
    pub fn merge_str(&mut self, json: &str) -> serde_json::Result<()> {
        let file: FileConfig = serde_json::from_str(json)?;
        self.merge(file);
        Ok(())
    }

    fn merge(&mut self, other: FileConfig) {
        fn set_string(target: &mut String, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *target = value;
            }
        }
        fn set_path(target: &mut PathBuf, value: Option<PathBuf>) {
            if let Some(value) = value.filter(|v| !v.as_os_str().is_empty()) {
                *target = value;
            }
        }

        set_string(&mut self.version, other.version);
        set_path(&mut self.paths.code, other.paths.code);
        set_path(&mut self.paths.fragments, other.paths.fragments);
        set_path(&mut self.paths.how_to, other.paths.how_to);
        set_path(&mut self.paths.agent_help, other.paths.agent_help);
        set_string(&mut self.fragments.marker, other.fragments.marker);

        if let Some(patterns) = other.execution.patterns.filter(|p| !p.is_empty()) {
            self.execution.patterns = patterns;
        }
        // Flags only override when explicitly present.
        if other.execution.make_executable.is_some() {
            self.execution.make_executable = other.execution.make_executable;
        }
        if other.execution.use_sudo.is_some() {
            self.execution.use_sudo = other.execution.use_sudo;
        }
    }
}
