//! # Error Handling
//!
//! This module defines the centralized error type for the `entrypoint`
//! pipeline. It uses the `thiserror` library to create a single `Error` enum
//! covering every failure mode of the three stages (overlay, fragment
//! injection, execution) plus configuration loading.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries the path, file or
//!   program it concerns so the message printed on stderr is actionable.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error is terminal for the invocation: there is no retry anywhere in
//! the pipeline. [`Error::exit_code`] decides the process exit status, which
//! is the child's own status for [`Error::ChildExit`] and 1 otherwise.

use std::process::ExitStatus;

use thiserror::Error;

/// Exit status used for every failure that is not a child's own exit.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Main error type for entrypoint operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document exists but could not be parsed.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A filesystem operation failed on a specific path.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// Fragment injection failed; wraps the injector's own error.
    #[error("error injecting fragment: {message}")]
    Injection { message: String },

    /// The selected file could not be made executable.
    #[error("failed to make {file} executable{}: {message}", if *elevated { " with sudo" } else { "" })]
    Permission {
        file: String,
        elevated: bool,
        message: String,
    },

    /// No pattern matched and there were no arguments to pass through.
    #[error("no matching file found in {dir} using patterns: {patterns:?}")]
    NoMatchingFile { dir: String, patterns: Vec<String> },

    /// The child process could not be started.
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    /// The child process ran and exited unsuccessfully.
    #[error("{program} exited unsuccessfully: {status}")]
    ChildExit { program: String, status: ExitStatus },

    /// A glob pattern could not be compiled.
    #[error("Glob pattern error in {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Process exit code this error translates to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ChildExit { status, .. } => status_code(status),
            _ => FAILURE_EXIT_CODE,
        }
    }
}

/// Map a child's exit status onto a shell-style exit code.
///
/// Signal-terminated children report `128 + signal`, as shells do.
pub fn status_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    FAILURE_EXIT_CODE
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
