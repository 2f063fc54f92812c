//! # Entrypoint Library
//!
//! This library provides the core of the `entrypoint` container command: it
//! prepares a working code directory from layered source material and then
//! launches the single program found in it.
//!
//! ## Quick Example
//!
//! ```
//! use entrypoint::fragment::injector::{expand, join_lines, split_lines};
//!
//! let source = split_lines(b"fn main() {\n    MAIN\n}\n");
//! let fragment = split_lines(b"println!(\"hi\");\n\nreturn;");
//! let (expanded, changed) = expand(&source, "MAIN", &fragment).unwrap();
//!
//! assert!(changed);
//! assert_eq!(
//!     join_lines(&expanded),
//!     b"fn main() {\n    println!(\"hi\");\n\n    return;\n}\n"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Paths, marker token and execution settings,
//!   loaded from an optional JSON document over built-in defaults.
//! - **Overlay (`overlay`)**: Copies supplementary files from the fragments
//!   directory into the code directory.
//! - **Fragment injection (`fragment`)**: Replaces every line holding only the
//!   marker token with the fragment file's content, keeping indentation.
//! - **Execution (`executor`)**: Finds the program by ordered glob patterns and
//!   runs it, or runs the caller's arguments verbatim when nothing matches.
//! - **Documentation (`docs`)**: Static documents printed on request instead
//!   of running anything.
//!
//! ## Execution Flow
//!
//! [`pipeline::run`] executes the stages strictly in order over the same
//! on-disk code directory:
//!
//! 1.  **Overlay**: Copy top-level files from the fragments directory.
//! 2.  **Injection**: Expand marker lines, then delete the fragment file from
//!     the code directory.
//! 3.  **Execution**: Run the bundled program or pass the arguments through.

pub mod config;
pub mod defaults;
pub mod docs;
pub mod error;
pub mod executor;
pub mod fragment;
pub mod overlay;
pub mod pipeline;
