//! # CLI Command Implementations
//!
//! The entrypoint has no subcommands in the usual sense: its leading
//! argument is either a documentation keyword or the start of the argument
//! list forwarded to the program it runs. Each mode lives in its own file.
//!
//! Each module exposes an `execute` function that takes the loaded
//! configuration and performs the mode's work by calling into the
//! `entrypoint` library.

pub mod docs;
pub mod run;
