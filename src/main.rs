//! # Entrypoint CLI
//!
//! This is the binary entry point for the `entrypoint` container command.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the documentation printer or the preparation pipeline.
//! - Translating errors into stderr output and a process exit code. A child
//!   program's own exit code is propagated unchanged.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use std::process::ExitCode;

use entrypoint::error::{Error, FAILURE_EXIT_CODE};

fn main() -> ExitCode {
    let cli = cli::Cli::parse_args();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            // A child's failure exits with the child's own code.
            let code = err
                .downcast_ref::<Error>()
                .map_or(FAILURE_EXIT_CODE, Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
