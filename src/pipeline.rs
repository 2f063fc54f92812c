//! Orchestrator for a complete entrypoint run
//!
//! This module coordinates the three stages over the same code directory.
//! Each stage finishes before the next one starts:
//! 1. Overlay supplementary files onto the code directory
//! 2. Inject the fragment into marker lines
//! 3. Find and run the program, or pass the arguments through

use log::debug;

use crate::config::Config;
use crate::error::Result;
use crate::executor::{Executor, Outcome};
use crate::fragment::FragmentManager;
use crate::overlay::overlay;

/// Run every stage for `config`, forwarding `args` to the launched program.
pub fn run(config: &Config, args: &[String]) -> Result<Outcome> {
    // Stage 1: Overlay
    let copied = overlay(
        &config.paths.fragments,
        &config.paths.code,
        &config.fragments.marker,
    )?;
    debug!("Overlay stage done, {} file(s) copied", copied);

    // Stage 2: Fragment injection
    let fragment = FragmentManager::new(config).process()?;
    debug!("Injection stage done, fragment: {:?}", fragment);

    // Stage 3: Execution
    Executor::new(config).execute(args)
}
