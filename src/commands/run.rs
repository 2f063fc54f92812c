//! Run command implementation
//!
//! Runs the three-stage pipeline:
//! 1. Overlay the fragments directory onto the code directory
//! 2. Inject the fragment into marker lines
//! 3. Run the bundled program, or pass the arguments through

use anyhow::Result;
use entrypoint::config::Config;
use entrypoint::executor::Outcome;
use entrypoint::pipeline;
use log::info;

/// Execute the pipeline, forwarding `args` to the launched program
pub fn execute(config: &Config, args: &[String]) -> Result<()> {
    match pipeline::run(config, args)? {
        Outcome::Bundled { file, status } => {
            info!("{} finished: {}", file.display(), status);
        }
        Outcome::PassThrough { program, status } => {
            info!("{} finished: {}", program, status);
        }
    }
    Ok(())
}
