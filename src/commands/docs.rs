//! Documentation keywords (`how-to`, `agent-help`, `help`)

use std::io::Write;

use anyhow::{Context, Result};
use entrypoint::config::Config;
use entrypoint::docs::Document;

/// Print the requested document, or its fallback message, to stdout.
pub fn execute(config: &Config, document: Document) -> Result<()> {
    let text = document.render(config);
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write documentation")
}
