//! CLI argument parsing and command dispatch

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use entrypoint::config::Config;
use entrypoint::defaults;
use entrypoint::docs::Document;

use crate::commands;

/// Container entrypoint: overlay, inject and run the bundled program
///
/// Every argument after the entrypoint's own flags is forwarded untouched,
/// so the entrypoint's flags are namespaced and clap's help and version
/// flags are disabled.
#[derive(Parser, Debug)]
#[command(name = "entrypoint")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Path to the JSON configuration document
    #[arg(
        long = "entrypoint-config",
        value_name = "PATH",
        env = "ENTRYPOINT_CONFIG",
        default_value = defaults::CONFIG_PATH
    )]
    config: PathBuf,

    /// Log filter (error, warn, info, debug, trace, or RUST_LOG syntax)
    #[arg(
        long = "entrypoint-log-level",
        value_name = "LEVEL",
        env = "ENTRYPOINT_LOG_LEVEL",
        default_value = defaults::LOG_LEVEL
    )]
    log_level: String,

    /// Documentation keyword, or arguments for the program being run
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_args() -> Self {
        let raw: Vec<OsString> = std::env::args_os().collect();
        let mut cli = Self::parse_from(&raw);
        cli.restore_separator(&raw);
        cli
    }

    /// clap swallows a `--` in front of the program arguments; put it back
    /// so the program receives its arguments verbatim.
    fn restore_separator(&mut self, raw: &[OsString]) {
        let Some(index) = raw.len().checked_sub(self.args.len() + 1) else {
            return;
        };
        if index > 0 && raw[index] == "--" {
            self.args.insert(0, "--".to_string());
        }
    }

    /// Execute the requested mode
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let config = Config::load(&self.config).context("failed to load configuration")?;

        if let Some(document) = self.args.first().and_then(|a| Document::from_keyword(a)) {
            return commands::docs::execute(&config, document);
        }

        commands::run::execute(&config, &self.args)
    }
}

/// Route `log` output to stderr so the child's stdout stays untouched.
fn init_logging(filter: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
