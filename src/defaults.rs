//! Default values for entrypoint configuration.
//!
//! This module provides centralized default values used by the configuration
//! loader and the CLI, ensuring consistency and avoiding duplication.

/// Location of the optional JSON configuration document.
///
/// This can be overridden by the `--entrypoint-config` CLI flag or the
/// `ENTRYPOINT_CONFIG` environment variable.
pub const CONFIG_PATH: &str = "/entrypoint.json";

/// Directory the bundled program lives in and is run from.
pub const CODE_DIR: &str = "/code";

/// Directory holding supplementary files overlaid onto the code directory.
pub const FRAGMENTS_DIR: &str = "/code-fragments";

pub const HOW_TO_PATH: &str = "/how-to.md";

pub const AGENT_HELP_PATH: &str = "/agent-help.md";

/// Token that, alone on a line, marks an injection point.
pub const MARKER: &str = "MAIN";

/// Patterns searched, in order, for the program to run.
pub const PATTERNS: &[&str] = &["hello-world.sh", "hello-world.*"];

/// Default log filter when neither flag nor environment sets one.
pub const LOG_LEVEL: &str = "warn";

/// Returns the default search patterns as owned strings.
pub fn default_patterns() -> Vec<String> {
    PATTERNS.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_order() {
        assert_eq!(default_patterns(), vec!["hello-world.sh", "hello-world.*"]);
    }

    #[test]
    fn test_default_paths_are_absolute() {
        for path in [CONFIG_PATH, CODE_DIR, FRAGMENTS_DIR, HOW_TO_PATH, AGENT_HELP_PATH] {
            assert!(
                std::path::Path::new(path).is_absolute(),
                "Expected absolute path, got: {:?}",
                path
            );
        }
    }
}
