//! Static documentation bundled with a container.
//!
//! The `how-to`, `agent-help` and `help` keywords print a document instead
//! of running the pipeline. A document is looked up at its configured path,
//! then under the same file name inside the code directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Which document a keyword asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    HowTo,
    AgentHelp,
}

impl Document {
    /// Map a leading argument to a document, if it is a documentation keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "how-to" => Some(Document::HowTo),
            "agent-help" | "help" => Some(Document::AgentHelp),
            _ => None,
        }
    }

    /// Message printed when the document exists nowhere.
    pub fn not_found_message(self) -> &'static str {
        match self {
            Document::HowTo => "No how-to documentation found in this container.",
            Document::AgentHelp => "No agent-help documentation found in this container.",
        }
    }

    fn configured_path(self, config: &Config) -> &Path {
        match self {
            Document::HowTo => &config.paths.how_to,
            Document::AgentHelp => &config.paths.agent_help,
        }
    }

    /// Candidate locations, in lookup order.
    pub fn candidates(self, config: &Config) -> Vec<PathBuf> {
        let configured = self.configured_path(config);
        let mut candidates = vec![configured.to_path_buf()];
        if let Some(name) = configured.file_name() {
            candidates.push(config.paths.code.join(name));
        }
        candidates
    }

    /// The document's content, or `None` when no candidate is readable.
    pub fn read(self, config: &Config) -> Option<String> {
        self.candidates(config)
            .into_iter()
            .find_map(|path| fs::read_to_string(path).ok())
    }

    /// Text to print: the document verbatim, or the fallback message.
    pub fn render(self, config: &Config) -> String {
        self.read(config)
            .unwrap_or_else(|| format!("{}\n", self.not_found_message()))
    }
}
