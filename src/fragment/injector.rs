//! Marker-line expansion and its application to a directory tree.
//!
//! Files are treated as raw bytes split on line feeds, so sources in any
//! encoding are rewritten and every byte outside a marker line is kept.

use std::fs;
use std::path::Path;

use log::{debug, info};
use regex::bytes::Regex;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Replaces marker lines with fragment content
#[derive(Debug, Clone)]
pub struct Injector {
    marker: Regex,
}

impl Injector {
    /// Create an injector for the given marker token.
    ///
    /// A marker line is the literal token with optional surrounding spaces or
    /// tabs and nothing else.
    pub fn new(marker: &str) -> Result<Self> {
        let pattern = format!(r"^[ \t]*{}[ \t]*$", regex::escape(marker));
        Ok(Self {
            marker: Regex::new(&pattern)?,
        })
    }

    /// Whether `line` is a marker line.
    pub fn is_marker_line(&self, line: &[u8]) -> bool {
        self.marker.is_match(line)
    }

    /// Expand every marker line in `lines` into `fragment`.
    ///
    /// Each expansion is prefixed with the leading whitespace of its own
    /// marker line. Blank fragment lines are emitted as empty lines, never
    /// indented. Returns the new lines and whether any marker was replaced.
    pub fn expand<S: AsRef<[u8]>>(&self, lines: &[S], fragment: &[S]) -> (Vec<Vec<u8>>, bool) {
        let mut expanded = Vec::with_capacity(lines.len());
        let mut changed = false;

        for line in lines {
            let line = line.as_ref();
            if !self.is_marker_line(line) {
                expanded.push(line.to_vec());
                continue;
            }

            let indent = indentation(line);
            for fragment_line in fragment {
                let fragment_line = fragment_line.as_ref();
                if fragment_line.trim_ascii().is_empty() {
                    expanded.push(Vec::new());
                } else {
                    expanded.push([indent, fragment_line].concat());
                }
            }
            changed = true;
        }

        (expanded, changed)
    }

    /// Inject the fragment at `fragment_path` into every file under `code_dir`.
    ///
    /// Files are visited depth-first in lexical order. Only files containing
    /// at least one marker line are rewritten, keeping their permission bits.
    /// The first read or write failure stops the walk; files rewritten before
    /// it stay rewritten. Returns the number of files rewritten.
    pub fn inject(&self, code_dir: &Path, fragment_path: &Path) -> Result<usize> {
        let fragment = fs::read(fragment_path).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to read fragment file '{}': {}",
                fragment_path.display(),
                e
            ),
        })?;
        let fragment_lines = split_lines(&fragment);

        let mut rewritten = 0;
        for entry in WalkDir::new(code_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", code_dir.display(), e),
            })?;
            let path = entry.path();
            // Follows symlinks, so links to directories are skipped too
            if path.is_dir() {
                continue;
            }

            if self.inject_file(path, &fragment_lines)? {
                debug!("Injected fragment into {}", path.display());
                rewritten += 1;
            }
        }

        info!(
            "Injected {} into {} file(s) under {}",
            fragment_path.display(),
            rewritten,
            code_dir.display()
        );
        Ok(rewritten)
    }

    fn inject_file(&self, path: &Path, fragment_lines: &[&[u8]]) -> Result<bool> {
        let content = fs::read(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read file '{}': {}", path.display(), e),
        })?;

        let lines = split_lines(&content);
        let (expanded, changed) = self.expand(&lines, fragment_lines);
        if !changed {
            return Ok(false);
        }

        let permissions = fs::metadata(path)
            .map_err(|e| Error::Filesystem {
                message: format!("Failed to stat file '{}': {}", path.display(), e),
            })?
            .permissions();
        fs::write(path, join_lines(&expanded)).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", path.display(), e),
        })?;
        fs::set_permissions(path, permissions).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to set permissions on '{}': {}",
                path.display(),
                e
            ),
        })?;

        Ok(true)
    }
}

/// Expand marker lines without touching the filesystem.
///
/// Convenience over [`Injector::new`] followed by [`Injector::expand`].
pub fn expand<S: AsRef<[u8]>>(
    lines: &[S],
    marker: &str,
    fragment: &[S],
) -> Result<(Vec<Vec<u8>>, bool)> {
    Ok(Injector::new(marker)?.expand(lines, fragment))
}

/// Split on line feeds, keeping the trailing empty element a final newline
/// produces.
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split(|b| *b == b'\n').collect()
}

/// Inverse of [`split_lines`].
pub fn join_lines<S: AsRef<[u8]>>(lines: &[S]) -> Vec<u8> {
    let mut joined = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            joined.push(b'\n');
        }
        joined.extend_from_slice(line.as_ref());
    }
    joined
}

/// Leading spaces and tabs of `line`.
fn indentation(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .position(|b| *b != b' ' && *b != b'\t')
        .unwrap_or(line.len());
    &line[..end]
}
