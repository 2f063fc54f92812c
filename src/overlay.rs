//! # Overlay
//!
//! First stage of the pipeline: copies the supplementary files from the
//! fragments directory into the code directory.
//!
//! Only top-level entries are copied. Subdirectories of the fragments
//! directory are skipped, as is the entry named after the marker token (the
//! fragment file is consumed by injection, not overlaid). Copies keep the
//! source's permission bits and replace any same-named file in the code
//! directory. A failure aborts the stage; files already copied stay.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};

/// Overlay `fragments_dir` onto `code_dir`, excluding the `marker` file.
///
/// A missing or empty fragments directory is a no-op. Returns the number of
/// files copied.
pub fn overlay(fragments_dir: &Path, code_dir: &Path, marker: &str) -> Result<usize> {
    let mut entries = match fs::read_dir(fragments_dir) {
        Ok(entries) => entries.collect::<std::io::Result<Vec<_>>>().map_err(|e| {
            Error::Filesystem {
                message: format!(
                    "Failed to read fragments directory '{}': {}",
                    fragments_dir.display(),
                    e
                ),
            }
        })?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(
                "No fragments directory at {}, nothing to overlay",
                fragments_dir.display()
            );
            return Ok(0);
        }
        Err(e) => {
            return Err(Error::Filesystem {
                message: format!(
                    "Failed to read fragments directory '{}': {}",
                    fragments_dir.display(),
                    e
                ),
            })
        }
    };

    if entries.is_empty() {
        debug!("Fragments directory {} is empty", fragments_dir.display());
        return Ok(0);
    }

    // Deterministic copy order
    entries.sort_by_key(|entry| entry.file_name());

    fs::create_dir_all(code_dir).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create code directory '{}': {}",
            code_dir.display(),
            e
        ),
    })?;

    let mut copied = 0;
    for entry in entries {
        let src_path = entry.path();
        if src_path.is_dir() {
            debug!("Skipping subdirectory {}", src_path.display());
            continue;
        }
        if entry.file_name() == marker {
            continue;
        }

        let dst_path = code_dir.join(entry.file_name());
        // fs::copy carries the permission bits over with the content.
        fs::copy(&src_path, &dst_path).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to copy '{}' to '{}': {}",
                src_path.display(),
                dst_path.display(),
                e
            ),
        })?;
        debug!("Overlaid {}", dst_path.display());
        copied += 1;
    }

    info!(
        "Overlaid {} file(s) from {} onto {}",
        copied,
        fragments_dir.display(),
        code_dir.display()
    );
    Ok(copied)
}
