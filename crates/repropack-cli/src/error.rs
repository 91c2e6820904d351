//! Error conversion utilities for CLI.
//!
//! Converts repropack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use repropack_core::PackError;
use std::path::Path;

/// Converts `PackError` to user-friendly anyhow error with context
///
/// `temp_path` is where the partial archive is left when writing fails.
pub fn convert_pack_error(err: PackError, output: &Path, temp_path: &Path) -> anyhow::Error {
    match err {
        PackError::SourceNotFound { path } => {
            anyhow!(
                "Source directory not found: {}\n\
                 HINT: The source must be an existing directory.",
                path.display()
            )
        }
        PackError::UnsupportedFormat { path } => {
            anyhow!(
                "Cannot create '{}': unsupported archive format\n\
                 HINT: Use a .zip or .tar.gz output name, or pass --format.",
                path.display()
            )
        }
        PackError::InvalidPrefix { prefix } => {
            anyhow!(
                "Invalid prefix {prefix:?}: it must be relative and stay inside the archive\n\
                 HINT: Remove leading '/' and '..' components from --prefix."
            )
        }
        PackError::SymlinkRejected { path } => {
            anyhow!(
                "Symlink found while creating '{}': {}\n\
                 HINT: Use --symlinks preserve or --symlinks follow to archive symlinks.",
                output.display(),
                path.display()
            )
        }
        PackError::NonUtf8Path { path } => {
            anyhow!(
                "File name is not valid UTF-8: {}\n\
                 HINT: Rename the file; archive entry names must be UTF-8.",
                path.display()
            )
        }
        PackError::Io(io_err) => {
            anyhow!(
                "I/O error while creating '{}': {}\n\
                 HINT: A partial archive may remain at '{}'.",
                output.display(),
                io_err,
                temp_path.display()
            )
        }
        err @ PackError::InvalidCompressionLevel { .. } => {
            anyhow::Error::from(err).context(format!("Cannot create '{}'", output.display()))
        }
    }
}
