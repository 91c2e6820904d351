//! Error types for deterministic archive creation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while packaging a directory into an archive.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    ///
    /// Covers reading source files, walking the source tree, writing the
    /// temporary archive and renaming it into place.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source directory does not exist.
    #[error("source directory not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Destination suffix names an archive format this builder cannot write.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The destination path.
        path: PathBuf,
    },

    /// Archive prefix is absolute or escapes the archive root.
    #[error("invalid archive prefix: {prefix:?}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
    },

    /// A symlink was found while the symlink policy rejects them.
    #[error("symlink rejected by policy: {path}")]
    SymlinkRejected {
        /// The symlink path.
        path: PathBuf,
    },

    /// A file name cannot be represented as an archive entry name.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// Compression level is outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The invalid compression level.
        level: u8,
    },
}

impl PackError {
    /// Returns `true` if the request was refused before the temporary archive
    /// file was created.
    ///
    /// Only I/O failures can happen after that point, so every other variant
    /// leaves neither a destination nor a `.temp~` file behind.
    ///
    /// # Examples
    ///
    /// ```
    /// use repropack_core::PackError;
    ///
    /// let err = PackError::InvalidCompressionLevel { level: 12 };
    /// assert!(err.is_rejected_request());
    ///
    /// let err = PackError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_rejected_request());
    /// ```
    #[must_use]
    pub const fn is_rejected_request(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
