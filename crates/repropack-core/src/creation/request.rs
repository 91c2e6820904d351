//! What to archive and where.

use std::path::Path;
use std::path::PathBuf;

use crate::creation::commit::temp_path_for;

/// A single packaging request.
///
/// # Examples
///
/// ```
/// use repropack_core::ArchiveRequest;
///
/// let request = ArchiveRequest::new("target/doc", "target/doc.tar.gz").with_prefix("doc");
/// assert_eq!(request.prefix.as_deref(), Some("doc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Directory whose contents are archived.
    pub source_directory: PathBuf,

    /// Path of the archive to produce.
    pub destination_path: PathBuf,

    /// Path prepended to every archive entry name.
    pub prefix: Option<String>,
}

impl ArchiveRequest {
    /// Creates a request without a prefix.
    #[must_use]
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source_directory: P, destination_path: Q) -> Self {
        Self {
            source_directory: source_directory.as_ref().to_path_buf(),
            destination_path: destination_path.as_ref().to_path_buf(),
            prefix: None,
        }
    }

    /// Sets the entry name prefix.
    #[must_use]
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Temporary path the archive is written to before commit.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.destination_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = ArchiveRequest::new("src", "out.zip");
        assert_eq!(request.source_directory, PathBuf::from("src"));
        assert_eq!(request.destination_path, PathBuf::from("out.zip"));
        assert!(request.prefix.is_none());
    }

    #[test]
    fn test_request_temp_path() {
        let request = ArchiveRequest::new("src", "dist/out.tar.gz");
        assert_eq!(request.temp_path(), PathBuf::from("dist/out.tar.gz.temp~"));
    }
}
