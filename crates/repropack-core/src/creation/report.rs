//! Archive creation operation reporting.

use std::time::Duration;

use crate::formats::ArchiveFormat;

/// Report of a deterministic archive creation.
///
/// Only the archive bytes are reproducible; `duration` naturally varies
/// between runs.
///
/// # Examples
///
/// ```
/// use repropack_core::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1024;
/// report.archive_size = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Format that was written, once known.
    pub format: Option<ArchiveFormat>,

    /// Number of regular files added to the archive.
    pub files_added: usize,

    /// Number of directory entries added (tar only).
    pub directories_added: usize,

    /// Number of symlink entries added (tar only).
    pub symlinks_added: usize,

    /// Number of hard-link entries added (tar only).
    ///
    /// The first path of a multiply-linked file is stored as a regular file
    /// and counted in `files_added`; later paths become link entries.
    pub hardlinks_added: usize,

    /// Number of filesystem entries that were not archived.
    pub entries_skipped: usize,

    /// Total bytes of file content read from the source tree.
    pub bytes_read: u64,

    /// Size of the committed archive in bytes.
    pub archive_size: u64,

    /// Duration of the whole operation, commit included.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    ///
    /// # Examples
    ///
    /// ```
    /// use repropack_core::ArchiveReport;
    ///
    /// let mut report = ArchiveReport::new();
    /// report.add_warning("skipped FIFO: ./pipe");
    /// assert!(report.has_warnings());
    /// ```
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (bytes read / archive size).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }

    /// Returns total number of entries written to the archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use repropack_core::ArchiveReport;
    ///
    /// let mut report = ArchiveReport::new();
    /// report.files_added = 10;
    /// report.directories_added = 5;
    /// report.symlinks_added = 2;
    /// report.hardlinks_added = 1;
    /// assert_eq!(report.total_entries(), 18);
    /// ```
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added + self.hardlinks_added
    }
}
