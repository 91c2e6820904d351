//! Builder for creating archives with fluent API.

use std::path::Path;

use crate::ProgressCallback;
use crate::Result;
use crate::creation::config::ArchiveOptions;
use crate::creation::config::SymlinkPolicy;
use crate::creation::report::ArchiveReport;
use crate::creation::request::ArchiveRequest;
use crate::formats::ArchiveFormat;

/// Builder for creating archives with fluent API.
///
/// # Examples
///
/// ```no_run
/// use repropack_core::ArchiveCreator;
/// use repropack_core::SymlinkPolicy;
///
/// let report = ArchiveCreator::new("target/doc", "target/doc.tar.gz")
///     .prefix("doc")
///     .symlinks(SymlinkPolicy::Reject)
///     .create()?;
///
/// println!("Packed {} entries", report.total_entries());
/// # Ok::<(), repropack_core::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveCreator {
    request: ArchiveRequest,
    options: ArchiveOptions,
}

impl ArchiveCreator {
    /// Starts a builder for archiving `source` into `destination`.
    #[must_use]
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Self {
        Self {
            request: ArchiveRequest::new(source, destination),
            options: ArchiveOptions::default(),
        }
    }

    /// Sets the entry name prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use repropack_core::ArchiveCreator;
    ///
    /// let creator = ArchiveCreator::new("resources", "out.tar.gz").prefix("servo/");
    /// ```
    #[must_use]
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.request.prefix = Some(prefix.into());
        self
    }

    /// Sets the symlink policy.
    #[must_use]
    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.options.symlinks = policy;
        self
    }

    /// Sets the compression level (1-9).
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.options.compression_level = Some(level);
        self
    }

    /// Sets whether permission bits come from the filesystem.
    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.options.preserve_permissions = preserve;
        self
    }

    /// Forces the archive format instead of detecting it from the destination.
    ///
    /// # Examples
    ///
    /// ```
    /// use repropack_core::ArchiveCreator;
    /// use repropack_core::ArchiveFormat;
    ///
    /// let creator = ArchiveCreator::new("dist", "dist.bin").format(ArchiveFormat::Zip);
    /// ```
    #[must_use]
    pub fn format(mut self, format: ArchiveFormat) -> Self {
        self.options.format = Some(format);
        self
    }

    /// Replaces all options at once.
    #[must_use]
    pub fn options(mut self, options: ArchiveOptions) -> Self {
        self.options = options;
        self
    }

    /// The request this builder will run.
    #[must_use]
    pub fn request(&self) -> &ArchiveRequest {
        &self.request
    }

    /// Creates the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if options are invalid or archive creation fails.
    pub fn create(self) -> Result<ArchiveReport> {
        crate::api::create_archive(&self.request, &self.options)
    }

    /// Creates the archive with progress reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if options are invalid or archive creation fails.
    pub fn create_with_progress(self, progress: &mut dyn ProgressCallback) -> Result<ArchiveReport> {
        crate::api::create_archive_with_progress(&self.request, &self.options, progress)
    }
}
