//! Options for deterministic archive creation.

use crate::PackError;
use crate::Result;
use crate::formats::ArchiveFormat;

/// How symlinks found under the source directory are archived.
///
/// # Examples
///
/// ```
/// use repropack_core::SymlinkPolicy;
///
/// assert_eq!(SymlinkPolicy::default(), SymlinkPolicy::Preserve);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Never descend through directory symlinks.
    ///
    /// Tar stores every symlink as a link entry. Zip writes the target's
    /// content for links to regular files and skips links to directories.
    #[default]
    Preserve,

    /// Resolve symlinks while walking and archive what they point to.
    Follow,

    /// Abort with [`PackError::SymlinkRejected`] on the first symlink.
    Reject,
}

/// Options controlling how an archive is produced.
///
/// None of these options are a source of nondeterminism: two runs with the
/// same options over the same logical tree produce identical bytes.
///
/// # Examples
///
/// ```
/// use repropack_core::ArchiveOptions;
/// use repropack_core::SymlinkPolicy;
///
/// let options = ArchiveOptions::default()
///     .with_symlinks(SymlinkPolicy::Follow)
///     .with_compression_level(6);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Symlink handling during enumeration.
    ///
    /// Default: [`SymlinkPolicy::Preserve`].
    pub symlinks: SymlinkPolicy,

    /// Compression level (1-9).
    ///
    /// `None` uses level 9 for gzip and the deflate default for zip.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Keep permission bits from the filesystem.
    ///
    /// When disabled, files get `0o644` and directories `0o755`. Tar symlink
    /// entries always carry `0o777` regardless of this setting.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Archive format to create.
    ///
    /// `None` means detect from the destination suffix.
    ///
    /// Default: `None`.
    pub format: Option<ArchiveFormat>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            symlinks: SymlinkPolicy::Preserve,
            compression_level: None,
            preserve_permissions: true,
            format: None,
        }
    }
}

impl ArchiveOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the symlink policy.
    #[must_use]
    pub fn with_symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    /// Sets the compression level.
    ///
    /// Out-of-range levels are reported by [`ArchiveOptions::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to preserve permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Forces the archive format instead of detecting it.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveFormat>) -> Self {
        self.format = format;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidCompressionLevel`] if a compression level
    /// is set outside 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PackError::InvalidCompressionLevel { level });
        }
        Ok(())
    }

    /// Gzip compression for the tar envelope.
    pub(crate) fn gzip_compression(&self) -> flate2::Compression {
        flate2::Compression::new(u32::from(self.compression_level.unwrap_or(9)))
    }

    /// Deflate level for zip entries; `None` keeps the writer's default.
    pub(crate) fn zip_compression_level(&self) -> Option<i64> {
        self.compression_level.map(i64::from)
    }
}
