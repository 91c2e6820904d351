//! Archive format detection from the destination path.
//!
//! A `.zip` destination selects [`ArchiveFormat::Zip`]. Suffixes naming
//! another archive format this builder cannot produce are rejected instead of
//! silently receiving gzip-compressed tar bytes. Every other name selects
//! [`ArchiveFormat::TarGz`].

use std::fmt;
use std::path::Path;

use crate::PackError;
use crate::Result;

/// Suffixes of archive formats that are recognized but never written.
const UNSUPPORTED_SUFFIXES: &[&str] = &[
    ".tar", ".tar.bz2", ".tbz", ".tbz2", ".tar.xz", ".txz", ".tar.zst", ".tzst", ".7z", ".rar",
];

/// Archive formats the deterministic builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive with normalized entry metadata.
    TarGz,
    /// Deflate-compressed ZIP archive containing files only.
    Zip,
}

impl ArchiveFormat {
    /// Returns `true` if the format stores explicit directory entries.
    ///
    /// ```
    /// use repropack_core::ArchiveFormat;
    ///
    /// assert!(ArchiveFormat::TarGz.includes_directories());
    /// assert!(!ArchiveFormat::Zip.includes_directories());
    /// ```
    #[must_use]
    pub const fn includes_directories(self) -> bool {
        matches!(self, Self::TarGz)
    }

    /// Canonical file extension for the format, without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Detects the archive format from a destination path.
///
/// Matching is case-insensitive and only looks at the final path component.
///
/// # Errors
///
/// Returns [`PackError::UnsupportedFormat`] if the path has no file name or
/// ends with the suffix of a format other than `.zip` and `.tar.gz`.
///
/// # Examples
///
/// ```
/// use repropack_core::ArchiveFormat;
/// use repropack_core::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("out.zip"))?, ArchiveFormat::Zip);
/// assert_eq!(detect_format(Path::new("out.tar.gz"))?, ArchiveFormat::TarGz);
/// assert_eq!(detect_format(Path::new("servo-nightly"))?, ArchiveFormat::TarGz);
/// assert!(detect_format(Path::new("out.tar.xz")).is_err());
/// # Ok::<(), repropack_core::PackError>(())
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PackError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?
        .to_string_lossy()
        .to_ascii_lowercase();

    if file_name.ends_with(".zip") {
        return Ok(ArchiveFormat::Zip);
    }

    if UNSUPPORTED_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
    {
        return Err(PackError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    Ok(ArchiveFormat::TarGz)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_zip() {
        let path = PathBuf::from("archive.zip");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn test_detect_zip_case_insensitive() {
        let path = PathBuf::from("ARCHIVE.ZIP");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn test_detect_tar_gz() {
        let path = PathBuf::from("archive.tar.gz");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::TarGz);

        let path2 = PathBuf::from("archive.tgz");
        assert_eq!(detect_format(&path2).unwrap(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_detect_unknown_suffix_defaults_to_tar_gz() {
        for name in ["servo.pkg", "release.bin", "no_extension", "dir/archive.gz"] {
            assert_eq!(
                detect_format(Path::new(name)).unwrap(),
                ArchiveFormat::TarGz,
                "{name} should select tar.gz"
            );
        }
    }

    #[test]
    fn test_detect_unsupported_formats() {
        for name in [
            "archive.tar",
            "archive.tar.bz2",
            "archive.tbz2",
            "archive.tar.xz",
            "archive.TXZ",
            "archive.tar.zst",
            "archive.7z",
        ] {
            assert!(
                matches!(
                    detect_format(Path::new(name)),
                    Err(PackError::UnsupportedFormat { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_detect_no_file_name() {
        assert!(matches!(
            detect_format(Path::new("/")),
            Err(PackError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("out/..")),
            Err(PackError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ArchiveFormat::TarGz.to_string(), "tar.gz");
        assert_eq!(ArchiveFormat::Zip.to_string(), "zip");
    }
}
