//! Atomic publication of a finished archive.
//!
//! The archive is written next to its destination under a `.temp~` suffix and
//! renamed into place only after every byte is flushed and synced. A failed
//! run leaves the destination untouched; the temp file is kept for diagnosis.

use std::ffi::OsString;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;

/// Suffix appended to the destination path for the in-progress archive.
pub const TEMP_SUFFIX: &str = ".temp~";

/// Mode of the temporary (and therefore the final) archive file on Unix.
#[cfg(unix)]
const ARCHIVE_FILE_MODE: u32 = 0o644;

/// Returns the temporary path used while writing `destination`.
///
/// # Examples
///
/// ```
/// use repropack_core::creation::commit::temp_path_for;
/// use std::path::Path;
///
/// assert_eq!(
///     temp_path_for(Path::new("out/servo.tar.gz")),
///     Path::new("out/servo.tar.gz.temp~")
/// );
/// ```
#[must_use]
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// An archive being written to its temporary path.
#[derive(Debug)]
pub struct TempArchive {
    temp_path: PathBuf,
    destination: PathBuf,
    writer: BufWriter<File>,
}

impl TempArchive {
    /// Opens the temporary file for `destination`.
    ///
    /// An existing temp file is truncated, so leftovers from an earlier
    /// failed run never leak into the new archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn create(destination: &Path) -> Result<Self> {
        let temp_path = temp_path_for(destination);

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(ARCHIVE_FILE_MODE);
        }

        let file = options.open(&temp_path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("cannot create {}: {e}", temp_path.display()),
            )
        })?;

        tracing::debug!(temp = %temp_path.display(), "opened temporary archive");

        Ok(Self {
            temp_path,
            destination: destination.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Path of the temporary file.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Buffered writer over the temporary file.
    pub fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flushes, syncs and closes the temporary file, then renames it onto the
    /// destination.
    ///
    /// Returns the size of the committed archive in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing, syncing or renaming fails. The temporary
    /// file is left in place in that case.
    pub fn commit(self) -> Result<u64> {
        let Self {
            temp_path,
            destination,
            mut writer,
        } = self;

        writer.flush()?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        let size = file.metadata()?.len();
        drop(file);

        std::fs::rename(&temp_path, &destination).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "cannot rename {} to {}: {e}",
                    temp_path.display(),
                    destination.display()
                ),
            )
        })?;

        tracing::debug!(
            destination = %destination.display(),
            size,
            "committed archive"
        );

        Ok(size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("a/b.zip")),
            PathBuf::from("a/b.zip.temp~")
        );
    }

    #[test]
    fn test_commit_renames_into_place() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out.tar.gz");

        let mut archive = TempArchive::create(&destination).unwrap();
        assert!(archive.temp_path().exists());
        archive.writer().write_all(b"archive bytes").unwrap();

        let size = archive.commit().unwrap();

        assert_eq!(size, 13);
        assert_eq!(fs::read(&destination).unwrap(), b"archive bytes");
        assert!(!temp_path_for(&destination).exists());
    }

    #[test]
    fn test_create_truncates_stale_temp_file() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out.zip");
        fs::write(temp_path_for(&destination), vec![b'x'; 4096]).unwrap();

        let mut archive = TempArchive::create(&destination).unwrap();
        archive.writer().write_all(b"new").unwrap();
        archive.commit().unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"new");
    }

    #[test]
    fn test_uncommitted_archive_leaves_destination_alone() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out.zip");
        fs::write(&destination, b"previous").unwrap();

        {
            let mut archive = TempArchive::create(&destination).unwrap();
            archive.writer().write_all(b"partial").unwrap();
        }

        assert_eq!(fs::read(&destination).unwrap(), b"previous");
        assert!(temp_path_for(&destination).exists());
    }

    #[test]
    fn test_create_fails_in_missing_directory() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("missing/out.zip");

        let err = TempArchive::create(&destination).unwrap_err();
        assert!(err.to_string().contains("cannot create"));
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out.tar.gz");
        TempArchive::create(&destination).unwrap().commit().unwrap();

        let mode = fs::metadata(&destination).unwrap().permissions().mode();
        // umask may clear bits but never adds any
        assert_eq!(mode & 0o7777 & !0o644, 0);
    }
}
