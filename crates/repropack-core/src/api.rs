//! High-level public API for deterministic archive creation.

use std::path::Path;
use std::time::Instant;

use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::ArchiveOptions;
use crate::creation::ArchiveReport;
use crate::creation::ArchiveRequest;
use crate::creation::commit::TempArchive;
use crate::creation::naming;
use crate::creation::order;
use crate::creation::progress::ProgressTracker;
use crate::creation::tar::write_tar_gz;
use crate::creation::walker::PathEnumerator;
use crate::creation::zip::write_zip;
use crate::formats::ArchiveFormat;
use crate::formats::detect_format;

/// Archives `source` into `destination` with default options.
///
/// The format follows the destination suffix: `.zip` produces a zip of the
/// files, anything else a gzip-compressed tar of directories, files and
/// symlinks. Entry names are relative to `source`, optionally below
/// `prefix`. The result is byte-identical for identical directory contents.
///
/// # Errors
///
/// Returns an error if:
/// - The source directory does not exist
/// - The destination suffix names an unsupported format
/// - The prefix is absolute or escapes the archive root
/// - Any source read or archive write fails
///
/// # Examples
///
/// ```no_run
/// use repropack_core::archive_deterministically;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = archive_deterministically("target/doc", "target/doc.tar.gz", Some("doc"))?;
/// println!("Packed {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn archive_deterministically<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    prefix: Option<&str>,
) -> Result<ArchiveReport> {
    let mut request = ArchiveRequest::new(source, destination);
    request.prefix = prefix.map(str::to_string);
    create_archive(&request, &ArchiveOptions::default())
}

/// Creates the archive described by `request`.
///
/// # Errors
///
/// See [`archive_deterministically`]; additionally fails on invalid options.
pub fn create_archive(request: &ArchiveRequest, options: &ArchiveOptions) -> Result<ArchiveReport> {
    let mut progress = NoopProgress;
    create_archive_with_progress(request, options, &mut progress)
}

/// Creates the archive described by `request`, reporting progress.
///
/// Callbacks arrive in archive order. `on_complete` fires only after the
/// archive has been renamed onto its destination.
///
/// # Errors
///
/// See [`create_archive`].
pub fn create_archive_with_progress(
    request: &ArchiveRequest,
    options: &ArchiveOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveReport> {
    let start = Instant::now();
    let span = tracing::debug_span!(
        "create_archive",
        source = %request.source_directory.display(),
        destination = %request.destination_path.display(),
    );
    let _guard = span.enter();

    options.validate()?;
    let prefix = naming::validate_prefix(request.prefix.as_deref())?;
    let format = resolve_format(&request.destination_path, options)?;
    tracing::debug!(%format, ?prefix, "resolved archive parameters");

    let enumeration =
        PathEnumerator::new(&request.source_directory, format, options.symlinks).enumerate()?;

    let mut report = ArchiveReport::new();
    report.format = Some(format);
    for skipped in &enumeration.skipped {
        report.entries_skipped += 1;
        report.add_warning(format!(
            "skipped {}: {}",
            skipped.relative_path, skipped.reason
        ));
    }

    let mut entries = enumeration.entries;
    order::sort_entries(&mut entries);
    let entries = naming::map_entries(entries, prefix, format);

    let mut tracker = ProgressTracker::new(progress, entries.len());
    let mut archive = TempArchive::create(&request.destination_path)?;
    tracing::debug!(
        temp = %archive.temp_path().display(),
        entries = entries.len(),
        "writing archive"
    );

    match format {
        ArchiveFormat::TarGz => {
            write_tar_gz(archive.writer(), &entries, options, &mut report, &mut tracker)?;
        }
        ArchiveFormat::Zip => {
            write_zip(archive.writer(), &entries, options, &mut report, &mut tracker)?;
        }
    }

    report.archive_size = archive.commit()?;
    tracker.on_complete();
    report.duration = start.elapsed();

    tracing::debug!(
        entries = report.total_entries(),
        bytes_read = report.bytes_read,
        archive_size = report.archive_size,
        "archive created"
    );

    Ok(report)
}

/// Uses the forced format if set, otherwise the destination suffix.
fn resolve_format(destination: &Path, options: &ArchiveOptions) -> Result<ArchiveFormat> {
    match options.format {
        Some(format) => Ok(format),
        None => detect_format(destination),
    }
}
