//! Deflate-compressed zip serialization.

use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::Result;
use crate::creation::config::ArchiveOptions;
use crate::creation::metadata;
use crate::creation::naming::NamedEntry;
use crate::creation::progress::ProgressTracker;
use crate::creation::report::ArchiveReport;
use crate::creation::walker::EntryKind;

/// Writes the file entries of `entries` as a zip archive into `writer`.
///
/// Only [`EntryKind::File`] entries are stored. Every entry is deflated and
/// timestamped with the zip epoch (1980-01-01 00:00:00), so the host clock
/// never reaches the output.
///
/// # Errors
///
/// Returns an error if a source file cannot be read or the archive cannot be
/// written.
pub fn write_zip<W: Write + Seek>(
    writer: W,
    entries: &[NamedEntry],
    options: &ArchiveOptions,
    report: &mut ArchiveReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(options.zip_compression_level())
        .last_modified_time(DateTime::default());

    for named in entries {
        let name = Path::new(&named.archive_name);
        tracker.on_entry_start(name);

        match &named.entry.kind {
            EntryKind::File => {
                let mut file = File::open(&named.entry.path).map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("{}: {e}", named.entry.path.display()),
                    )
                })?;
                let file_metadata = file.metadata()?;
                let size = file_metadata.len();

                let file_options = base_options
                    .unix_permissions(metadata::entry_mode(
                        &file_metadata,
                        options.preserve_permissions,
                    ))
                    .large_file(size >= u64::from(u32::MAX));

                zip.start_file(named.archive_name.as_str(), file_options)
                    .map_err(|e| io::Error::other(format!("failed to start zip entry: {e}")))?;

                let mut reader = tracker.reader(&mut file);
                io::copy(&mut reader, &mut zip)?;
                report.bytes_read += reader.total_bytes();
                drop(reader);

                report.files_added += 1;
            }
            EntryKind::Directory | EntryKind::Symlink { .. } => {
                // Enumeration never yields these for zip.
                report.entries_skipped += 1;
                report.add_warning(format!(
                    "not stored in zip: {}",
                    named.entry.relative_path
                ));
            }
        }

        tracing::trace!(name = %named.archive_name, "appended zip entry");
        tracker.on_entry_complete(name);
    }

    let writer = zip
        .finish()
        .map_err(|e| io::Error::other(format!("failed to finish zip archive: {e}")))?;
    Ok(writer)
}
