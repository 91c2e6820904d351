//! Gzip-compressed tar serialization.
//!
//! Every header is built explicitly: nothing is copied from the host except
//! file size, content and (optionally) permission bits. Entry names are
//! stored byte for byte, so `./a.txt` stays `./a.txt`.

use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use flate2::GzBuilder;
use tar::Builder;
use tar::EntryType as TarEntryType;
use tar::Header;

use crate::PackError;
use crate::Result;
use crate::creation::config::ArchiveOptions;
use crate::creation::metadata;
use crate::creation::naming::NamedEntry;
use crate::creation::progress::ProgressTracker;
use crate::creation::report::ArchiveReport;
use crate::creation::walker::EntryKind;

/// Operating-system byte written to the gzip header ("unknown").
const GZIP_OS_UNKNOWN: u8 = 255;

/// Name of the pseudo-entry carrying a GNU long name or long link target.
const GNU_LONG_RECORD_NAME: &[u8] = b"././@LongLink";

/// Device and inode of a file with more than one link.
type InodeKey = (u64, u64);

/// Writes `entries` as a gzip-compressed tar stream into `writer`.
///
/// Entries are written in slice order. The gzip header carries mtime `0`
/// and OS byte `255`, and every tar header carries the normalized owner and
/// time fields from [`metadata`]. A file reached again through another hard
/// link is written as a link entry pointing at the first name.
///
/// Returns the writer once the gzip trailer has been written.
///
/// # Errors
///
/// Returns an error if a source entry cannot be read, changes size while it
/// is read, or the archive stream cannot be written.
pub fn write_tar_gz<W: Write>(
    writer: W,
    entries: &[NamedEntry],
    options: &ArchiveOptions,
    report: &mut ArchiveReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<W> {
    let encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(GZIP_OS_UNKNOWN)
        .write(writer, options.gzip_compression());

    let mut builder = Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);

    let mut linked: HashMap<InodeKey, &str> = HashMap::new();

    for named in entries {
        let name = Path::new(&named.archive_name);
        tracker.on_entry_start(name);

        match &named.entry.kind {
            EntryKind::File => {
                append_file(&mut builder, named, options, report, tracker, &mut linked)?;
            }
            EntryKind::Directory => {
                append_directory(&mut builder, named, options)?;
                report.directories_added += 1;
            }
            EntryKind::Symlink { target } => {
                let target = target.to_str().ok_or_else(|| PackError::NonUtf8Path {
                    path: named.entry.path.clone(),
                })?;

                let mut header = Header::new_gnu();
                header.set_entry_type(TarEntryType::Symlink);
                header.set_size(0);
                header.set_mode(metadata::SYMLINK_MODE);
                metadata::normalize_header(&mut header)?;
                append_entry(
                    &mut builder,
                    &mut header,
                    &named.archive_name,
                    Some(target),
                    io::empty(),
                )?;
                report.symlinks_added += 1;
            }
        }

        tracing::trace!(name = %named.archive_name, "appended tar entry");
        tracker.on_entry_complete(name);
    }

    let encoder = builder.into_inner()?;
    let writer = encoder.finish()?;
    Ok(writer)
}

fn append_file<'e, W: Write>(
    builder: &mut Builder<W>,
    named: &'e NamedEntry,
    options: &ArchiveOptions,
    report: &mut ArchiveReport,
    tracker: &mut ProgressTracker<'_>,
    linked: &mut HashMap<InodeKey, &'e str>,
) -> Result<()> {
    let file = File::open(&named.entry.path).map_err(|e| with_path(e, &named.entry.path))?;
    let file_metadata = file.metadata()?;
    let mode = metadata::entry_mode(&file_metadata, options.preserve_permissions);

    if let Some(key) = inode_key(&file_metadata) {
        if let Some(&first) = linked.get(&key) {
            let mut header = Header::new_gnu();
            header.set_entry_type(TarEntryType::Link);
            header.set_size(0);
            header.set_mode(mode);
            metadata::normalize_header(&mut header)?;
            append_entry(
                builder,
                &mut header,
                &named.archive_name,
                Some(first),
                io::empty(),
            )?;
            report.hardlinks_added += 1;
            return Ok(());
        }
        linked.insert(key, &named.archive_name);
    }

    let size = file_metadata.len();
    let mut header = Header::new_gnu();
    header.set_entry_type(TarEntryType::Regular);
    header.set_size(size);
    header.set_mode(mode);
    metadata::normalize_header(&mut header)?;

    let content = ExactReader::new(tracker.reader(file), size, &named.entry.path);
    append_entry(builder, &mut header, &named.archive_name, None, content)?;

    report.files_added += 1;
    report.bytes_read += size;
    Ok(())
}

fn append_directory<W: Write>(
    builder: &mut Builder<W>,
    named: &NamedEntry,
    options: &ArchiveOptions,
) -> Result<()> {
    let dir_metadata =
        fs::metadata(&named.entry.path).map_err(|e| with_path(e, &named.entry.path))?;

    let mut header = Header::new_gnu();
    header.set_entry_type(TarEntryType::Directory);
    header.set_size(0);
    header.set_mode(metadata::entry_mode(
        &dir_metadata,
        options.preserve_permissions,
    ));
    metadata::normalize_header(&mut header)?;

    append_entry(builder, &mut header, &named.archive_name, None, io::empty())?;
    Ok(())
}

#[cfg(unix)]
fn inode_key(file_metadata: &fs::Metadata) -> Option<InodeKey> {
    use std::os::unix::fs::MetadataExt;

    (file_metadata.nlink() > 1).then(|| (file_metadata.dev(), file_metadata.ino()))
}

#[cfg(not(unix))]
fn inode_key(_file_metadata: &fs::Metadata) -> Option<InodeKey> {
    None
}

/// Appends `header` and `data` with `name` (and `link` target, if any)
/// stored verbatim.
///
/// `Header::set_path` drops `.` components, which would turn `./a.txt` into
/// `a.txt`, so the name fields are filled here. Values longer than a header
/// field are preceded by a GNU long-name or long-link record.
fn append_entry<W: Write, R: Read>(
    builder: &mut Builder<W>,
    header: &mut Header,
    name: &str,
    link: Option<&str>,
    data: R,
) -> io::Result<()> {
    if let Some(link) = link {
        let field = &mut header.as_old_mut().linkname;
        fill_name_field(builder, field, link.as_bytes(), TarEntryType::GNULongLink)?;
    }
    let field = &mut header.as_old_mut().name;
    fill_name_field(builder, field, name.as_bytes(), TarEntryType::GNULongName)?;

    header.set_cksum();
    builder.append(header, data)
}

fn fill_name_field<W: Write>(
    builder: &mut Builder<W>,
    field: &mut [u8],
    value: &[u8],
    long_kind: TarEntryType,
) -> io::Result<()> {
    if value.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "entry name contains a NUL byte",
        ));
    }

    let stored = if value.len() > field.len() {
        append_long_record(builder, value, long_kind)?;
        &value[..field.len()]
    } else {
        value
    };

    field.fill(0);
    field[..stored.len()].copy_from_slice(stored);
    Ok(())
}

fn append_long_record<W: Write>(
    builder: &mut Builder<W>,
    value: &[u8],
    kind: TarEntryType,
) -> io::Result<()> {
    let mut header = Header::new_gnu();
    header.as_old_mut().name[..GNU_LONG_RECORD_NAME.len()].copy_from_slice(GNU_LONG_RECORD_NAME);
    header.set_entry_type(kind);
    header.set_mode(metadata::DEFAULT_FILE_MODE);
    // NUL-terminated
    header.set_size(value.len() as u64 + 1);
    metadata::normalize_header(&mut header)?;
    header.set_cksum();

    builder.append(&header, value.chain(io::repeat(0).take(1)))
}

fn with_path(err: io::Error, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {err}", path.display()))
}

/// Yields exactly `expected` bytes or fails.
///
/// The tar header records the size before content is copied, so a file that
/// shrinks or grows mid-read must abort the archive instead of corrupting it.
struct ExactReader<'p, R> {
    inner: io::Take<R>,
    expected: u64,
    seen: u64,
    path: &'p Path,
}

impl<'p, R: Read> ExactReader<'p, R> {
    fn new(inner: R, expected: u64, path: &'p Path) -> Self {
        Self {
            // One extra byte detects growth.
            inner: inner.take(expected.saturating_add(1)),
            expected,
            seen: 0,
            path,
        }
    }

    fn changed(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "file changed while archiving: {} (expected {} bytes)",
                self.path.display(),
                self.expected
            ),
        )
    }
}

impl<R: Read> Read for ExactReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.seen += n as u64;
        if self.seen > self.expected || (n == 0 && self.seen < self.expected && !buf.is_empty()) {
            return Err(self.changed());
        }
        Ok(n)
    }
}
