//! Progress plumbing shared by the tar and zip writers.

use std::io;
use std::io::Read;
use std::path::Path;

use crate::ProgressCallback;

/// Default number of bytes accumulated before `on_bytes_written` fires.
const DEFAULT_BATCH_BYTES: u64 = 1024 * 1024;

/// Numbers entries as they are written and forwards lifecycle events.
///
/// # Examples
///
/// ```
/// use repropack_core::NoopProgress;
/// use repropack_core::creation::progress::ProgressTracker;
/// use std::path::Path;
///
/// let mut progress = NoopProgress;
/// let mut tracker = ProgressTracker::new(&mut progress, 2);
///
/// tracker.on_entry_start(Path::new("a.txt"));
/// tracker.on_entry_complete(Path::new("a.txt"));
/// assert_eq!(tracker.current_entry(), 1);
/// ```
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for an archive of `total_entries` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Number of entries started so far.
    #[must_use]
    pub const fn current_entry(&self) -> usize {
        self.current_entry
    }

    /// Reports the start of the next entry.
    pub fn on_entry_start(&mut self, archive_name: &Path) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(archive_name, self.total_entries, self.current_entry);
    }

    /// Reports that an entry is fully written.
    pub fn on_entry_complete(&mut self, archive_name: &Path) {
        self.progress.on_entry_complete(archive_name);
    }

    /// Reports that the archive is committed.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Wraps a content reader so reads are reported to the callback.
    pub fn reader<R: Read>(&mut self, inner: R) -> ProgressReader<'_, R> {
        ProgressReader::new(inner, &mut *self.progress)
    }
}

/// Reader adapter that reports consumed bytes in batches.
///
/// Pending bytes are flushed to the callback when the threshold is reached
/// and when the reader is dropped.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    pending: u64,
    total: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Wraps `inner` with the default 1 MB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, DEFAULT_BATCH_BYTES)
    }

    /// Wraps `inner` with a custom batch threshold.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            pending: 0,
            total: 0,
            batch_threshold,
        }
    }

    /// Total bytes read through this adapter.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.total
    }

    /// Sends any pending byte count to the callback.
    pub fn flush_progress(&mut self) {
        if self.pending > 0 {
            self.progress.on_bytes_written(self.pending);
            self.pending = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let n64 = n as u64;
        self.total += n64;
        self.pending += n64;
        if self.pending >= self.batch_threshold {
            self.flush_progress();
        }
        Ok(n)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unused_io_amount)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Debug, Default)]
    struct RecordingProgress {
        started: Vec<(String, usize, usize)>,
        completed: Vec<String>,
        byte_updates: Vec<u64>,
        finished: bool,
    }

    impl ProgressCallback for RecordingProgress {
        fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
            self.started
                .push((path.to_string_lossy().into_owned(), total, current));
        }

        fn on_bytes_written(&mut self, bytes: u64) {
            self.byte_updates.push(bytes);
        }

        fn on_entry_complete(&mut self, path: &Path) {
            self.completed.push(path.to_string_lossy().into_owned());
        }

        fn on_complete(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_tracker_numbers_entries() {
        let mut progress = RecordingProgress::default();
        let mut tracker = ProgressTracker::new(&mut progress, 2);

        tracker.on_entry_start(Path::new("a.txt"));
        tracker.on_entry_complete(Path::new("a.txt"));
        tracker.on_entry_start(Path::new("b.txt"));
        tracker.on_entry_complete(Path::new("b.txt"));
        tracker.on_complete();

        assert_eq!(
            progress.started,
            vec![("a.txt".to_string(), 2, 1), ("b.txt".to_string(), 2, 2)]
        );
        assert_eq!(progress.completed, vec!["a.txt", "b.txt"]);
        assert!(progress.finished);
    }

    #[test]
    fn test_reader_flushes_on_drop() {
        let mut progress = RecordingProgress::default();
        {
            let mut reader = ProgressReader::new(Cursor::new(b"hello world"), &mut progress);
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(reader.total_bytes(), 11);
        }
        assert_eq!(progress.byte_updates, vec![11]);
    }

    #[test]
    fn test_reader_batches_updates() {
        let data = vec![0u8; 256 * 1024];
        let mut progress = RecordingProgress::default();
        {
            let mut reader =
                ProgressReader::with_batch_threshold(Cursor::new(data), &mut progress, 64 * 1024);
            let mut buf = vec![0u8; 32 * 1024];
            for _ in 0..8 {
                reader.read(&mut buf).unwrap();
            }
        }
        assert_eq!(progress.byte_updates, vec![64 * 1024; 4]);
    }

    #[test]
    fn test_reader_empty_input_reports_nothing() {
        let mut progress = RecordingProgress::default();
        {
            let mut reader = ProgressReader::new(Cursor::new(Vec::new()), &mut progress);
            let mut buf = [0u8; 8];
            assert_eq!(reader.read(&mut buf).unwrap(), 0);
        }
        assert!(progress.byte_updates.is_empty());
    }

    #[test]
    fn test_tracker_reader_reports_to_callback() {
        let mut progress = RecordingProgress::default();
        {
            let mut tracker = ProgressTracker::new(&mut progress, 1);
            let mut reader = tracker.reader(Cursor::new(b"abc"));
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
        }
        assert_eq!(progress.byte_updates, vec![3]);
    }
}
