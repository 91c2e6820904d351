//! Progress reporting hooks for archive creation.

use std::path::Path;

/// Callback trait for progress reporting during archive creation.
///
/// Callbacks arrive in archive order, which is the deterministic order of the
/// entries, so a consumer sees the same sequence on every run. The trait
/// requires `Send` so a progress sink can be moved across threads by callers.
///
/// # Examples
///
/// ```
/// use repropack_core::ProgressCallback;
/// use std::path::Path;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("Packing {}/{}: {}", current, total, path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, path: &Path) {
///         println!("Packed: {}", path.display());
///     }
///
///     fn on_complete(&mut self) {
///         println!("Archive committed");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is written.
    ///
    /// # Arguments
    ///
    /// * `path` - Archive name of the entry
    /// * `total` - Total number of entries in the archive
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called as source file content is read into the archive.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Number of bytes read in this update
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the archive has been renamed into place.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
