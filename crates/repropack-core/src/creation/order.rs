//! Locale-independent ordering of archive entries.

use std::cmp::Ordering;

use crate::creation::walker::Entry;

/// Compares two relative paths by the bytes of their UTF-8 encoding.
///
/// This is codepoint order, identical to `strcoll` under the `"C"` locale,
/// and independent of any process-wide locale setting.
///
/// # Examples
///
/// ```
/// use repropack_core::creation::order::compare_paths;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_paths("./B.txt", "./a.txt"), Ordering::Less);
/// assert_eq!(compare_paths("./subdir", "./subdir/b.txt"), Ordering::Less);
/// ```
#[must_use]
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Sorts entries into archive order by their relative path.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| compare_paths(&a.relative_path, &b.relative_path));
}
