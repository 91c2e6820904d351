//! Mapping from relative source paths to archive entry names.
//!
//! Tar entries keep the enumerated `./`-relative path as is when no prefix
//! is given, and directory entries end in `/`. Zip entries are always
//! normalized, so `./a.txt` is stored as `a.txt`. With a prefix both formats
//! store `normalize(prefix + "/" + relative_path)`.

use std::path::Path;

use crate::PackError;
use crate::Result;
use crate::creation::walker::Entry;
use crate::creation::walker::EntryKind;
use crate::formats::ArchiveFormat;

/// An entry paired with the name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    /// The enumerated entry.
    pub entry: Entry,

    /// Name inside the archive, `/`-separated.
    pub archive_name: String,
}

/// Lexically normalizes a `/`-separated path.
///
/// Empty and `.` components are dropped, `..` removes the preceding
/// component, and a leading `/` is kept. `..` that cannot be collapsed is
/// kept. Returns `"."` for a path that normalizes to nothing.
///
/// # Examples
///
/// ```
/// use repropack_core::creation::naming::normalize;
///
/// assert_eq!(normalize("./a.txt"), "a.txt");
/// assert_eq!(normalize("servo//./resources/../res/foo.txt"), "servo/res/foo.txt");
/// assert_eq!(normalize("../x"), "../x");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            name => parts.push(name),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Validates an archive prefix and returns it in usable form.
///
/// An empty prefix (or one that normalizes to `.`) means no prefix.
///
/// # Errors
///
/// Returns [`PackError::InvalidPrefix`] if the prefix is absolute or
/// normalizes to a path that escapes the archive root.
pub fn validate_prefix(prefix: Option<&str>) -> Result<Option<&str>> {
    let Some(prefix) = prefix else {
        return Ok(None);
    };

    if prefix.starts_with('/') || prefix.starts_with('\\') || Path::new(prefix).has_root() {
        return Err(PackError::InvalidPrefix {
            prefix: prefix.to_string(),
        });
    }

    let normalized = normalize(prefix);
    if normalized == ".." || normalized.starts_with("../") {
        return Err(PackError::InvalidPrefix {
            prefix: prefix.to_string(),
        });
    }

    if normalized == "." {
        return Ok(None);
    }
    Ok(Some(prefix))
}

/// Computes the archive name for a relative path.
///
/// Directory entries get their trailing `/` from [`map_entries`].
///
/// # Examples
///
/// ```
/// use repropack_core::ArchiveFormat;
/// use repropack_core::creation::naming::archive_name;
///
/// let tar = ArchiveFormat::TarGz;
/// assert_eq!(archive_name("./resources/foo.txt", Some("servo/"), tar), "servo/resources/foo.txt");
/// assert_eq!(archive_name("./a.txt", None, tar), "./a.txt");
/// assert_eq!(archive_name("./a.txt", None, ArchiveFormat::Zip), "a.txt");
/// ```
#[must_use]
pub fn archive_name(relative_path: &str, prefix: Option<&str>, format: ArchiveFormat) -> String {
    match (prefix, format) {
        (Some(prefix), _) => normalize(&format!("{prefix}/{relative_path}")),
        (None, ArchiveFormat::TarGz) => relative_path.to_string(),
        (None, ArchiveFormat::Zip) => normalize(relative_path),
    }
}

/// Attaches archive names to sorted entries, keeping their order.
///
/// `prefix` must already have passed [`validate_prefix`].
#[must_use]
pub fn map_entries(
    entries: Vec<Entry>,
    prefix: Option<&str>,
    format: ArchiveFormat,
) -> Vec<NamedEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let mut archive_name = archive_name(&entry.relative_path, prefix, format);
            if format == ArchiveFormat::TarGz
                && entry.kind == EntryKind::Directory
                && !archive_name.ends_with('/')
            {
                archive_name.push('/');
            }
            NamedEntry {
                entry,
                archive_name,
            }
        })
        .collect()
}
