//! Source tree enumeration.
//!
//! Produces the unordered set of entries below a source directory, each with
//! a `/`-separated relative path rooted at the source (`"./a.txt"`). Ordering
//! is imposed afterwards by [`crate::creation::order`].

use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::PackError;
use crate::Result;
use crate::creation::config::SymlinkPolicy;
use crate::formats::ArchiveFormat;

/// Type of an enumerated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file; content is read from [`Entry::path`] when written.
    File,

    /// Directory (tar only).
    Directory,

    /// Symbolic link stored as a link entry (tar only).
    Symlink {
        /// Link target, recorded verbatim.
        target: PathBuf,
    },
}

/// A filesystem entry selected for archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full filesystem path to the entry.
    pub path: PathBuf,

    /// Path relative to the source directory, `/`-separated, starting with
    /// `./`.
    pub relative_path: String,

    /// Type of entry.
    pub kind: EntryKind,
}

/// An entry found on disk that is not archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Relative path of the skipped entry.
    pub relative_path: String,

    /// Why it was skipped.
    pub reason: &'static str,
}

/// Result of enumerating a source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Entries to archive, in filesystem read order.
    pub entries: Vec<Entry>,

    /// Entries that were found but not archived.
    pub skipped: Vec<SkippedEntry>,
}

/// Walks a source directory and collects archive entries.
///
/// Which entries are produced depends on the target format: tar receives
/// directories, files and (with [`SymlinkPolicy::Preserve`]) symlinks, zip
/// receives files only.
///
/// # Examples
///
/// ```no_run
/// use repropack_core::ArchiveFormat;
/// use repropack_core::SymlinkPolicy;
/// use repropack_core::creation::walker::PathEnumerator;
/// use std::path::Path;
///
/// let enumerator = PathEnumerator::new(
///     Path::new("./resources"),
///     ArchiveFormat::TarGz,
///     SymlinkPolicy::Preserve,
/// );
/// for entry in enumerator.enumerate()?.entries {
///     println!("{}", entry.relative_path);
/// }
/// # Ok::<(), repropack_core::PackError>(())
/// ```
pub struct PathEnumerator<'a> {
    root: &'a Path,
    format: ArchiveFormat,
    symlinks: SymlinkPolicy,
}

impl<'a> PathEnumerator<'a> {
    /// Creates an enumerator for the given source directory.
    #[must_use]
    pub fn new(root: &'a Path, format: ArchiveFormat, symlinks: SymlinkPolicy) -> Self {
        Self {
            root,
            format,
            symlinks,
        }
    }

    /// Walks the tree and returns every entry to archive.
    ///
    /// The source directory itself is not an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source does not exist or is not a directory
    /// - Directory traversal fails (permissions, symlink loops)
    /// - A symlink is found under [`SymlinkPolicy::Reject`]
    /// - A file name is not valid UTF-8
    pub fn enumerate(&self) -> Result<Enumeration> {
        let is_dir = fs::metadata(self.root).is_ok_and(|m| m.is_dir());
        if !is_dir {
            return Err(PackError::SourceNotFound {
                path: self.root.to_path_buf(),
            });
        }

        let walker = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(self.symlinks == SymlinkPolicy::Follow);

        let mut enumeration = Enumeration::default();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let kind = e.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
                PackError::Io(io::Error::new(kind, format!("walkdir error: {e}")))
            })?;

            let relative_path = relative_path(self.root, entry.path())?;
            let file_type = entry.file_type();

            let kind = if file_type.is_symlink() {
                match self.classify_symlink(entry.path())? {
                    Ok(kind) => kind,
                    Err(reason) => {
                        tracing::debug!(path = %relative_path, reason, "skipping entry");
                        enumeration.skipped.push(SkippedEntry {
                            relative_path,
                            reason,
                        });
                        continue;
                    }
                }
            } else if file_type.is_dir() {
                if !self.format.includes_directories() {
                    continue;
                }
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                tracing::debug!(path = %relative_path, "skipping special file");
                enumeration.skipped.push(SkippedEntry {
                    relative_path,
                    reason: "not a regular file, directory or symlink",
                });
                continue;
            };

            enumeration.entries.push(Entry {
                path: entry.into_path(),
                relative_path,
                kind,
            });
        }

        tracing::debug!(
            root = %self.root.display(),
            entries = enumeration.entries.len(),
            skipped = enumeration.skipped.len(),
            "enumerated source tree"
        );

        Ok(enumeration)
    }

    /// Decides what an unresolved symlink becomes.
    ///
    /// The outer error aborts the walk; the inner `Err` is a skip reason.
    fn classify_symlink(&self, path: &Path) -> Result<std::result::Result<EntryKind, &'static str>> {
        match self.symlinks {
            SymlinkPolicy::Reject => Err(PackError::SymlinkRejected {
                path: path.to_path_buf(),
            }),
            // Resolved by walkdir; only reachable if the walker reports a raw link.
            SymlinkPolicy::Follow => Ok(Ok(EntryKind::File)),
            SymlinkPolicy::Preserve => match self.format {
                ArchiveFormat::TarGz => {
                    let target = fs::read_link(path).map_err(|e| {
                        PackError::Io(io::Error::new(
                            e.kind(),
                            format!("cannot read symlink target for {}: {e}", path.display()),
                        ))
                    })?;
                    Ok(Ok(EntryKind::Symlink { target }))
                }
                ArchiveFormat::Zip => match fs::metadata(path) {
                    Ok(metadata) if metadata.is_dir() => Ok(Err("symlink to a directory")),
                    Ok(metadata) if !metadata.is_file() => {
                        Ok(Err("symlink to a special file"))
                    }
                    // Dangling links fail when their content is read.
                    _ => Ok(Ok(EntryKind::File)),
                },
            },
        }
    }
}

/// Builds the `./`-rooted, `/`-separated relative path of `path` under `root`.
fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        PackError::Io(io::Error::other(format!(
            "{} is not under source directory {}",
            path.display(),
            root.display()
        )))
    })?;

    let mut out = String::from(".");
    for component in relative.components() {
        if let Component::Normal(name) = component {
            let name = name.to_str().ok_or_else(|| PackError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            out.push('/');
            out.push_str(name);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative_paths(enumeration: &Enumeration) -> Vec<&str> {
        let mut paths: Vec<_> = enumeration
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/b.txt"), "b").unwrap();
        fs::create_dir(root.join("emptydir")).unwrap();
        temp
    }

    #[test]
    fn test_enumerate_tar_includes_directories() {
        let temp = sample_tree();
        let enumeration =
            PathEnumerator::new(temp.path(), ArchiveFormat::TarGz, SymlinkPolicy::Preserve)
                .enumerate()
                .unwrap();

        assert_eq!(
            relative_paths(&enumeration),
            vec!["./a.txt", "./emptydir", "./subdir", "./subdir/b.txt"]
        );

        let emptydir = enumeration
            .entries
            .iter()
            .find(|e| e.relative_path == "./emptydir")
            .unwrap();
        assert_eq!(emptydir.kind, EntryKind::Directory);
    }

    #[test]
    fn test_enumerate_zip_files_only() {
        let temp = sample_tree();
        let enumeration =
            PathEnumerator::new(temp.path(), ArchiveFormat::Zip, SymlinkPolicy::Preserve)
                .enumerate()
                .unwrap();

        assert_eq!(relative_paths(&enumeration), vec!["./a.txt", "./subdir/b.txt"]);
        assert!(enumeration.entries.iter().all(|e| e.kind == EntryKind::File));
        assert!(enumeration.skipped.is_empty());
    }

    #[test]
    fn test_enumerate_excludes_root() {
        let temp = TempDir::new().unwrap();
        let enumeration =
            PathEnumerator::new(temp.path(), ArchiveFormat::TarGz, SymlinkPolicy::Preserve)
                .enumerate()
                .unwrap();
        assert!(enumeration.entries.is_empty());
    }

    #[test]
    fn test_enumerate_includes_hidden_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "x").unwrap();

        let enumeration =
            PathEnumerator::new(temp.path(), ArchiveFormat::Zip, SymlinkPolicy::Preserve)
                .enumerate()
                .unwrap();
        assert_eq!(relative_paths(&enumeration), vec!["./.hidden"]);
    }

    #[test]
    fn test_enumerate_source_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let result = PathEnumerator::new(&missing, ArchiveFormat::TarGz, SymlinkPolicy::Preserve)
            .enumerate();
        assert!(matches!(result, Err(PackError::SourceNotFound { path }) if path == missing));
    }

    #[test]
    fn test_enumerate_source_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result =
            PathEnumerator::new(&file, ArchiveFormat::TarGz, SymlinkPolicy::Preserve).enumerate();
        assert!(matches!(result, Err(PackError::SourceNotFound { .. })));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/src");
        let path = Path::new("/src/a/b/c.txt");
        assert_eq!(relative_path(root, path).unwrap(), "./a/b/c.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_tar_preserves_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("dir/inner.txt"), "inner").unwrap();
        std::os::unix::fs::symlink("target.txt", root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink("dir", root.join("dirlink")).unwrap();

        let enumeration = PathEnumerator::new(root, ArchiveFormat::TarGz, SymlinkPolicy::Preserve)
            .enumerate()
            .unwrap();

        let link = enumeration
            .entries
            .iter()
            .find(|e| e.relative_path == "./link.txt")
            .unwrap();
        assert_eq!(
            link.kind,
            EntryKind::Symlink {
                target: PathBuf::from("target.txt")
            }
        );

        // Directory symlinks are stored as links, never descended into
        assert!(
            !enumeration
                .entries
                .iter()
                .any(|e| e.relative_path.starts_with("./dirlink/"))
        );
        assert!(matches!(
            enumeration
                .entries
                .iter()
                .find(|e| e.relative_path == "./dirlink")
                .unwrap()
                .kind,
            EntryKind::Symlink { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_zip_symlink_handling() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        fs::create_dir(root.join("dir")).unwrap();
        std::os::unix::fs::symlink("target.txt", root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink("dir", root.join("dirlink")).unwrap();

        let enumeration = PathEnumerator::new(root, ArchiveFormat::Zip, SymlinkPolicy::Preserve)
            .enumerate()
            .unwrap();

        assert_eq!(relative_paths(&enumeration), vec!["./link.txt", "./target.txt"]);
        assert_eq!(
            enumeration.skipped,
            vec![SkippedEntry {
                relative_path: "./dirlink".to_string(),
                reason: "symlink to a directory",
            }]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("dir/inner.txt"), "inner").unwrap();
        std::os::unix::fs::symlink("dir", root.join("dirlink")).unwrap();

        let enumeration = PathEnumerator::new(root, ArchiveFormat::TarGz, SymlinkPolicy::Follow)
            .enumerate()
            .unwrap();

        assert_eq!(
            relative_paths(&enumeration),
            vec!["./dir", "./dir/inner.txt", "./dirlink", "./dirlink/inner.txt"]
        );
        assert!(
            enumeration
                .entries
                .iter()
                .all(|e| !matches!(e.kind, EntryKind::Symlink { .. }))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_reject_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink("target.txt", root.join("link.txt")).unwrap();

        let result =
            PathEnumerator::new(root, ArchiveFormat::TarGz, SymlinkPolicy::Reject).enumerate();
        assert!(matches!(result, Err(PackError::SymlinkRejected { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_detects_symlink_cycles() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("dir1/dir2")).unwrap();
        std::os::unix::fs::symlink(root.join("dir1"), root.join("dir1/dir2/link")).unwrap();

        let result =
            PathEnumerator::new(root, ArchiveFormat::TarGz, SymlinkPolicy::Follow).enumerate();
        let err = result.unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
        assert!(err.to_string().contains("walkdir error"));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"bad\xffname");
        if fs::write(temp.path().join(name), "x").is_err() {
            // Some filesystems refuse non-UTF-8 names outright
            return;
        }

        let result =
            PathEnumerator::new(temp.path(), ArchiveFormat::Zip, SymlinkPolicy::Preserve)
                .enumerate();
        assert!(matches!(result, Err(PackError::NonUtf8Path { .. })));
    }
}
