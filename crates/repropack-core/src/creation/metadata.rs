//! Normalized entry metadata.
//!
//! Ownership and timestamps are never taken from the filesystem. Permission
//! bits are, unless disabled.

use std::fs::Metadata;
use std::io;

use tar::Header;

/// Owner uid stored on every tar entry.
pub const OWNER_UID: u64 = 0;

/// Owner gid stored on every tar entry.
pub const OWNER_GID: u64 = 0;

/// Owner user name stored on every tar entry.
pub const OWNER_NAME: &str = "root";

/// Owner group name stored on every tar entry.
pub const GROUP_NAME: &str = "root";

/// Modification time stored on every tar entry.
pub const ENTRY_MTIME: u64 = 0;

/// Mode for files when permissions are not preserved.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Mode for directories when permissions are not preserved.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Mode for symlinks. Hosts disagree on symlink permission bits, so a
/// constant is always used.
pub const SYMLINK_MODE: u32 = 0o777;

/// Overwrites ownership and time fields of a tar header.
///
/// # Errors
///
/// Returns an error if the header cannot hold the user or group name.
pub fn normalize_header(header: &mut Header) -> io::Result<()> {
    header.set_uid(OWNER_UID);
    header.set_gid(OWNER_GID);
    header.set_username(OWNER_NAME)?;
    header.set_groupname(GROUP_NAME)?;
    header.set_mtime(ENTRY_MTIME);
    Ok(())
}

/// Permission bits to store for an entry.
#[must_use]
pub fn entry_mode(metadata: &Metadata, preserve_permissions: bool) -> u32 {
    let fallback = if metadata.is_dir() {
        DEFAULT_DIR_MODE
    } else {
        DEFAULT_FILE_MODE
    };

    if preserve_permissions {
        filesystem_mode(metadata, fallback)
    } else {
        fallback
    }
}

#[cfg(unix)]
fn filesystem_mode(metadata: &Metadata, _fallback: u32) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn filesystem_mode(metadata: &Metadata, fallback: u32) -> u32 {
    if metadata.permissions().readonly() {
        fallback & 0o555
    } else {
        fallback
    }
}
