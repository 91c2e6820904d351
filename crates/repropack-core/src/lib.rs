//! Deterministic, atomically committed archive creation.
//!
//! `repropack-core` turns a directory into a `.tar.gz` or `.zip` whose bytes
//! depend only on the directory's logical contents: entries are sorted by a
//! fixed byte order, ownership and timestamps are normalized, and compressor
//! headers carry no host time. The archive is written to a `.temp~` file and
//! renamed onto the destination only when complete.
//!
//! # Examples
//!
//! ```no_run
//! use repropack_core::archive_deterministically;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = archive_deterministically("resources", "dist/resources.tar.gz", Some("servo/"))?;
//! println!("Packed {} files into {} bytes", report.files_added, report.archive_size);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod creation;
pub mod error;
pub mod formats;
pub mod report;

// Re-export main API types
pub use api::archive_deterministically;
pub use api::create_archive;
pub use api::create_archive_with_progress;
pub use creation::ArchiveCreator;
pub use creation::ArchiveOptions;
pub use creation::ArchiveReport;
pub use creation::ArchiveRequest;
pub use creation::SymlinkPolicy;
pub use error::PackError;
pub use error::Result;
pub use formats::ArchiveFormat;
pub use formats::detect_format;
pub use report::NoopProgress;
pub use report::ProgressCallback;
