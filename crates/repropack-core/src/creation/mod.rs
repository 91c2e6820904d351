//! Archive creation pipeline.
//!
//! Enumerate ([`walker`]), order ([`order`]), name ([`naming`]), serialize
//! ([`tar`] or [`zip`]) into a temporary file, then publish it with a single
//! rename ([`commit`]).

pub mod commit;
pub mod config;
pub mod creator;
pub mod metadata;
pub mod naming;
pub mod order;
pub mod progress;
pub mod report;
pub mod request;
pub mod tar;
pub mod walker;
pub mod zip;

// Re-exports for public API
pub use config::ArchiveOptions;
pub use config::SymlinkPolicy;
pub use creator::ArchiveCreator;
pub use report::ArchiveReport;
pub use request::ArchiveRequest;
pub use walker::Entry;
pub use walker::EntryKind;
