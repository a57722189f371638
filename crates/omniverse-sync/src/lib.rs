//! Filesystem sync and diff rendering for omniverse.
//!
//! The core engine only ever sees in-memory byte maps; this crate owns the
//! boundary to real directories: reading a tree into a corpus, writing a
//! corpus back (optionally deleting files the corpus no longer contains),
//! and producing a line diff of what a write-back would change.

pub mod diff;
pub mod syncer;

pub use diff::{CorpusDiff, LineChanges, diff_files};
pub use syncer::{DEFAULT_IGNORE, SyncError, Syncer};
