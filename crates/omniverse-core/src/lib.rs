//! # Omniverse Core
//!
//! The substitution-consistency engine behind the `omniverse` tool. Several
//! parallel copies ("alterverses") of a directory tree differ only in a small
//! set of named string values declared in per-variant manifests; one
//! canonical, placeholder-templated copy (the "singularity") is the source
//! all variants are generated from. This crate owns everything that must
//! never be lossy or ambiguous about that arrangement.
//!
//! ## Architecture
//!
//! ```text
//! Manifest              ← one variant's key→value vocabulary
//!     │
//! LookupTable           ← ordered substitution records for a manifest pair
//!     │
//! TokenStream           ← literal/match spans, collision-safe splitting
//!     │
//! Interverse            ← deduce / strict deduce over a file corpus
//!
//! Singularity + KeyIndex  ← placeholder extraction and variant generation
//! Alterverse              ← value→placeholder extraction (the inverse)
//! checker                 ← pre-flight consistency validations
//! ```
//!
//! Everything here is synchronous and pure: corpora are in-memory byte maps
//! owned by the caller, values are constructed in one validating step and
//! immutable afterwards, and validation functions return every finding
//! instead of stopping at the first.

pub mod alterverse;
pub mod checker;
pub mod interverse;
pub mod lines;
pub mod lookup;
pub mod manifest;
pub mod singularity;
pub mod token;

pub use alterverse::Alterverse;
pub use checker::{CheckFinding, Severity};
pub use interverse::{DeduceError, Interverse};
pub use lines::{LineBreak, split_lines};
pub use lookup::{LookupError, LookupRecord, LookupTable};
pub use manifest::Manifest;
pub use singularity::{ExpressionTemplate, KeyIndex, Singularity, SingularityConfig, SingularityError};
pub use token::{Token, TokenStream};

/// A file corpus: relative path → raw bytes. Owned by the caller; the core
/// never persists it.
pub type FileCorpus = std::collections::BTreeMap<String, Vec<u8>>;
