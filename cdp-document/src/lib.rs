//! Document primitives for CDP profile reconciliation.
//!
//! A [`Document`] is a `serde_json::Value` with insertion-ordered mappings.
//! This crate provides the shape-aware building blocks used by the schema
//! projector and the profile reconciler:
//!
//! - [`FlatPath`]: a dotted address into a document, held as segments
//! - [`FlatPathView`]: a lossless flat projection of a document, keyed by path
//! - [`merge_lists`] / [`merge_sequences`]: ordered list merge with optional dedup
//! - [`deep_merge`] / [`merge_mappings`]: recursive per-key document merge
//! - [`prune_empty_mappings`]: bottom-up removal of mappings left empty
//!
//! All operations are pure or work on exclusively owned values. Nothing here
//! performs I/O or takes locks.

mod flat;
mod list;
mod merge;
mod path;

pub use flat::{FlatPathView, prune_empty_mappings};
pub use list::{ListPolicy, merge_lists, merge_sequences};
pub use merge::{MAX_MERGE_DEPTH, MergeOptions, deep_merge, merge_mappings};
pub use path::FlatPath;

/// A semi-structured record: mappings, sequences and scalars.
pub type Document = serde_json::Value;

/// An insertion-ordered mapping inside a [`Document`].
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised by path manipulation and merging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// A write needed to descend through a value that is not a mapping.
    #[error("path conflict at `{path}`: `{blocked_at}` holds a {found}, not a mapping")]
    PathConflict {
        path: String,
        blocked_at: String,
        found: &'static str,
    },

    #[error("merge depth limit of {limit} exceeded at `{path}`")]
    DepthLimitExceeded { path: String, limit: usize },
}

/// Returns a short name for the shape of a value, for diagnostics.
#[must_use]
pub fn shape_of(value: &Document) -> &'static str {
    match value {
        Document::Null => "null",
        Document::Bool(_) => "bool",
        Document::Number(_) => "number",
        Document::String(_) => "string",
        Document::Array(_) => "sequence",
        Document::Object(_) => "mapping",
    }
}
