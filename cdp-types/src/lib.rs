//! Core type definitions for the CDP reconciliation core.
//!
//! This crate defines the records that flow through projection and
//! reconciliation:
//! - Profile and event identifiers
//! - [`Profile`] and its field groups
//! - [`Event`] with its tags and journey state
//! - Visit bookkeeping ([`ProfileTime`], [`ProfileVisit`])
//!
//! Free-form sub-documents are plain `serde_json` mappings. Conversion to and
//! from a whole [`Document`] goes through serde, so anything that can be
//! addressed by path in a document can be addressed in these records too.

mod event;
mod ids;
mod profile;
mod time;

pub use event::{Event, Journey, Tags};
pub use ids::{EventId, ProfileId};
pub use profile::{Profile, ProfileGroup, ProfileMetadata};
pub use time::{ProfileTime, ProfileVisit};

/// A semi-structured record.
pub type Document = serde_json::Value;

/// An insertion-ordered free-form mapping.
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
}
