//! Schema-driven field projection for CDP profiles.
//!
//! Defines the tables that say how event fields land in a profile, and the
//! code that applies them:
//! - [`Operation`]: what a schema entry does at its destination
//! - [`MergeSchema`]: destination path → (source path, operation)
//! - [`IndexSchema`]: destination path → source path, used to relocate fields
//! - [`SchemaProjector`] / [`project`]: apply a merge schema to a document
//! - [`reindex`]: apply an index schema, then prune emptied mappings
//! - [`EventTypeCatalogue`]: per-event-type schemas, journey state and tags
//!
//! Schemas are parsed once when configuration is loaded. Unknown operation
//! names are rejected there, never at projection time.

mod catalogue;
mod operation;
mod projector;
mod schema;

pub use catalogue::{
    EventTypeCatalogue, EventTypeDefinition, EventTypeEntry, EventTypeList, StateSpec,
    capitalize_event_type_id,
};
pub use operation::Operation;
pub use projector::{
    Projection, ProjectionError, ProjectionOptions, SchemaProjector, project, reindex,
};
pub use schema::{IndexRule, IndexSchema, MergeRule, MergeSchema};

/// Errors raised while loading schemas and catalogues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown merge operation {0:?}")]
    UnknownOperation(String),

    #[error("malformed schema entry for `{destination}`: {reason}")]
    MalformedEntry { destination: String, reason: String },

    #[error("schema must be a mapping, found a {0}")]
    NotAMapping(&'static str),

    #[error("event type catalogue must be a sequence of definitions, found a {0}")]
    NotASequence(&'static str),

    #[error("invalid event type definition #{index}: {reason}")]
    InvalidDefinition { index: usize, reason: String },
}
