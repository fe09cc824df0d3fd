//! Profile reconciliation for the CDP core.
//!
//! Brings the pieces together for one tracked event:
//! 1. [`EventIndexer::auto_index`] relocates event fields, resolves the
//!    journey state and applies default tags from the event-type catalogue.
//! 2. [`EventIndexer::copy_to_profile`] projects event fields into the
//!    profile using the type's merge schema.
//! 3. [`ProfileReconciler::reconcile`] merges the result with the cached
//!    profile, group by group.
//!
//! [`TrackingPipeline`] runs all three. Reconciliation is best-effort: it
//! never fails the pipeline, it reports how far it got instead.

mod cache;
mod config;
mod indexer;
mod pipeline;
mod reconciler;

pub use cache::{CacheError, FnProfileCache, InMemoryProfileCache, ProfileCache, cache_fn};
pub use config::{ConfigError, ReconcileConfig};
pub use indexer::{EventIndexer, IndexError, ProfileUpdate, StateResolver};
pub use pipeline::{Tracked, TrackingPipeline};
pub use reconciler::{
    MergeStep, ProfileReconciler, Reconciliation, ReconciliationOutcome, ReconcileError,
    merge_cache_and_profile,
};
