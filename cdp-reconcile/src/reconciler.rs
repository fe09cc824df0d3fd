//! Profile reconciler - merges a freshly computed profile with its cached copy.
//!
//! The free-form groups are deep-merged with the cached values as the base.
//! Visit bookkeeping and status are taken from the cache as-is, and segments
//! are concatenated. Failures never propagate: the caller always gets a
//! profile back together with a [`ReconciliationOutcome`] saying how much of
//! the merge was applied.

use crate::cache::{CacheError, ProfileCache};
use crate::config::ReconcileConfig;
use cdp_document::{DocumentError, merge_lists, merge_mappings};
use cdp_types::{Profile, ProfileGroup};
use std::fmt;
use tracing::{debug, warn};

/// One step of a reconciliation, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    /// Deep merge of one free-form group.
    Group(ProfileGroup),
    /// `metadata.time` and `metadata.status` taken from the cache.
    Bookkeeping,
    /// Segment list concatenation.
    Segments,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => write!(f, "group {group}"),
            Self::Bookkeeping => f.write_str("bookkeeping"),
            Self::Segments => f.write_str("segments"),
        }
    }
}

/// Why a reconciliation stopped short.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("cache lookup failed: {0}")]
    Cache(#[from] CacheError),

    #[error("merging {step} failed: {error}")]
    Merge {
        step: MergeStep,
        #[source]
        error: DocumentError,
    },
}

/// How far a reconciliation got.
#[derive(Debug)]
pub enum ReconciliationOutcome {
    /// No cached profile; the profile was returned untouched.
    NoPriorState,
    /// Every step was applied.
    FullyMerged,
    /// A step failed. The profile keeps the effect of `applied_groups`.
    PartiallyMerged {
        applied_groups: Vec<MergeStep>,
        cause: ReconcileError,
    },
    /// The cache could not be read; the profile was returned untouched.
    Failed { cause: ReconcileError },
}

impl ReconciliationOutcome {
    /// True unless the reconciliation stopped on an error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::NoPriorState | Self::FullyMerged)
    }

    /// The error that stopped the reconciliation, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&ReconcileError> {
        match self {
            Self::PartiallyMerged { cause, .. } | Self::Failed { cause } => Some(cause),
            Self::NoPriorState | Self::FullyMerged => None,
        }
    }
}

/// A profile together with the outcome of reconciling it.
#[derive(Debug)]
pub struct Reconciliation {
    pub profile: Profile,
    pub outcome: ReconciliationOutcome,
}

/// Merges profiles with their cached versions.
pub struct ProfileReconciler<C> {
    cache: C,
    config: ReconcileConfig,
}

impl<C: ProfileCache> ProfileReconciler<C> {
    /// Creates a reconciler with default merge settings.
    #[must_use]
    pub fn new(cache: C) -> Self {
        Self::with_config(cache, ReconcileConfig::default())
    }

    #[must_use]
    pub fn with_config(cache: C, config: ReconcileConfig) -> Self {
        Self { cache, config }
    }

    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Merges `profile` with the cached version of the same id.
    pub fn reconcile(&self, profile: Profile) -> Reconciliation {
        let cached = match self.cache.load(&profile.id) {
            Ok(Some(cached)) => cached,
            Ok(None) => {
                debug!("No cached profile for {}, nothing to merge", profile.id);
                return Reconciliation {
                    profile,
                    outcome: ReconciliationOutcome::NoPriorState,
                };
            }
            Err(e) => {
                warn!("Profile cache lookup for {} failed: {}", profile.id, e);
                return Reconciliation {
                    profile,
                    outcome: ReconciliationOutcome::Failed { cause: e.into() },
                };
            }
        };

        let mut profile = profile;
        let mut applied = Vec::new();
        match self.merge_steps(&cached, &mut profile, &mut applied) {
            Ok(()) => {
                debug!("Merged profile {} with its cached version", profile.id);
                Reconciliation {
                    profile,
                    outcome: ReconciliationOutcome::FullyMerged,
                }
            }
            Err(cause) => {
                warn!(
                    "Partial merge of profile {} after {} step(s): {}",
                    profile.id,
                    applied.len(),
                    cause
                );
                Reconciliation {
                    profile,
                    outcome: ReconciliationOutcome::PartiallyMerged {
                        applied_groups: applied,
                        cause,
                    },
                }
            }
        }
    }

    fn merge_steps(
        &self,
        cached: &Profile,
        profile: &mut Profile,
        applied: &mut Vec<MergeStep>,
    ) -> Result<(), ReconcileError> {
        let opts = self.config.merge_options();

        for group in ProfileGroup::ALL {
            let step = MergeStep::Group(group);
            let merged = merge_mappings(cached.group(group), profile.group(group), opts)
                .map_err(|error| ReconcileError::Merge { step, error })?;
            *profile.group_mut(group) = merged;
            applied.push(step);
        }

        profile.metadata.time = cached.metadata.time.clone();
        profile.metadata.status = cached.metadata.status.clone();
        applied.push(MergeStep::Bookkeeping);

        profile.segments = merge_lists(
            &cached.segments,
            &profile.segments,
            self.config.unique_segments,
        );
        applied.push(MergeStep::Segments);

        Ok(())
    }
}

/// Merges `profile` with its cached version using default settings and
/// returns the result, whatever the outcome.
#[must_use]
pub fn merge_cache_and_profile<C: ProfileCache>(profile: Profile, cache: &C) -> Profile {
    ProfileReconciler::new(cache).reconcile(profile).profile
}
