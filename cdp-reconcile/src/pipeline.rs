use crate::cache::ProfileCache;
use crate::config::ReconcileConfig;
use crate::indexer::{EventIndexer, IndexError};
use crate::reconciler::{ProfileReconciler, ReconciliationOutcome};
use cdp_schema::{EventTypeCatalogue, ProjectionError};
use cdp_types::{Event, Profile};

/// The result of tracking one event.
#[derive(Debug)]
pub struct Tracked {
    pub event: Event,
    pub profile: Profile,
    /// True if the event changed at least one profile field.
    pub profile_updated: bool,
    pub projection_errors: Vec<ProjectionError>,
    pub reconciliation: ReconciliationOutcome,
}

/// Runs reconciliation, indexing and projection for tracked events.
pub struct TrackingPipeline<C> {
    indexer: EventIndexer,
    reconciler: ProfileReconciler<C>,
}

impl<C: ProfileCache> TrackingPipeline<C> {
    #[must_use]
    pub fn new(catalogue: EventTypeCatalogue, cache: C, config: ReconcileConfig) -> Self {
        Self {
            indexer: EventIndexer::with_config(catalogue, &config),
            reconciler: ProfileReconciler::with_config(cache, config),
        }
    }

    #[must_use]
    pub fn indexer(&self) -> &EventIndexer {
        &self.indexer
    }

    pub fn indexer_mut(&mut self) -> &mut EventIndexer {
        &mut self.indexer
    }

    #[must_use]
    pub fn reconciler(&self) -> &ProfileReconciler<C> {
        &self.reconciler
    }

    /// Tracks `event` against `profile`.
    ///
    /// Without a profile a fresh empty one is created and the event is
    /// attached to it. The event is indexed and copied into the profile,
    /// then the result is reconciled with the cached version, so cached
    /// bookkeeping always survives whatever the event wrote.
    pub fn process(&self, mut event: Event, profile: Option<Profile>) -> Result<Tracked, IndexError> {
        let profile = profile.unwrap_or_else(Profile::new_empty);
        if event.profile.is_none() {
            event.profile = Some(profile.id.clone());
        }

        let event = self.indexer.auto_index(event, Some(&profile))?;
        let update = self.indexer.copy_to_profile(&event, profile)?;
        let reconciliation = self.reconciler.reconcile(update.profile);

        Ok(Tracked {
            event,
            profile: reconciliation.profile,
            profile_updated: update.updated,
            projection_errors: update.errors,
            reconciliation: reconciliation.outcome,
        })
    }
}
