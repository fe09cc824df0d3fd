//! Event indexer - applies event-type defaults to events and copies event
//! fields into profiles.

use crate::config::ReconcileConfig;
use cdp_schema::{
    EventTypeCatalogue, MergeSchema, ProjectionError, SchemaProjector, StateSpec, reindex,
};
use cdp_types::{Event, Profile, Tags};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Errors from indexing an event or copying it into a profile.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("document conversion failed: {0}")]
    Types(#[from] cdp_types::Error),

    #[error("no state resolver registered as {0:?}")]
    UnknownStateResolver(String),
}

/// Computes the journey state for event types declared with `call:<name>`.
pub trait StateResolver: Send + Sync {
    /// Returns the journey state `event` puts the customer in.
    fn resolve(&self, event: &Event, profile: Option<&Profile>) -> Option<String>;
}

impl<F> StateResolver for F
where
    F: Fn(&Event, Option<&Profile>) -> Option<String> + Send + Sync,
{
    fn resolve(&self, event: &Event, profile: Option<&Profile>) -> Option<String> {
        self(event, profile)
    }
}

/// A profile after event fields were copied into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub profile: Profile,
    /// True if at least one schema entry found its source in the event.
    pub updated: bool,
    /// Entries that could not be applied.
    pub errors: Vec<ProjectionError>,
}

/// Applies catalogue definitions to events.
pub struct EventIndexer {
    catalogue: EventTypeCatalogue,
    resolvers: HashMap<String, Arc<dyn StateResolver>>,
    projector: SchemaProjector,
}

impl EventIndexer {
    #[must_use]
    pub fn new(catalogue: EventTypeCatalogue) -> Self {
        Self::with_config(catalogue, &ReconcileConfig::default())
    }

    #[must_use]
    pub fn with_config(catalogue: EventTypeCatalogue, config: &ReconcileConfig) -> Self {
        Self {
            catalogue,
            resolvers: HashMap::new(),
            projector: SchemaProjector::new(config.projection_options()),
        }
    }

    /// Registers the resolver that `call:<name>` states invoke. Replaces any
    /// resolver registered under the same name.
    pub fn register_resolver<R: StateResolver + 'static>(&mut self, name: impl Into<String>, resolver: R) {
        self.resolvers.insert(name.into(), Arc::new(resolver));
    }

    #[must_use]
    pub fn catalogue(&self) -> &EventTypeCatalogue {
        &self.catalogue
    }

    /// Relocates fields, resolves the journey state and applies default tags.
    ///
    /// Only event types whose definition carries a `copy` table are indexed;
    /// every other event is returned as given.
    pub fn auto_index(&self, event: Event, profile: Option<&Profile>) -> Result<Event, IndexError> {
        let Some(index_schema) = self.catalogue.index_schema(&event.event_type) else {
            return Ok(event);
        };

        let relocated = reindex(index_schema, &event.to_document()?);
        let mut event = Event::from_document(relocated)?;

        match self.catalogue.state(&event.event_type) {
            Some(StateSpec::Literal(state)) if !state.is_empty() => {
                event.journey.state = Some(state.clone());
            }
            Some(StateSpec::Call(name)) => {
                let resolver = self
                    .resolvers
                    .get(name)
                    .ok_or_else(|| IndexError::UnknownStateResolver(name.clone()))?;
                event.journey.state = resolver.resolve(&event, profile);
            }
            _ => {}
        }

        if let Some(tags) = self.catalogue.tags(&event.event_type).filter(|t| !t.is_empty()) {
            event.tags = Tags::new(tags.to_vec());
        }

        debug!("Indexed event {} (type={})", event.id, event.event_type);
        Ok(event)
    }

    /// Copies event fields into `profile` using the event type's merge schema.
    ///
    /// Entries are applied one at a time. An entry whose result no longer
    /// reads back as a [`Profile`] (a number appended to `segments`, a null
    /// visit count) is rolled back and reported as
    /// [`ProjectionError::Rejected`]; the other entries still apply.
    pub fn copy_to_profile(&self, event: &Event, profile: Profile) -> Result<ProfileUpdate, IndexError> {
        let Some(schema) = self.catalogue.merge_schema(&event.event_type) else {
            return Ok(ProfileUpdate {
                profile,
                updated: false,
                errors: Vec::new(),
            });
        };

        let source = event.to_document()?;
        let mut document = profile.to_document()?;
        let mut profile = profile;
        let mut updated = false;
        let mut errors = Vec::new();

        for rule in schema {
            let entry = MergeSchema::new().with(rule.destination.clone(), rule.source.clone(), rule.operation);
            let projection = self.projector.project(&entry, &source, document.clone());
            updated |= projection.updated;
            if !projection.is_clean() {
                errors.extend(projection.errors);
                continue;
            }
            if !projection.updated {
                continue;
            }

            match Profile::from_document(projection.document.clone()) {
                Ok(projected) => {
                    profile = projected;
                    document = projection.document;
                }
                Err(e) => {
                    warn!("Rolling back schema entry profile@{}: {}", rule.destination, e);
                    errors.push(ProjectionError::Rejected {
                        destination: rule.destination.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            "Copied event {} into profile {} (updated={}, errors={})",
            event.id,
            profile.id,
            updated,
            errors.len()
        );
        Ok(ProfileUpdate {
            profile,
            updated,
            errors,
        })
    }
}
