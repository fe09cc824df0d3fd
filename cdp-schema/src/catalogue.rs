//! Catalogue of predefined event types.
//!
//! Each definition may carry:
//! - `copy`: an [`IndexSchema`] relocating fields inside the event
//! - `profile`: a [`MergeSchema`] copying event fields into the profile
//! - `state`: the journey state the event puts a customer in, either a
//!   literal or `call:<name>` naming a registered resolver
//! - `tags`: default tags attached to every event of the type
//!
//! The catalogue is built from already-parsed JSON; where that JSON comes
//! from is the caller's concern.

use crate::{IndexSchema, MergeSchema, SchemaError};
use cdp_document::{Document, shape_of};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

const CALL_PREFIX: &str = "call:";

/// Journey state declared by an event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StateSpec {
    /// A fixed state name.
    Literal(String),
    /// The name of a resolver that computes the state.
    Call(String),
}

impl From<String> for StateSpec {
    fn from(s: String) -> Self {
        match s.strip_prefix(CALL_PREFIX) {
            Some(name) => Self::Call(name.to_string()),
            None => Self::Literal(s),
        }
    }
}

impl From<StateSpec> for String {
    fn from(spec: StateSpec) -> Self {
        match spec {
            StateSpec::Literal(state) => state,
            StateSpec::Call(name) => format!("{CALL_PREFIX}{name}"),
        }
    }
}

/// One predefined event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTypeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<IndexSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<MergeSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// An `(id, name)` pair in an event type listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeEntry {
    pub id: String,
    pub name: String,
}

/// A sorted event type listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeList {
    pub total: usize,
    pub result: Vec<EventTypeEntry>,
}

/// Predefined event types, keyed by id, in load order.
#[derive(Debug, Clone, Default)]
pub struct EventTypeCatalogue {
    definitions: Vec<EventTypeDefinition>,
    by_id: HashMap<String, usize>,
}

impl EventTypeCatalogue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalogue from a JSON sequence of definitions.
    ///
    /// Every schema is validated here; a bad operation name or malformed
    /// entry rejects the whole catalogue.
    pub fn from_definitions(value: &Document) -> Result<Self, SchemaError> {
        let mut catalogue = Self::new();
        catalogue.load(value)?;
        Ok(catalogue)
    }

    /// Adds definitions from a JSON sequence. Returns how many were loaded.
    pub fn load(&mut self, value: &Document) -> Result<usize, SchemaError> {
        let items = value
            .as_array()
            .ok_or_else(|| SchemaError::NotASequence(shape_of(value)))?;

        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let definition = EventTypeDefinition::deserialize(item).map_err(|e| {
                SchemaError::InvalidDefinition {
                    index,
                    reason: e.to_string(),
                }
            })?;
            parsed.push(definition);
        }

        let count = parsed.len();
        for definition in parsed {
            self.insert(definition);
        }
        info!("Loaded {} event type definitions", count);
        Ok(count)
    }

    /// Adds a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, definition: EventTypeDefinition) {
        match self.by_id.get(&definition.id) {
            Some(&idx) => self.definitions[idx] = definition,
            None => {
                self.by_id
                    .insert(definition.id.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    #[must_use]
    pub fn get(&self, event_type: &str) -> Option<&EventTypeDefinition> {
        self.by_id.get(event_type).map(|&idx| &self.definitions[idx])
    }

    #[must_use]
    pub fn contains(&self, event_type: &str) -> bool {
        self.by_id.contains_key(event_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The field relocation table for an event type.
    #[must_use]
    pub fn index_schema(&self, event_type: &str) -> Option<&IndexSchema> {
        self.get(event_type)?.copy.as_ref()
    }

    /// The event-to-profile copy table for an event type.
    #[must_use]
    pub fn merge_schema(&self, event_type: &str) -> Option<&MergeSchema> {
        self.get(event_type)?.profile.as_ref()
    }

    #[must_use]
    pub fn state(&self, event_type: &str) -> Option<&StateSpec> {
        self.get(event_type)?.state.as_ref()
    }

    #[must_use]
    pub fn tags(&self, event_type: &str) -> Option<&[String]> {
        self.get(event_type)?.tags.as_deref()
    }

    /// `(id, name)` of every predefined type, in load order.
    pub fn event_type_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions
            .iter()
            .map(|d| (d.id.as_str(), d.name.as_str()))
    }

    /// Lists predefined types together with `observed` type ids (for
    /// example, distinct types already stored). Observed ids without a
    /// definition are named with [`capitalize_event_type_id`]. The listing
    /// is sorted by id.
    pub fn event_types<I, S>(&self, observed: I) -> EventTypeList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<EventTypeEntry> = self
            .event_type_names()
            .map(|(id, name)| EventTypeEntry {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();

        for id in observed {
            let id = id.as_ref();
            if entries.iter().any(|e| e.id == id) {
                continue;
            }
            entries.push(EventTypeEntry {
                id: id.to_string(),
                name: capitalize_event_type_id(id),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));
        EventTypeList {
            total: entries.len(),
            result: entries,
        }
    }
}

/// Human-readable name for an event type id: `"page-view"` → `"Page view"`.
#[must_use]
pub fn capitalize_event_type_id(event_type: &str) -> String {
    let spaced = event_type.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
