//! Tracked events.
//!
//! An event carries the raw payload sent by a tracker. Before it is copied
//! into a profile, its fields may be relocated, its journey state resolved
//! and its tags replaced with the defaults of its event type.

use crate::{Document, EventId, Mapping, ProfileId, Result};
use serde::{Deserialize, Serialize};

/// A tracked event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    /// Event type id, e.g. `"page-view"`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// The profile the event belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileId>,

    #[serde(default)]
    pub properties: Mapping,

    #[serde(default)]
    pub traits: Mapping,

    #[serde(default)]
    pub context: Mapping,

    #[serde(default)]
    pub tags: Tags,

    #[serde(default)]
    pub journey: Journey,
}

impl Event {
    /// Creates an event of the given type with a random id and an empty payload.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            profile: None,
            properties: Mapping::new(),
            traits: Mapping::new(),
            context: Mapping::new(),
            tags: Tags::default(),
            journey: Journey::default(),
        }
    }

    /// Attaches the event to a profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ProfileId) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Replaces the event properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Mapping) -> Self {
        self.properties = properties;
        self
    }

    /// Serializes the whole event into a document.
    pub fn to_document(&self) -> Result<Document> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuilds an event from a document.
    pub fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(doc)?)
    }
}

/// Event tags with a cached count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub count: usize,
}

impl Tags {
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        let count = values.len();
        Self { values, count }
    }
}

/// Customer-journey position of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    #[serde(default)]
    pub state: Option<String>,
}
