//! The profile aggregate.

use crate::{Document, Mapping, ProfileId, ProfileTime, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer profile.
///
/// The free-form groups (`data`, `traits`, `aux`, `consents`, `interests`
/// and `metadata.aux`) start empty and are filled by projecting events into
/// the profile and by reconciling with the cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(default)]
    pub metadata: ProfileMetadata,
    #[serde(default)]
    pub data: Mapping,
    #[serde(default)]
    pub traits: Mapping,
    #[serde(default)]
    pub aux: Mapping,
    #[serde(default)]
    pub consents: Mapping,
    #[serde(default)]
    pub interests: Mapping,
    /// Segment identifiers, in the order they were first assigned.
    #[serde(default)]
    pub segments: Vec<String>,
}

/// Profile metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default)]
    pub time: ProfileTime,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub aux: Mapping,
}

impl Profile {
    /// Creates a profile with the given id and every group empty.
    #[must_use]
    pub fn new(id: ProfileId) -> Self {
        Self {
            id,
            metadata: ProfileMetadata::default(),
            data: Mapping::new(),
            traits: Mapping::new(),
            aux: Mapping::new(),
            consents: Mapping::new(),
            interests: Mapping::new(),
            segments: Vec::new(),
        }
    }

    /// Creates a fresh profile with a random id, stamped as inserted now and
    /// counting its first visit.
    #[must_use]
    pub fn new_empty() -> Self {
        let mut profile = Self::new(ProfileId::new());
        profile.metadata.time = ProfileTime::first_visit(Utc::now());
        profile
    }

    /// Returns a free-form group.
    #[must_use]
    pub fn group(&self, group: ProfileGroup) -> &Mapping {
        match group {
            ProfileGroup::Data => &self.data,
            ProfileGroup::Traits => &self.traits,
            ProfileGroup::MetadataAux => &self.metadata.aux,
            ProfileGroup::Aux => &self.aux,
            ProfileGroup::Consents => &self.consents,
            ProfileGroup::Interests => &self.interests,
        }
    }

    /// Returns a free-form group for modification.
    pub fn group_mut(&mut self, group: ProfileGroup) -> &mut Mapping {
        match group {
            ProfileGroup::Data => &mut self.data,
            ProfileGroup::Traits => &mut self.traits,
            ProfileGroup::MetadataAux => &mut self.metadata.aux,
            ProfileGroup::Aux => &mut self.aux,
            ProfileGroup::Consents => &mut self.consents,
            ProfileGroup::Interests => &mut self.interests,
        }
    }

    /// Serializes the whole profile into a document.
    pub fn to_document(&self) -> Result<Document> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuilds a profile from a document.
    pub fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(doc)?)
    }
}

/// The free-form mapping groups of a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileGroup {
    Data,
    Traits,
    MetadataAux,
    Aux,
    Consents,
    Interests,
}

impl ProfileGroup {
    /// Every group, in reconciliation order.
    pub const ALL: [ProfileGroup; 6] = [
        ProfileGroup::Data,
        ProfileGroup::Traits,
        ProfileGroup::MetadataAux,
        ProfileGroup::Aux,
        ProfileGroup::Consents,
        ProfileGroup::Interests,
    ];

    /// Dotted location of the group inside a profile document.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            ProfileGroup::Data => "data",
            ProfileGroup::Traits => "traits",
            ProfileGroup::MetadataAux => "metadata.aux",
            ProfileGroup::Aux => "aux",
            ProfileGroup::Consents => "consents",
            ProfileGroup::Interests => "interests",
        }
    }
}

impl fmt::Display for ProfileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
