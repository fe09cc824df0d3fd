//! Merge and index schema tables.
//!
//! Both tables are ordered by destination path. Adding an entry for a
//! destination that is already present replaces that entry in place, so the
//! table behaves like the JSON mapping it is loaded from.

use crate::{Operation, SchemaError};
use cdp_document::{Document, FlatPath, Mapping, shape_of};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One merge schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    pub destination: FlatPath,
    pub source: FlatPath,
    pub operation: Operation,
}

/// Ordered table: destination path → (source path, operation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSchema {
    rules: Vec<MergeRule>,
}

impl MergeSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MergeSchema::insert`].
    #[must_use]
    pub fn with(
        mut self,
        destination: impl Into<FlatPath>,
        source: impl Into<FlatPath>,
        operation: Operation,
    ) -> Self {
        self.insert(destination, source, operation);
        self
    }

    /// Adds or replaces the entry for `destination`.
    pub fn insert(
        &mut self,
        destination: impl Into<FlatPath>,
        source: impl Into<FlatPath>,
        operation: Operation,
    ) {
        let rule = MergeRule {
            destination: destination.into(),
            source: source.into(),
            operation,
        };
        match self.rules.iter_mut().find(|r| r.destination == rule.destination) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Loads a schema from its JSON form.
    ///
    /// Each destination maps to either a bare source path (overwrite), or a
    /// `[source]` / `[source, operation]` pair.
    pub fn from_value(value: &Document) -> Result<Self, SchemaError> {
        let table = as_mapping(value)?;
        let mut schema = Self::new();
        for (destination, entry) in table {
            let (source, operation) = parse_merge_entry(destination, entry)?;
            schema.insert(destination.as_str(), source, operation);
        }
        Ok(schema)
    }
}

fn parse_merge_entry(destination: &str, entry: &Document) -> Result<(String, Operation), SchemaError> {
    let malformed = |reason: &str| SchemaError::MalformedEntry {
        destination: destination.to_string(),
        reason: reason.to_string(),
    };

    match entry {
        Document::String(source) => Ok((source.clone(), Operation::Overwrite)),
        Document::Array(parts) => match parts.as_slice() {
            [Document::String(source)] => Ok((source.clone(), Operation::Overwrite)),
            [Document::String(source), Document::String(op)] => {
                Ok((source.clone(), Operation::parse(op)?))
            }
            _ => Err(malformed("expected [source] or [source, operation]")),
        },
        other => Err(malformed(&format!(
            "expected a source path or pair, found a {}",
            shape_of(other)
        ))),
    }
}

impl<'a> IntoIterator for &'a MergeSchema {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Serialize for MergeSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(
                &rule.destination,
                &(&rule.source, rule.operation),
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MergeSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Document::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

/// One index schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRule {
    pub destination: FlatPath,
    pub source: FlatPath,
}

/// Ordered table: destination path → source path. Used to move fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSchema {
    rules: Vec<IndexRule>,
}

impl IndexSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, destination: impl Into<FlatPath>, source: impl Into<FlatPath>) -> Self {
        self.insert(destination, source);
        self
    }

    /// Adds or replaces the entry for `destination`.
    pub fn insert(&mut self, destination: impl Into<FlatPath>, source: impl Into<FlatPath>) {
        let rule = IndexRule {
            destination: destination.into(),
            source: source.into(),
        };
        match self.rules.iter_mut().find(|r| r.destination == rule.destination) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Loads a schema from a JSON mapping of destination → source path.
    pub fn from_value(value: &Document) -> Result<Self, SchemaError> {
        let table = as_mapping(value)?;
        let mut schema = Self::new();
        for (destination, entry) in table {
            let Document::String(source) = entry else {
                return Err(SchemaError::MalformedEntry {
                    destination: destination.clone(),
                    reason: format!("expected a source path, found a {}", shape_of(entry)),
                });
            };
            schema.insert(destination.as_str(), source.as_str());
        }
        Ok(schema)
    }
}

impl<'a> IntoIterator for &'a IndexSchema {
    type Item = &'a IndexRule;
    type IntoIter = std::slice::Iter<'a, IndexRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Serialize for IndexSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.destination, &rule.source)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IndexSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Document::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

fn as_mapping(value: &Document) -> Result<&Mapping, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::NotAMapping(shape_of(value)))
}
