//! Applies schema tables to documents.
//!
//! Projection works on flat views of both documents: each merge rule reads
//! its source path from the event and writes its destination path in the
//! profile. A rule whose source path is absent is skipped without touching
//! the destination. A rule that fails is reported and the remaining rules
//! still run.

use crate::{IndexSchema, MergeRule, MergeSchema, Operation};
use cdp_document::{
    Document, DocumentError, FlatPath, FlatPathView, merge_lists, prune_empty_mappings,
};
use tracing::{debug, warn};

/// Flags for [`SchemaProjector`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Skip appending a value the destination sequence already holds.
    pub unique_append: bool,
}

/// The outcome of applying a merge schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The destination after every applicable rule ran.
    pub document: Document,
    /// True if at least one rule found its source value.
    pub updated: bool,
    /// Rules that could not be applied, in table order.
    pub errors: Vec<ProjectionError>,
}

impl Projection {
    /// True if no rule failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A single rule that could not be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// Append found a mapping at the destination. Mappings have no append
    /// semantics, unlike scalars, which are promoted to a sequence.
    #[error("cannot append {value} from event@{source_path} to the mapping at profile@{destination}")]
    AppendTargetConflict {
        destination: String,
        source_path: String,
        value: Document,
    },

    #[error("cannot write profile@{destination}: {error}")]
    Path {
        destination: String,
        #[source]
        error: DocumentError,
    },

    /// The written value does not fit the typed record behind the
    /// destination document. The entry was rolled back.
    #[error("profile@{destination} rejected the value: {reason}")]
    Rejected { destination: String, reason: String },
}

/// Applies merge schemas with fixed options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaProjector {
    options: ProjectionOptions,
}

impl SchemaProjector {
    #[must_use]
    pub const fn new(options: ProjectionOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> ProjectionOptions {
        self.options
    }

    /// Copies values from `source` into `destination` as `schema` directs.
    #[must_use]
    pub fn project(&self, schema: &MergeSchema, source: &Document, destination: Document) -> Projection {
        let source = FlatPathView::flatten(source);
        let mut target = FlatPathView::flatten(&destination);
        let mut updated = false;
        let mut errors = Vec::new();

        for rule in schema {
            let Some(value) = source.get(&rule.source) else {
                continue;
            };
            updated = true;

            if let Err(e) = self.apply(&mut target, rule, value) {
                warn!("Skipping schema entry profile@{}: {}", rule.destination, e);
                errors.push(e);
            }
        }

        debug!(
            "Projected {} schema entries (updated={}, failed={})",
            schema.len(),
            updated,
            errors.len()
        );
        Projection {
            document: target.into_document(),
            updated,
            errors,
        }
    }

    fn apply(
        &self,
        target: &mut FlatPathView,
        rule: &MergeRule,
        value: Document,
    ) -> Result<(), ProjectionError> {
        match rule.operation {
            Operation::Overwrite => write(target, &rule.destination, value),
            Operation::Append => self.append(target, rule, value),
            Operation::SetIfAbsent => {
                if target.contains(&rule.destination) {
                    return Ok(());
                }
                write(target, &rule.destination, value)
            }
            Operation::Delete => {
                if !target.contains(&rule.destination) {
                    return Ok(());
                }
                write(target, &rule.destination, Document::Null)
            }
        }
    }

    fn append(
        &self,
        target: &mut FlatPathView,
        rule: &MergeRule,
        value: Document,
    ) -> Result<(), ProjectionError> {
        let unique = self.options.unique_append;
        let items = match target.get(&rule.destination) {
            None => vec![value],
            Some(Document::Array(existing)) => merge_lists(&existing, &[value], unique),
            Some(Document::Object(_)) => {
                return Err(ProjectionError::AppendTargetConflict {
                    destination: rule.destination.to_string(),
                    source_path: rule.source.to_string(),
                    value,
                });
            }
            Some(scalar) => merge_lists(&[scalar], &[value], unique),
        };
        write(target, &rule.destination, Document::Array(items))
    }
}

fn write(target: &mut FlatPathView, destination: &FlatPath, value: Document) -> Result<(), ProjectionError> {
    target
        .set(destination, value)
        .map_err(|error| ProjectionError::Path {
            destination: destination.to_string(),
            error,
        })
}

/// Applies `schema` with default options (plain append).
#[must_use]
pub fn project(schema: &MergeSchema, source: &Document, destination: Document) -> Projection {
    SchemaProjector::default().project(schema, source, destination)
}

/// Moves fields as `schema` directs, then prunes mappings left empty.
///
/// For each entry whose source path is present, the value is written to the
/// destination path and the source path is removed. An entry whose
/// destination cannot be written is skipped and its source left in place.
#[must_use]
pub fn reindex(schema: &IndexSchema, doc: &Document) -> Document {
    let mut view = FlatPathView::flatten(doc);

    for rule in schema {
        let Some(value) = view.get(&rule.source) else {
            continue;
        };
        if let Err(e) = view.set(&rule.destination, value) {
            warn!("Skipping index entry {} <- {}: {}", rule.destination, rule.source, e);
            continue;
        }
        view.delete(&rule.source);
    }

    let mut relocated = view.into_document();
    prune_empty_mappings(&mut relocated);
    relocated
}
