//! Flat, path-keyed projection of a document.
//!
//! Flattening walks every mapping and records each leaf under its full path.
//! Leaves are scalars, sequences and *empty* mappings; keeping empty mappings
//! as leaves is what makes `unflatten(flatten(d)) == d` hold for every
//! document. Sequences are not indexed into: a list is a single leaf.
//!
//! The view never holds two leaves where one path is an ancestor of the
//! other, so it always describes exactly one nested document.

use crate::{Document, DocumentError, FlatPath, Mapping, Result, shape_of};

/// An ordered mapping from [`FlatPath`] to leaf value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPathView {
    leaves: Vec<(FlatPath, Document)>,
}

impl FlatPathView {
    /// Creates an empty view (unflattens to an empty mapping).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects a document into its flat form.
    #[must_use]
    pub fn flatten(doc: &Document) -> Self {
        let mut view = Self::new();
        push_leaves(doc, FlatPath::root(), &mut view.leaves);
        view
    }

    /// Rebuilds the nested document described by this view.
    #[must_use]
    pub fn unflatten(&self) -> Document {
        build(self.leaves.iter().map(|(p, v)| (p.segments(), v)))
    }

    /// Consumes the view and rebuilds the nested document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.unflatten()
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Iterates over `(path, leaf)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&FlatPath, &Document)> {
        self.leaves.iter().map(|(p, v)| (p, v))
    }

    /// True if `path` addresses a leaf or a non-empty subtree.
    ///
    /// A path holding `null` is present.
    #[must_use]
    pub fn contains(&self, path: &FlatPath) -> bool {
        self.leaves.iter().any(|(p, _)| p.starts_with(path))
    }

    /// Returns the value at `path`, reassembling subtrees when `path` is an
    /// interior mapping. Returns `None` when the path is absent.
    #[must_use]
    pub fn get(&self, path: &FlatPath) -> Option<Document> {
        if let Some((_, leaf)) = self.leaves.iter().find(|(p, _)| p == path) {
            return Some(leaf.clone());
        }

        let mut below = self
            .leaves
            .iter()
            .filter_map(|(p, v)| {
                p.segments()
                    .strip_prefix(path.segments())
                    .map(|rest| (rest, v))
            })
            .peekable();
        below.peek()?;
        Some(build(below))
    }

    /// Writes `value` at `path`, replacing whatever leaf or subtree was there.
    ///
    /// An ancestor that is an empty mapping is absorbed. An ancestor that is
    /// any other non-mapping value is a [`DocumentError::PathConflict`] and
    /// leaves the view untouched.
    pub fn set(&mut self, path: &FlatPath, value: Document) -> Result<()> {
        let mut absorbed = None;
        for (idx, (leaf_path, leaf)) in self.leaves.iter().enumerate() {
            if !leaf_path.is_ancestor_of(path) {
                continue;
            }
            match leaf {
                Document::Object(map) if map.is_empty() => absorbed = Some(idx),
                other => {
                    return Err(DocumentError::PathConflict {
                        path: path.to_string(),
                        blocked_at: leaf_path.to_string(),
                        found: shape_of(other),
                    });
                }
            }
        }

        let mut at = absorbed;
        if let Some(idx) = absorbed {
            self.leaves.remove(idx);
        }
        if let Some(idx) = self.remove_under(path) {
            at = Some(at.map_or(idx, |a| a.min(idx)));
        }

        let mut replacement = Vec::new();
        push_leaves(&value, path.clone(), &mut replacement);
        let at = at.unwrap_or(self.leaves.len());
        self.leaves.splice(at..at, replacement);
        Ok(())
    }

    /// Removes the leaf or subtree at `path`. Returns whether anything was
    /// removed.
    ///
    /// Like deleting a key from a nested mapping, a parent left without
    /// children remains as an empty mapping; use [`prune_empty_mappings`]
    /// on the rebuilt document to drop it.
    pub fn delete(&mut self, path: &FlatPath) -> bool {
        let Some(idx) = self.remove_under(path) else {
            return false;
        };
        if let Some(parent) = path.parent() {
            if !parent.is_root() && !self.contains(&parent) {
                self.leaves
                    .insert(idx, (parent, Document::Object(Mapping::new())));
            }
        }
        true
    }

    /// Drops every leaf at or below `path`, returning the index of the first
    /// one removed.
    fn remove_under(&mut self, path: &FlatPath) -> Option<usize> {
        let first = self.leaves.iter().position(|(p, _)| p.starts_with(path))?;
        self.leaves.retain(|(p, _)| !p.starts_with(path));
        Some(first)
    }
}

impl From<&Document> for FlatPathView {
    fn from(doc: &Document) -> Self {
        Self::flatten(doc)
    }
}

fn push_leaves(value: &Document, path: FlatPath, out: &mut Vec<(FlatPath, Document)>) {
    match value {
        Document::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                push_leaves(child, path.child(key.as_str()), out);
            }
        }
        leaf => out.push((path, leaf.clone())),
    }
}

/// Rebuilds a document from leaves given as relative segment slices.
fn build<'a, I>(leaves: I) -> Document
where
    I: IntoIterator<Item = (&'a [String], &'a Document)>,
{
    let mut root = Document::Object(Mapping::new());
    for (segments, value) in leaves {
        let Some((last, parents)) = segments.split_last() else {
            // Only a root leaf has no segments, and it is the only leaf.
            root = value.clone();
            continue;
        };
        let mut node = &mut root;
        for segment in parents {
            node = ensure_mapping(node)
                .entry(segment.clone())
                .or_insert_with(|| Document::Object(Mapping::new()));
        }
        ensure_mapping(node).insert(last.clone(), value.clone());
    }
    root
}

fn ensure_mapping(node: &mut Document) -> &mut Mapping {
    if !node.is_object() {
        *node = Document::Object(Mapping::new());
    }
    match node {
        Document::Object(map) => map,
        _ => unreachable!("node was just replaced with a mapping"),
    }
}

/// Removes every mapping that is empty, recursively and bottom-up.
///
/// A mapping that only contained empty mappings is itself removed. The root
/// is kept even when it ends up empty. Sequences are left as they are.
pub fn prune_empty_mappings(doc: &mut Document) {
    if let Document::Object(map) = doc {
        prune_mapping(map);
    }
}

fn prune_mapping(map: &mut Mapping) {
    for child in map.values_mut() {
        if let Document::Object(inner) = child {
            prune_mapping(inner);
        }
    }
    map.retain(|_, child| !matches!(child, Document::Object(inner) if inner.is_empty()));
}
