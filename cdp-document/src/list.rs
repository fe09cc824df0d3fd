//! Ordered list merge.

use crate::Document;

/// How two sequences are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPolicy {
    /// Drop repeated elements, keeping the first occurrence.
    pub unique: bool,
    /// Collapse a one-element result to the bare element.
    pub disallow_single_value: bool,
}

/// Concatenates `base` and `incoming`, optionally removing duplicates.
///
/// With `unique`, the result keeps the first occurrence of every element in
/// `base`-then-`incoming` order. Duplicates already inside `base` are dropped
/// too. Equality is the element type's `PartialEq`, which for documents is
/// deep structural equality.
#[must_use]
pub fn merge_lists<T: PartialEq + Clone>(base: &[T], incoming: &[T], unique: bool) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(base.len() + incoming.len());
    for item in base.iter().chain(incoming) {
        if unique && merged.contains(item) {
            continue;
        }
        merged.push(item.clone());
    }
    merged
}

/// Merges two document sequences under `policy`.
///
/// Returns a sequence, unless `disallow_single_value` is set and exactly one
/// element remains, in which case that element is returned on its own.
#[must_use]
pub fn merge_sequences(base: &[Document], incoming: &[Document], policy: ListPolicy) -> Document {
    let mut merged = merge_lists(base, incoming, policy.unique);
    if policy.disallow_single_value && merged.len() == 1 {
        if let Some(single) = merged.pop() {
            return single;
        }
    }
    Document::Array(merged)
}
