//! Recursive document merge.
//!
//! For every key found in either side:
//! - only in `base`: kept
//! - only in `incoming`: taken
//! - mappings on both sides: merged recursively
//! - sequences on both sides: merged with [`merge_sequences`]
//! - anything else: `incoming` wins
//!
//! Keys keep `base` order, followed by keys that only `incoming` has.

use crate::{Document, DocumentError, FlatPath, ListPolicy, Mapping, Result, merge_sequences};
use serde::{Deserialize, Serialize};

/// Deepest mapping nesting a merge will descend into.
pub const MAX_MERGE_DEPTH: usize = 128;

/// Flags controlling list handling inside a deep merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Deduplicate merged lists, keeping first occurrences.
    pub unique_lists: bool,
    /// Collapse merged lists of exactly one element to the bare element.
    pub disallow_single_value_list: bool,
}

impl MergeOptions {
    #[must_use]
    pub const fn new(unique_lists: bool, disallow_single_value_list: bool) -> Self {
        Self {
            unique_lists,
            disallow_single_value_list,
        }
    }

    #[must_use]
    pub const fn list_policy(&self) -> ListPolicy {
        ListPolicy {
            unique: self.unique_lists,
            disallow_single_value: self.disallow_single_value_list,
        }
    }
}

/// Merges `incoming` over `base`. Neither input is modified.
///
/// Shape mismatches never fail: every pair of values has a merge result.
/// The only error is [`DocumentError::DepthLimitExceeded`], raised when both
/// sides nest mappings along the same keys deeper than [`MAX_MERGE_DEPTH`].
pub fn deep_merge(base: &Document, incoming: &Document, opts: MergeOptions) -> Result<Document> {
    merge_values(base, incoming, opts, &mut Vec::new())
}

/// Merges two mappings key by key. See [`deep_merge`]; the depth limit is
/// likewise the only way this can fail.
pub fn merge_mappings(base: &Mapping, incoming: &Mapping, opts: MergeOptions) -> Result<Mapping> {
    merge_maps(base, incoming, opts, &mut Vec::new())
}

fn merge_values(
    base: &Document,
    incoming: &Document,
    opts: MergeOptions,
    path: &mut Vec<String>,
) -> Result<Document> {
    match (base, incoming) {
        (Document::Object(b), Document::Object(i)) => {
            Ok(Document::Object(merge_maps(b, i, opts, path)?))
        }
        (Document::Array(b), Document::Array(i)) => Ok(merge_sequences(b, i, opts.list_policy())),
        (_, incoming) => Ok(incoming.clone()),
    }
}

fn merge_maps(
    base: &Mapping,
    incoming: &Mapping,
    opts: MergeOptions,
    path: &mut Vec<String>,
) -> Result<Mapping> {
    if path.len() >= MAX_MERGE_DEPTH {
        return Err(DocumentError::DepthLimitExceeded {
            path: FlatPath::from_segments(path.iter().cloned()).to_string(),
            limit: MAX_MERGE_DEPTH,
        });
    }

    let mut merged = Mapping::with_capacity(base.len() + incoming.len());
    for (key, base_value) in base {
        let value = match incoming.get(key) {
            None => base_value.clone(),
            Some(incoming_value) => {
                path.push(key.clone());
                let merged_value = merge_values(base_value, incoming_value, opts, path);
                path.pop();
                merged_value?
            }
        };
        merged.insert(key.clone(), value);
    }
    for (key, incoming_value) in incoming {
        if !base.contains_key(key) {
            merged.insert(key.clone(), incoming_value.clone());
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize, leaf: Document) -> Document {
        (0..depth).fold(leaf, |inner, _| json!({ "n": inner }))
    }

    #[test]
    fn key_order_is_base_then_new() {
        let merged = deep_merge(
            &json!({"b": 1, "a": 2}),
            &json!({"c": 3, "a": 4}),
            MergeOptions::default(),
        )
        .unwrap();
        let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(merged, json!({"b": 1, "a": 4, "c": 3}));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let base = nested(MAX_MERGE_DEPTH + 2, json!(1));
        let incoming = nested(MAX_MERGE_DEPTH + 2, json!(2));
        let err = deep_merge(&base, &incoming, MergeOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentError::DepthLimitExceeded { limit, .. } if limit == MAX_MERGE_DEPTH));
    }

    #[test]
    fn depth_within_limit_merges() {
        let base = nested(MAX_MERGE_DEPTH - 1, json!(1));
        let incoming = nested(MAX_MERGE_DEPTH - 1, json!(2));
        let merged = deep_merge(&base, &incoming, MergeOptions::default()).unwrap();
        assert_eq!(merged, incoming);
    }

    #[test]
    fn one_sided_deep_trees_are_not_walked() {
        let base = nested(MAX_MERGE_DEPTH * 2, json!(1));
        let merged = deep_merge(&base, &json!({}), MergeOptions::default()).unwrap();
        assert_eq!(merged, base);
    }

    #[test]
    fn shape_mismatch_below_deep_trees_never_fails() {
        let base = nested(MAX_MERGE_DEPTH * 2, json!(1));
        let incoming = nested(4, json!([1, 2]));
        let merged = deep_merge(&base, &incoming, MergeOptions::default()).unwrap();
        assert_eq!(merged, incoming);
    }
}
