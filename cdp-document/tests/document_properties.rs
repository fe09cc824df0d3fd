//! Property-based tests for the document laws:
//! - Round-trip: unflatten(flatten(d)) == d
//! - Uniqueness: a unique list merge holds each distinct value once, in
//!   first-occurrence order
//! - Identity: merging with an empty mapping changes nothing

use cdp_document::{
    Document, FlatPath, FlatPathView, Mapping, MergeOptions, deep_merge, merge_lists,
};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c.]{0,3}").unwrap()
}

fn scalar_strategy() -> impl Strategy<Value = Document> {
    prop_oneof![
        Just(Document::Null),
        any::<bool>().prop_map(Document::Bool),
        any::<i64>().prop_map(Document::from),
        prop::string::string_regex("[a-z]{0,5}")
            .unwrap()
            .prop_map(Document::String),
    ]
}

fn document_strategy() -> impl Strategy<Value = Document> {
    scalar_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Document::Array),
            prop::collection::vec((key_strategy(), inner), 0..4)
                .prop_map(|entries| Document::Object(entries.into_iter().collect::<Mapping>())),
        ]
    })
}

fn mapping_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec((key_strategy(), document_strategy()), 0..5)
        .prop_map(|entries| Document::Object(entries.into_iter().collect::<Mapping>()))
}

// =============================================================================
// FLAT PATH VIEW
// =============================================================================

proptest! {
    #[test]
    fn flatten_round_trips(doc in document_strategy()) {
        let view = FlatPathView::flatten(&doc);
        prop_assert_eq!(view.unflatten(), doc);
    }

    #[test]
    fn every_leaf_is_contained_and_readable(doc in mapping_strategy()) {
        let view = FlatPathView::flatten(&doc);
        for (path, leaf) in view.iter() {
            prop_assert!(view.contains(path));
            let got = view.get(path);
            prop_assert_eq!(got.as_ref(), Some(leaf));
        }
    }

    #[test]
    fn set_null_then_get_is_null(doc in mapping_strategy(), key in "[a-c]{1,2}") {
        let mut view = FlatPathView::flatten(&doc);
        let path = FlatPath::from_segments([key]);
        view.set(&path, Document::Null).unwrap();
        prop_assert!(view.contains(&path));
        prop_assert_eq!(view.get(&path), Some(Document::Null));
    }
}

// =============================================================================
// LIST AND DEEP MERGE
// =============================================================================

proptest! {
    #[test]
    fn unique_merge_keeps_first_occurrences(
        base in prop::collection::vec(0u8..6, 0..10),
        incoming in prop::collection::vec(0u8..6, 0..10),
    ) {
        let merged = merge_lists(&base, &incoming, true);

        let mut expected: Vec<u8> = Vec::new();
        for v in base.iter().chain(&incoming) {
            if !expected.contains(v) {
                expected.push(*v);
            }
        }
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn non_unique_merge_is_concatenation(
        base in prop::collection::vec(any::<i32>(), 0..10),
        incoming in prop::collection::vec(any::<i32>(), 0..10),
    ) {
        let merged = merge_lists(&base, &incoming, false);
        prop_assert_eq!(merged.len(), base.len() + incoming.len());
        prop_assert_eq!(&merged[..base.len()], &base[..]);
    }

    #[test]
    fn merging_empty_mapping_is_identity(doc in mapping_strategy()) {
        let empty = Document::Object(Mapping::new());
        let opts = MergeOptions::new(true, false);
        prop_assert_eq!(deep_merge(&doc, &empty, opts).unwrap(), doc.clone());
        prop_assert_eq!(deep_merge(&empty, &doc, opts).unwrap(), doc);
    }

    #[test]
    fn incoming_scalars_always_win(doc in mapping_strategy(), key in "[a-c]{1,2}", value in scalar_strategy()) {
        let mut incoming = Mapping::new();
        incoming.insert(key.clone(), value.clone());
        let merged = deep_merge(&doc, &Document::Object(incoming), MergeOptions::default()).unwrap();
        prop_assert_eq!(&merged[key.as_str()], &value);
    }
}
