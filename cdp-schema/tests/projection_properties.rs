//! Property-based tests for the projection laws:
//! - Overwrite is idempotent
//! - SetIfAbsent never changes an existing value
//! - Delete leaves the path present with a null value
//! - Unique append keeps each distinct value once, in first-occurrence order

use cdp_document::{FlatPath, FlatPathView};
use cdp_schema::{MergeSchema, Operation, ProjectionOptions, SchemaProjector, project};
use proptest::prelude::*;
use serde_json::{Value, json};

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::vec(("[a-c]{1,2}", inner), 0..3)
                .prop_map(|kv| Value::Object(kv.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn overwrite_is_idempotent(existing in value_strategy(), incoming in value_strategy()) {
        let schema = MergeSchema::new().with("traits.v", "properties.v", Operation::Overwrite);
        let event = json!({"properties": {"v": incoming}});
        let profile = json!({"traits": {"v": existing, "keep": 1}});

        let once = project(&schema, &event, profile).document;
        let twice = project(&schema, &event, once.clone()).document;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn set_if_absent_is_non_destructive(existing in value_strategy(), incoming in value_strategy()) {
        let schema = MergeSchema::new().with("traits.v", "properties.v", Operation::SetIfAbsent);
        let event = json!({"properties": {"v": incoming}});
        let profile = json!({"traits": {"v": existing.clone()}});

        let projected = project(&schema, &event, profile).document;
        let view = FlatPathView::flatten(&projected);
        prop_assert_eq!(view.get(&FlatPath::parse("traits.v")), Some(existing));
    }

    #[test]
    fn delete_keeps_path_with_null(existing in value_strategy(), trigger in scalar_strategy()) {
        let schema = MergeSchema::new().with("traits.v", "properties.flag", Operation::Delete);
        let event = json!({"properties": {"flag": trigger}});
        let profile = json!({"traits": {"v": existing}});

        let projected = project(&schema, &event, profile).document;
        let view = FlatPathView::flatten(&projected);
        let path = FlatPath::parse("traits.v");
        prop_assert!(view.contains(&path));
        prop_assert_eq!(view.get(&path), Some(Value::Null));
    }

    #[test]
    fn unique_append_keeps_first_occurrences(values in prop::collection::vec(0u8..5, 1..12)) {
        let schema = MergeSchema::new().with("traits.seen", "properties.v", Operation::Append);
        let projector = SchemaProjector::new(ProjectionOptions { unique_append: true });

        let mut profile = json!({});
        for v in &values {
            profile = projector
                .project(&schema, &json!({"properties": {"v": v}}), profile)
                .document;
        }

        let mut expected: Vec<Value> = Vec::new();
        for v in &values {
            let v = json!(v);
            if !expected.contains(&v) {
                expected.push(v);
            }
        }
        prop_assert_eq!(&profile["traits"]["seen"], &Value::Array(expected));
    }
}
