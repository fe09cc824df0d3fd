//! Shared test helpers for reconciliation tests.

#![allow(dead_code)]

use cdp_schema::EventTypeCatalogue;
use cdp_types::{Mapping, Profile, ProfileId};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Converts a JSON object literal into a mapping.
pub fn mapping(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A profile with a fixed id.
pub fn profile(id: &str) -> Profile {
    Profile::new(ProfileId::parse(id).unwrap())
}

/// A mapping nested `depth` levels deep under key `k`, ending in `leaf`.
pub fn nested(depth: usize, leaf: Value) -> Mapping {
    let mut value = leaf;
    for _ in 1..depth {
        value = json!({ "k": value });
    }
    let mut map = Mapping::new();
    map.insert("k".into(), value);
    map
}

/// A small catalogue covering literal and computed states, tags and merge
/// schemas.
pub fn catalogue() -> EventTypeCatalogue {
    EventTypeCatalogue::from_definitions(&json!([
        {
            "id": "page-view",
            "name": "Page view",
            "tags": ["general"]
        },
        {
            "id": "purchase-order",
            "name": "Purchase order",
            "copy": {
                "properties.order.id": "properties.id",
                "properties.order.total": "properties.total"
            },
            "profile": {
                "data.orders": ["properties.order.id", "append"],
                "data.last_order_total": ["properties.order.total", "equals"]
            },
            "state": "purchase",
            "tags": ["ecommerce", "purchase"]
        },
        {
            "id": "identify",
            "name": "Identify",
            "copy": {},
            "profile": {
                "traits.first_name": ["properties.firstname", "equals_if_not_exists"],
                "traits.email": ["properties.email", "equals"]
            },
            "state": "call:identification_state"
        },
        {
            "id": "opt-out",
            "name": "Opt out",
            "profile": {
                "consents.marketing": ["properties.reason", "delete"]
            }
        },
        {
            "id": "status-change",
            "name": "Status change",
            "profile": {
                "metadata.status": ["properties.status", "equals"],
                "traits.plan": ["properties.plan", "equals"]
            }
        },
        {
            "id": "profile-sync",
            "name": "Profile sync",
            "profile": {
                "traits.name": ["properties.name", "equals"],
                "segments": ["properties.segment", "append"],
                "metadata.time.visit.count": ["properties.reset", "delete"],
                "traits.source": ["properties.source", "equals"]
            }
        }
    ]))
    .unwrap()
}
