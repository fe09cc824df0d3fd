use cdp_types::{Error, EventId, ProfileId};
use std::collections::HashSet;
use std::str::FromStr;

// ── ProfileId ─────────────────────────────────────────────────────

#[test]
fn profile_id_new_is_unique() {
    let a = ProfileId::new();
    let b = ProfileId::new();
    assert_ne!(a, b);
}

#[test]
fn profile_id_new_is_a_uuid() {
    let id = ProfileId::new();
    assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
}

#[test]
fn profile_id_accepts_external_ids() {
    let id = ProfileId::parse("crm-000123").unwrap();
    assert_eq!(id.as_str(), "crm-000123");
    assert_eq!(id.to_string(), "crm-000123");
}

#[test]
fn profile_id_rejects_blank() {
    assert!(matches!(ProfileId::parse(""), Err(Error::InvalidId(_))));
    assert!(ProfileId::from_str("   ").is_err());
}

#[test]
fn profile_id_serde_is_transparent() {
    let id = ProfileId::parse("p-1").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"p-1\"");
    let parsed: ProfileId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn profile_id_hash_and_eq() {
    let id = ProfileId::new();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}

// ── EventId ───────────────────────────────────────────────────────

#[test]
fn event_id_default_is_unique() {
    let a = EventId::default();
    let b = EventId::default();
    assert_ne!(a, b);
}

#[test]
fn event_id_display_roundtrip() {
    let id = EventId::new();
    let parsed: EventId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn event_id_rejects_blank() {
    assert!(EventId::parse("").is_err());
}
