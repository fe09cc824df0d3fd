mod common;

use cdp_document::MergeOptions;
use cdp_reconcile::{ConfigError, ReconcileConfig};
use common::init_tracing;
use pretty_assertions::assert_eq;
use std::io::Write;

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn defaults_match_reconciliation_rules() {
    let config = ReconcileConfig::default();
    assert!(config.unique_lists);
    assert!(!config.disallow_single_value_list);
    assert!(config.unique_segments);
    assert!(!config.unique_append);
    assert_eq!(config.merge_options(), MergeOptions::new(true, false));
    assert!(!config.projection_options().unique_append);
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parses_reconcile_table() {
    let config = ReconcileConfig::from_toml_str(
        r#"
        [reconcile]
        unique_lists = false
        unique_append = true
        "#,
    )
    .unwrap();

    assert_eq!(
        config,
        ReconcileConfig {
            unique_lists: false,
            disallow_single_value_list: false,
            unique_segments: true,
            unique_append: true,
        }
    );
}

#[test]
fn missing_table_uses_defaults() {
    let config = ReconcileConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
    assert_eq!(config, ReconcileConfig::default());
}

#[test]
fn wrong_type_is_rejected() {
    let err = ReconcileConfig::from_toml_str("[reconcile]\nunique_lists = \"yes\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

// ── Loading ──────────────────────────────────────────────────────

#[test]
fn load_from_reads_file() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[reconcile]\ndisallow_single_value_list = true").unwrap();

    let config = ReconcileConfig::load_from(file.path());
    assert!(config.disallow_single_value_list);
    assert!(config.unique_lists);
}

#[test]
fn load_from_missing_file_falls_back() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = ReconcileConfig::load_from(dir.path().join("absent.toml"));
    assert_eq!(config, ReconcileConfig::default());
}

#[test]
fn load_from_invalid_file_falls_back() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[reconcile\nunique_lists = ").unwrap();

    let config = ReconcileConfig::load_from(file.path());
    assert_eq!(config, ReconcileConfig::default());
}
