//! Tests for config functionality.

use crate::config::types::default_ignore_patterns;
use crate::config::{Config, ConflictStrategy, HierarchyLevel, HierarchyTemplate, OperationMode};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.similarity_threshold, 0.65);
    assert_eq!(config.strong_similarity_threshold, 0.80);
    assert_eq!(config.min_group_size, 2);
    assert_eq!(config.max_group_size, 50);
    assert!(config.use_full_path);
    assert_eq!(config.conflict_threshold, 0.5);
    assert_eq!(config.hierarchy_template, HierarchyTemplate::GenreFirst);
    assert_eq!(config.operation_mode, OperationMode::Move);
    assert!(config.taxonomy_path.is_none());
    assert_eq!(config.ignore_patterns, default_ignore_patterns());
    assert_eq!(config.conflict_resolution, ConflictStrategy::Rename);
    assert!(config.enable_rollback);
    assert_eq!(config.critical_error_threshold, 10);
    assert!(config.capture_fusion_backup);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.min_group_size, 2);
    assert_eq!(config.conflict_resolution, ConflictStrategy::Rename);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
min_group_size: 3
operation_mode: copy
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.min_group_size, 3);
    assert_eq!(config.operation_mode, OperationMode::Copy);

    // Unspecified values should use defaults
    assert_eq!(config.max_group_size, 50);
    assert!(config.enable_rollback);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
similarity_threshold: 0.7
strong_similarity_threshold: 0.9
min_group_size: 1
max_group_size: 10
use_full_path: false
conflict_threshold: 0.4
estimated_bytes_per_file: 2048
hierarchy_template: type_first
operation_mode: copy
taxonomy_path: taxonomy.yaml
ignore_patterns:
  - "*.asd"
throughput_bytes_per_sec: 1000
conflict_resolution: skip
enable_rollback: false
critical_error_threshold: 3
capture_fusion_backup: false
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.similarity_threshold, 0.7);
    assert_eq!(config.strong_similarity_threshold, 0.9);
    assert_eq!(config.min_group_size, 1);
    assert_eq!(config.max_group_size, 10);
    assert!(!config.use_full_path);
    assert_eq!(config.conflict_threshold, 0.4);
    assert_eq!(config.estimated_bytes_per_file, 2048);
    assert_eq!(config.hierarchy_template, HierarchyTemplate::TypeFirst);
    assert_eq!(config.operation_mode, OperationMode::Copy);
    assert_eq!(
        config.taxonomy_path.as_deref(),
        Some(std::path::Path::new("taxonomy.yaml"))
    );
    assert_eq!(config.ignore_patterns, vec!["*.asd"]);
    assert_eq!(config.throughput_bytes_per_sec, 1000);
    assert_eq!(config.conflict_resolution, ConflictStrategy::Skip);
    assert!(!config.enable_rollback);
    assert_eq!(config.critical_error_threshold, 3);
    assert!(!config.capture_fusion_backup);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
min_group_size: 2
some_future_setting: true
"#;
    assert!(Config::from_yaml(yaml).is_ok());
}

#[test]
fn test_invalid_threshold_rejected() {
    let err = Config::from_yaml("similarity_threshold: 1.5").unwrap_err();
    assert!(err.to_string().contains("similarity_threshold"));
}

#[test]
fn test_strong_threshold_below_regular_rejected() {
    let yaml = r#"
similarity_threshold: 0.8
strong_similarity_threshold: 0.7
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("strong_similarity_threshold"));
}

#[test]
fn test_group_size_bounds_rejected() {
    assert!(Config::from_yaml("min_group_size: 0").is_err());

    let yaml = r#"
min_group_size: 5
max_group_size: 4
"#;
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_zero_error_threshold_rejected() {
    assert!(Config::from_yaml("critical_error_threshold: 0").is_err());
}

#[test]
fn test_invalid_ignore_glob_rejected() {
    let yaml = r#"
ignore_patterns:
  - "[unclosed"
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("ignore_patterns"));
}

#[test]
fn test_yaml_roundtrip_preserves_values() {
    let config = Config {
        min_group_size: 4,
        conflict_resolution: ConflictStrategy::Overwrite,
        ..Config::default()
    };

    let yaml = config.to_yaml().unwrap();
    let parsed = Config::from_yaml(&yaml).unwrap();

    assert_eq!(parsed.min_group_size, 4);
    assert_eq!(parsed.conflict_resolution, ConflictStrategy::Overwrite);
}

#[test]
fn test_load_reads_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packfuse.yaml");
    std::fs::write(&path, "max_group_size: 7\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.max_group_size, 7);
}

#[test]
fn test_load_missing_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let err = Config::load(temp.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().starts_with("Invalid configuration"));
}

#[test]
fn test_resolve_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.yaml");
    std::fs::write(&path, "hierarchy_template: flat\n").unwrap();

    let config = Config::resolve(Some(path.as_path())).unwrap();
    assert_eq!(config.hierarchy_template, HierarchyTemplate::Flat);
}

#[test]
fn test_template_levels() {
    assert_eq!(
        HierarchyTemplate::GenreFirst.levels(),
        &[
            HierarchyLevel::Family,
            HierarchyLevel::Style,
            HierarchyLevel::Type,
            HierarchyLevel::Function
        ]
    );
    assert_eq!(
        HierarchyTemplate::Flat.levels(),
        &[HierarchyLevel::Type, HierarchyLevel::Function]
    );
}

#[test]
fn test_from_str_parsers() {
    assert_eq!(
        HierarchyTemplate::from_str("type_first"),
        Some(HierarchyTemplate::TypeFirst)
    );
    assert_eq!(HierarchyTemplate::from_str("nope"), None);
    assert_eq!(ConflictStrategy::from_str("skip"), Some(ConflictStrategy::Skip));
    assert_eq!(ConflictStrategy::from_str("merge"), None);
}

#[test]
fn test_ask_strategy_falls_back_to_rename() {
    assert_eq!(ConflictStrategy::Ask.effective(), ConflictStrategy::Rename);
    assert_eq!(
        ConflictStrategy::Overwrite.effective(),
        ConflictStrategy::Overwrite
    );
}
