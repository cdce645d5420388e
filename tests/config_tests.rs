//! Integration tests for configuration management

use course_catalog::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    // Should have non-empty defaults for critical fields
    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.data_file.is_empty(),
        "Default data_file should not be empty"
    );
    assert_eq!(config.listing.page_size, 12);
    assert_eq!(config.catalog.industry_tracks.len(), 19);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
data_file = "./all_courses.json"
backups_dir = "./backups"

[listing]
page_size = 24
view = "list"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.data_file, "./all_courses.json");
    assert_eq!(config.paths.backups_dir, "./backups");
    assert_eq!(config.listing.page_size, 24);
    assert_eq!(config.default_view().to_string(), "list");
}

#[test]
fn test_config_from_toml_partial() {
    // Test that missing fields within sections use defaults
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, ""); // Default empty
    assert!(!config.logging.verbose); // Default false
    assert_eq!(config.paths.data_file, ""); // Default empty
    assert_eq!(config.listing.page_size, 0); // Filled by merge_defaults
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$COURSE_CATALOG/test.log"

[paths]
data_file = "$COURSE_CATALOG/data/all_courses.json"

[data]
candidates = ["$COURSE_CATALOG/extra.json"]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    // Variable should be expanded to actual path
    assert!(config.logging.file.contains("course-catalog"));
    assert!(!config.logging.file.contains("$COURSE_CATALOG"));
    assert!(config.paths.data_file.contains("course-catalog"));
    assert!(!config.data.candidates[0].contains("$COURSE_CATALOG"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    // Test get
    let level = config.get("level");
    assert!(level.is_some());

    // Test set
    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config.set("page-size", "6").expect("Failed to set page size");
    assert_eq!(config.listing.page_size, 6);
    assert!(config.set("page_size", "0").is_err());
    assert!(config.set("view", "carousel").is_err());
    assert!(config.set("sort", "priceAsc").is_ok());

    config
        .set("industry_tracks", "Agriculture | Food, Beverage & Nutrition")
        .expect("Failed to set industry tracks");
    assert_eq!(
        config.catalog.industry_tracks,
        vec!["Agriculture".to_string(), "Food, Beverage & Nutrition".to_string()]
    );

    // Test unknown key
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    // Change a value
    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.logging.level, "debug");

    // Unset should restore default
    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    assert_eq!(config.logging.level, defaults.logging.level);
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    // Create and save a config
    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");

    // Manually save to our test location
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    // Load and verify
    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        data_file: Some("./custom/all_courses.json".to_string()),
        grouped_file: Some("./custom/courses_grouped.json".to_string()),
        page_size: Some(6),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.data_file, "./custom/all_courses.json");
    assert_eq!(config.paths.grouped_file, "./custom/courses_grouped.json");
    assert_eq!(config.listing.page_size, 6);
    assert_eq!(
        config.candidate_paths().first(),
        Some(&PathBuf::from("./custom/all_courses.json"))
    );
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();

    // Apply partial overrides - only level changes
    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        file: None,
        verbose: None,
        data_file: None,
        grouped_file: None,
        page_size: Some(0),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    // Zero page size is ignored
    assert_eq!(config.listing.page_size, 12);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    // Should contain section headers (lowercase)
    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[listing]"));
    assert!(display_str.contains("[catalog]"));

    // Should contain field names
    assert!(display_str.contains("level"));
    assert!(display_str.contains("file"));
    assert!(display_str.contains("verbose"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    // Create a minimal config with empty fields
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
data_file = ""
backups_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(config.catalog.industry_tracks.is_empty());

    // Merge should add missing fields from defaults
    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.catalog.industry_tracks, defaults.catalog.industry_tracks);
    assert_eq!(config.listing.page_size, defaults.listing.page_size);
    assert!(!config.paths.data_file.is_empty());
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[paths]
data_file = ""
backups_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    // Custom values should be preserved
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
}

#[test]
fn test_get_catalog_dir() {
    let dir = Config::get_catalog_dir();

    assert!(dir.to_string_lossy().contains("course-catalog"));

    // Should not be empty or just "."
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    // Should end with config.toml or dconfig.toml
    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
