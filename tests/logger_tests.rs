//! Integration tests for logger behavior.

use course_catalog::logger::{current_level, set_level, set_level_from_str, Level};
use course_catalog::{debug, error, info, warn};

#[test]
fn test_level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("DEBUG"));
    assert_eq!(Level::parse("warning"), Some(Level::Warn));
}

#[test]
fn test_level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
    assert_eq!(Level::parse("trace"), None);
}

#[test]
fn test_logs_do_not_panic() {
    set_level(Level::Debug);
    assert_eq!(current_level(), Level::Debug);
    info!("loaded {} courses", 16);
    warn!("duplicate id {}", "AI-5");
    error!("backup failed");
    debug!("listing refreshed");
}

#[cfg(feature = "file-logging")]
#[test]
fn test_file_logging_creates_parent_dirs() {
    use course_catalog::logger::init_file_logging;
    use tempfile::TempDir;

    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("logs/catalog.log");
    assert!(init_file_logging(&path));
    error!("written to file");
    assert!(path.exists());
}
