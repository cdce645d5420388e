//! Integration tests for the admin write path and data preparation

use std::fs;
use std::path::Path;

use course_catalog::core::admin::{Admin, AdminPaths, BackupStore};
use course_catalog::core::grouped::{GroupedCatalog, IndustryTracks};
use course_catalog::core::loader::read_json_array;
use course_catalog::core::prepare::{prepare, PrepareOptions, PrepareSettings};
use course_catalog::core::CatalogError;
use serde_json::{json, Value};
use tempfile::TempDir;

fn admin_in(dir: &Path) -> Admin {
    let paths = AdminPaths {
        data_file: dir.join("all_courses.json"),
        grouped_file: dir.join("courses_grouped.json"),
        backups_dir: dir.join("backups"),
        pages_dir: dir.join("ai"),
    };
    Admin::new(paths, IndustryTracks::default())
}

fn seed(admin: &Admin, records: &Value) {
    fs::write(
        &admin.paths().data_file,
        serde_json::to_string_pretty(records).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_upsert_appends_into_missing_data_file() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());

    let outcome = admin
        .upsert(json!({"id": "AI-1", "title": "Deep Learning for Vision", "track": "AI for Robotics & Intelligent Systems"}))
        .expect("upsert should succeed");
    assert!(outcome.success);
    assert_eq!(outcome.message, "Added 'Deep Learning for Vision'");

    let page = temp.path().join("ai/deep-learning-for-vision/index.html");
    assert!(page.is_file());
    assert!(fs::read_to_string(page).unwrap().contains("Deep Learning for Vision"));

    // Nothing to back up on first write
    assert!(admin.backups().list().unwrap().is_empty());

    let grouped: GroupedCatalog = serde_json::from_str(
        &fs::read_to_string(&admin.paths().grouped_file).unwrap(),
    )
    .unwrap();
    assert_eq!(grouped.total_courses, 1);
    assert_eq!(
        grouped.industry_tracks[0].track,
        "AI for Robotics & Intelligent Systems"
    );
}

#[test]
fn test_upsert_merges_matching_id() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    seed(
        &admin,
        &json!([
            {"id": "AI-1", "title": "Robot Arms", "level": "Beginner", "students": 40},
            {"id": 2, "title": "Drones"}
        ]),
    );

    let outcome = admin
        .upsert(json!({"id": "AI-1", "level": "Advanced"}))
        .unwrap();
    assert_eq!(outcome.message, "Updated 'Robot Arms'");

    let record = admin.get("AI-1").unwrap().expect("record kept");
    assert_eq!(record["level"], "Advanced");
    assert_eq!(record["students"], 40);
    assert_eq!(admin.list().unwrap().len(), 2);

    // Numeric ids match by their text
    admin.upsert(json!({"id": "2", "title": "Drone Swarms"})).unwrap();
    assert_eq!(admin.get("2").unwrap().unwrap()["title"], "Drone Swarms");
    assert_eq!(admin.list().unwrap().len(), 2);

    assert_eq!(admin.backups().list().unwrap().len(), 2);
}

#[test]
fn test_upsert_rejects_non_object_without_writing() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    seed(&admin, &json!([{"id": "AI-1", "title": "Kept"}]));
    let before = fs::read_to_string(&admin.paths().data_file).unwrap();

    let err = admin.upsert(json!(["not", "a", "course"])).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidRecord(_)));
    assert_eq!(fs::read_to_string(&admin.paths().data_file).unwrap(), before);
    assert!(admin.backups().list().unwrap().is_empty());
}

#[test]
fn test_invalid_data_file_is_not_overwritten() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    fs::write(&admin.paths().data_file, "{ broken").unwrap();

    assert!(admin.upsert(json!({"id": "AI-9", "title": "New"})).is_err());
    assert_eq!(
        fs::read_to_string(&admin.paths().data_file).unwrap(),
        "{ broken"
    );
}

#[test]
fn test_restore_round_trips_previous_version() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    seed(&admin, &json!([{"id": "AI-1", "title": "Original"}]));

    admin.upsert(json!({"id": "AI-1", "title": "Edited"})).unwrap();
    let backups = admin.backups().list().unwrap();
    assert_eq!(backups.len(), 1);

    let outcome = admin.restore(&backups[0].name).unwrap();
    assert!(outcome.message.starts_with("Restored 1 courses"));
    assert_eq!(admin.get("AI-1").unwrap().unwrap()["title"], "Original");
    // Restoring backs up the edited file first
    assert_eq!(admin.backups().list().unwrap().len(), 2);
}

#[test]
fn test_restore_rejects_foreign_names() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    seed(&admin, &json!([]));
    fs::write(temp.path().join("secrets.json"), "[]").unwrap();

    for name in ["../secrets.json", "secrets.json", "all_courses.json.bak-"] {
        assert!(matches!(
            admin.restore(name),
            Err(CatalogError::BackupNotFound(_))
        ));
    }
}

#[test]
fn test_backup_rotation_keeps_newest() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let data = temp.path().join("all_courses.json");
    fs::write(&data, "[]").unwrap();
    let store = BackupStore::new(temp.path().join("backups"), &data).with_keep(3);

    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(store.create(&data).unwrap());
    }
    let names: Vec<String> = store.list().unwrap().into_iter().map(|b| b.name).collect();
    assert_eq!(names.len(), 3);
    let newest = created.last().unwrap().file_name().unwrap().to_string_lossy();
    assert_eq!(names[0], newest);
}

#[test]
fn test_preview_writes_nothing() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let admin = admin_in(temp.path());
    let html = admin
        .preview(&json!({"title": "Preview Only", "duration": "4 Weeks"}))
        .unwrap();
    assert!(html.contains("Preview Only"));
    assert!(!admin.paths().data_file.exists());
    assert!(!admin.paths().pages_dir.exists());
}

#[test]
fn test_prepare_then_group_file() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let data = temp.path().join("all_courses.json");
    fs::write(
        &data,
        json!([
            {"title": "Soil Sensing", "duration": "3 Weeks", "track": "AI for Climate & Sustainability", "status": "Upcoming"},
            {"title": "Prompt Design", "track": "Generative AI"},
            "not a course"
        ])
        .to_string(),
    )
    .unwrap();

    let mut records = read_json_array(&data).unwrap();
    let settings = PrepareSettings {
        id_prefix: "AI".into(),
        enrollment_base: "https://example.org/enroll/".into(),
        main_page_base: "https://example.org/ai/courses/".into(),
    };
    let options = PrepareOptions {
        ids: true,
        urls: true,
        pricing: true,
        reset_status: true,
    };
    let report = prepare(&mut records, options, &settings);
    assert_eq!(report.ids, 2);
    assert_eq!(report.skipped, 1);

    assert_eq!(records[0]["id"], "AI-1");
    assert_eq!(records[1]["id"], "AI-2");
    assert_eq!(records[0]["status"], "Active");
    assert_eq!(records[0]["mainPageUrl"], "https://example.org/ai/courses/soil-sensing/");
    assert_eq!(records[0]["pricing"]["weeks"], 3);
    // Missing duration prices as one week
    assert_eq!(records[1]["pricing"]["weeks"], 1);

    let grouped = GroupedCatalog::build(&records, &IndustryTracks::default());
    assert_eq!(grouped.total_courses, 2);
    assert_eq!(grouped.industry_tracks.len(), 1);
    assert_eq!(grouped.regular_tracks.len(), 1);
}
