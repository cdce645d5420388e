//! Prepare command handler

use std::path::PathBuf;

use course_catalog::config::Config;
use course_catalog::core::admin::{write_atomic, BackupStore};
use course_catalog::core::grouped::GroupedCatalog;
use course_catalog::core::loader::read_json_array;
use course_catalog::core::prepare::{prepare, PrepareOptions};
use course_catalog::{info, warn};

use super::fail;

/// Run the selected preparation passes over the data file
pub fn run(mut options: PrepareOptions, dry_run: bool, file: Option<PathBuf>, config: &Config) {
    if !(options.ids || options.urls || options.pricing) {
        options.ids = true;
        options.urls = true;
        options.pricing = true;
    }
    let paths = config.admin_paths();
    let target = file.unwrap_or_else(|| paths.data_file.clone());

    let mut records = read_json_array(&target).unwrap_or_else(|e| fail(e));
    let report = prepare(&mut records, options, &config.prepare_settings());
    println!(
        "ids: {}  urls: {}  pricing: {}  skipped: {}",
        report.ids, report.urls, report.pricing, report.skipped
    );
    if dry_run {
        println!("✓ Dry run; {} left unchanged", target.display());
        return;
    }

    if let Err(e) = BackupStore::new(&paths.backups_dir, &target).create(&target) {
        fail(e);
    }
    let body = serde_json::to_string_pretty(&records).unwrap_or_else(|e| fail(e));
    if let Err(e) = write_atomic(&target, &body) {
        fail(e);
    }
    info!("Prepared {} records in {}", records.len(), target.display());
    println!("✓ Updated {}", target.display());

    if options.ids && target == paths.data_file {
        let grouped = GroupedCatalog::build(&records, &config.industry_tracks());
        match grouped.write(&paths.grouped_file) {
            Ok(()) => println!("✓ Regenerated {}", paths.grouped_file.display()),
            Err(e) => warn!("Rebuild groups failed: {e}"),
        }
    }
}
