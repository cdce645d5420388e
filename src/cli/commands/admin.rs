//! Admin command handler

use std::fs;
use std::path::Path;

use course_catalog::config::Config;
use course_catalog::core::admin::{Admin, AdminOutcome};
use course_catalog::core::CatalogError;
use course_catalog::error;
use serde_json::Value;

use super::fail;
use crate::args::{AdminSubcommand, BackupSubcommand};

fn read_payload(path: &Path) -> Result<Value, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| CatalogError::json(path.display().to_string(), e))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(e),
    }
}

fn report(outcome: Result<AdminOutcome, CatalogError>) {
    match outcome {
        Ok(outcome) => {
            println!("✓ {}", outcome.message);
            if let Some(path) = outcome.path {
                println!("  {path}");
            }
        }
        Err(e) => {
            error!("Admin operation failed: {e}");
            print_json(&AdminOutcome::failed(&e));
            std::process::exit(1);
        }
    }
}

/// Dispatch admin subcommands
pub fn run(subcommand: AdminSubcommand, config: &Config) {
    let admin = Admin::new(config.admin_paths(), config.industry_tracks());
    match subcommand {
        AdminSubcommand::List { json } => {
            let listing = admin.list().unwrap_or_else(|e| fail(e));
            if json {
                print_json(&listing);
            } else {
                for entry in listing {
                    let id = entry.id.as_str().map_or_else(|| entry.id.to_string(), str::to_string);
                    let title = entry.title.as_str().unwrap_or("");
                    println!("{id:<10} {title}");
                }
            }
        }
        AdminSubcommand::Get { id } => match admin.get(&id) {
            Ok(Some(record)) => print_json(&record),
            Ok(None) => fail(format!("No course with id '{id}'")),
            Err(e) => fail(e),
        },
        AdminSubcommand::Upsert { file } => {
            let payload = read_payload(&file).unwrap_or_else(|e| fail(e));
            report(admin.upsert(payload));
        }
        AdminSubcommand::Preview { file, output } => {
            let html = read_payload(&file)
                .and_then(|payload| admin.preview(&payload))
                .unwrap_or_else(|e| fail(e));
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, html) {
                        fail(format!("Failed to write {}: {e}", path.display()));
                    }
                    println!("✓ Preview written to {}", path.display());
                }
                None => print!("{html}"),
            }
        }
        AdminSubcommand::RebuildGroups => report(admin.rebuild_groups()),
        AdminSubcommand::Backups { subcommand } => match subcommand {
            BackupSubcommand::List { json } => {
                let backups = admin.backups().list().unwrap_or_else(|e| fail(e));
                if json {
                    print_json(&backups);
                } else if backups.is_empty() {
                    println!("No backups in {}", admin.backups().dir().display());
                } else {
                    for backup in backups {
                        println!("{}  {:>9} bytes  {}", backup.name, backup.size, backup.modified);
                    }
                }
            }
            BackupSubcommand::Show { name } => {
                print!("{}", admin.backups().read(&name).unwrap_or_else(|e| fail(e)));
            }
            BackupSubcommand::Restore { name } => report(admin.restore(&name)),
        },
    }
}
