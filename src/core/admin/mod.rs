//! Admin operations on the data file.
//!
//! Every write follows the same order: render the detail page, back up the
//! current data file, write the data file, write the page, then rebuild the
//! grouped file. A render or backup failure stops before anything is
//! written.

pub mod backups;

pub use backups::{BackupEntry, BackupStore, KEEP_BACKUPS};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::core::error::CatalogError;
use crate::core::grouped::{GroupedCatalog, IndustryTracks};
use crate::core::loader::read_json_array;
use crate::core::render::DetailPage;
use crate::{info, warn};

/// File locations the admin tool works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPaths {
    /// The course collection
    pub data_file: PathBuf,
    /// Derived grouped catalog
    pub grouped_file: PathBuf,
    /// Backup directory
    pub backups_dir: PathBuf,
    /// Root for generated course pages
    pub pages_dir: PathBuf,
}

/// Result reported for a write operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOutcome {
    /// Whether the operation completed
    pub success: bool,
    /// File or directory produced, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Human-readable summary
    pub message: String,
}

impl AdminOutcome {
    fn ok(path: Option<&Path>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            path: path.map(|p| p.display().to_string()),
            message: message.into(),
        }
    }

    /// Failure outcome carrying the error text
    #[must_use]
    pub fn failed(error: &CatalogError) -> Self {
        Self {
            success: false,
            path: None,
            message: error.to_string(),
        }
    }
}

/// `id` and `title` of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseListing {
    /// Record id as stored
    pub id: Value,
    /// Record title as stored
    pub title: Value,
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Write `contents` next to `path` and rename it into place
///
/// # Errors
/// Returns an error if the directory, temp file or rename fails
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, contents).map_err(|e| CatalogError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| CatalogError::io(path, e))
}

/// Admin tool bound to a set of paths
#[derive(Debug, Clone)]
pub struct Admin {
    paths: AdminPaths,
    industry: IndustryTracks,
    backups: BackupStore,
}

impl Admin {
    /// Admin over `paths`, classifying tracks with `industry`
    #[must_use]
    pub fn new(paths: AdminPaths, industry: IndustryTracks) -> Self {
        let backups = BackupStore::new(&paths.backups_dir, &paths.data_file);
        Self {
            paths,
            industry,
            backups,
        }
    }

    /// Configured paths
    #[must_use]
    pub const fn paths(&self) -> &AdminPaths {
        &self.paths
    }

    /// Backup store for the data file
    #[must_use]
    pub const fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Current records; a missing data file reads as empty
    ///
    /// # Errors
    /// Returns an error if the file exists but is unreadable or not an array
    pub fn records(&self) -> Result<Vec<Value>, CatalogError> {
        if self.paths.data_file.exists() {
            read_json_array(&self.paths.data_file)
        } else {
            Ok(Vec::new())
        }
    }

    /// `id` and `title` of every record
    ///
    /// # Errors
    /// Returns an error if the data file cannot be read
    pub fn list(&self) -> Result<Vec<CourseListing>, CatalogError> {
        Ok(self
            .records()?
            .iter()
            .map(|r| CourseListing {
                id: r.get("id").cloned().unwrap_or(Value::Null),
                title: r.get("title").cloned().unwrap_or(Value::Null),
            })
            .collect())
    }

    /// Record whose `id` equals `id`
    ///
    /// # Errors
    /// Returns an error if the data file cannot be read
    pub fn get(&self, id: &str) -> Result<Option<Value>, CatalogError> {
        Ok(self
            .records()?
            .into_iter()
            .find(|r| r.get("id").and_then(id_text).as_deref() == Some(id)))
    }

    /// Render the detail page for a payload without writing anything
    ///
    /// # Errors
    /// Returns an error if the payload is not an object or rendering fails
    pub fn preview(&self, payload: &Value) -> Result<String, CatalogError> {
        DetailPage::from_record(payload)?.to_html()
    }

    /// Merge `payload` into the record with the same `id`, or append it,
    /// then write the data file, the course page and the grouped file.
    ///
    /// Payload fields replace stored ones; fields it omits are kept.
    ///
    /// # Errors
    /// Returns an error, with nothing written, if the payload is not an
    /// object, rendering fails or the backup fails
    pub fn upsert(&self, payload: Value) -> Result<AdminOutcome, CatalogError> {
        let Value::Object(fields) = payload else {
            return Err(CatalogError::InvalidRecord(
                "course payload must be a JSON object".into(),
            ));
        };
        let mut records = self.records()?;
        let id = fields.get("id").and_then(id_text);
        let existing = id.as_deref().and_then(|id| {
            records
                .iter()
                .position(|r| r.get("id").and_then(id_text).as_deref() == Some(id))
        });

        let merged = match existing {
            Some(pos) => {
                let mut base = match records[pos].take() {
                    Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                base.extend(fields);
                records[pos] = Value::Object(base);
                &records[pos]
            }
            None => {
                records.push(Value::Object(fields));
                &records[records.len() - 1]
            }
        };

        let page = DetailPage::from_record(merged)?;
        let html = page.to_html()?;
        let slug = match page.slug() {
            s if s.is_empty() => "course".to_string(),
            s => s,
        };

        self.backup_current()?;
        self.write_records(&records)?;

        let page_dir = self.paths.pages_dir.join(&slug);
        write_atomic(&page_dir.join("index.html"), &html)?;
        self.rebuild_after_write(&records);

        let verb = if existing.is_some() { "Updated" } else { "Added" };
        info!("{verb} course {} ({})", id.as_deref().unwrap_or("-"), page.title);
        Ok(AdminOutcome::ok(
            Some(&page_dir),
            format!("{verb} '{}'", page.title),
        ))
    }

    /// Regenerate the grouped file from the data file
    ///
    /// # Errors
    /// Returns an error if the data file cannot be read or the write fails
    pub fn rebuild_groups(&self) -> Result<AdminOutcome, CatalogError> {
        let records = self.records()?;
        let grouped = GroupedCatalog::build(&records, &self.industry);
        grouped.write(&self.paths.grouped_file)?;
        Ok(AdminOutcome::ok(
            Some(&self.paths.grouped_file),
            format!(
                "Grouped {} courses into {} industry and {} regular tracks",
                grouped.total_courses,
                grouped.industry_tracks.len(),
                grouped.regular_tracks.len()
            ),
        ))
    }

    /// Replace the data file with a named backup and rebuild groups.
    /// The current data file is backed up first.
    ///
    /// # Errors
    /// Returns an error if the backup is unknown, is not a JSON array, or a
    /// write fails
    pub fn restore(&self, name: &str) -> Result<AdminOutcome, CatalogError> {
        let content = self.backups.read(name)?;
        let records = match serde_json::from_str(&content)
            .map_err(|e| CatalogError::json(name, e))?
        {
            Value::Array(items) => items,
            _ => {
                return Err(CatalogError::InvalidRecord(format!(
                    "backup {name} is not a JSON array"
                )))
            }
        };
        self.backup_current()?;
        self.write_records(&records)?;
        self.rebuild_after_write(&records);
        Ok(AdminOutcome::ok(
            Some(&self.paths.data_file),
            format!("Restored {} courses from {name}", records.len()),
        ))
    }

    fn backup_current(&self) -> Result<(), CatalogError> {
        if self.paths.data_file.exists() {
            self.backups.create(&self.paths.data_file)?;
        }
        Ok(())
    }

    fn write_records(&self, records: &[Value]) -> Result<(), CatalogError> {
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| CatalogError::json("course records", e))?;
        write_atomic(&self.paths.data_file, &body)
    }

    /// Grouped file follows the data file; a failure here does not undo
    /// the write
    fn rebuild_after_write(&self, records: &[Value]) {
        let grouped = GroupedCatalog::build(records, &self.industry);
        if let Err(e) = grouped.write(&self.paths.grouped_file) {
            warn!("Rebuild groups failed: {e}");
        }
    }
}
