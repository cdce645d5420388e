//! Rotating backups of the data file

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::core::error::CatalogError;
use crate::{debug, warn};

/// Number of backups kept after each new one
pub const KEEP_BACKUPS: usize = 10;

/// One backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    /// File name, e.g. `all_courses.json.bak-1718000000000`
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Creation time from the name suffix, milliseconds since the epoch
    pub created_millis: Option<i64>,
    /// Last modification time, RFC 3339
    pub modified: String,
}

/// Backups of one data file, kept in a directory
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
    prefix: String,
    keep: usize,
}

impl BackupStore {
    /// Store in `dir` for backups of `data_file`; names are
    /// `<data file name>.bak-<unix millis>`
    pub fn new(dir: impl Into<PathBuf>, data_file: &Path) -> Self {
        let file_name = data_file
            .file_name()
            .map_or_else(|| "all_courses.json".into(), |n| n.to_string_lossy().into_owned());
        Self {
            dir: dir.into(),
            prefix: format!("{file_name}.bak-"),
            keep: KEEP_BACKUPS,
        }
    }

    /// Override how many backups are retained
    #[must_use]
    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep.max(1);
        self
    }

    /// Backup directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn millis_of(&self, name: &str) -> Option<i64> {
        name.strip_prefix(&self.prefix)?.parse().ok()
    }

    /// Copy `source` into a new backup, then prune old ones
    ///
    /// # Errors
    /// Returns [`CatalogError::Backup`] if the directory or copy fails
    pub fn create(&self, source: &Path) -> Result<PathBuf, CatalogError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CatalogError::Backup(format!("cannot create {}: {e}", self.dir.display()))
        })?;
        let mut millis = Utc::now().timestamp_millis();
        let mut target = self.dir.join(format!("{}{millis}", self.prefix));
        while target.exists() {
            millis += 1;
            target = self.dir.join(format!("{}{millis}", self.prefix));
        }
        fs::copy(source, &target).map_err(|e| {
            CatalogError::Backup(format!("cannot copy {}: {e}", source.display()))
        })?;
        debug!("Backed up {} to {}", source.display(), target.display());
        self.prune();
        Ok(target)
    }

    /// Backups, newest first
    ///
    /// # Errors
    /// Returns an error if the directory exists but cannot be read
    pub fn list(&self) -> Result<Vec<BackupEntry>, CatalogError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| CatalogError::io(&self.dir, e))?;
        let mut backups: Vec<(SystemTime, BackupEntry)> = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&self.prefix) {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            let modified_at = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            backups.push((
                modified_at,
                BackupEntry {
                    created_millis: self.millis_of(&name),
                    modified: DateTime::<Local>::from(modified_at).to_rfc3339(),
                    path: entry.path(),
                    size: meta.len(),
                    name,
                },
            ));
        }
        // newest first: name timestamp, then mtime
        backups.sort_by(|(ta, a), (tb, b)| {
            b.created_millis
                .cmp(&a.created_millis)
                .then_with(|| tb.cmp(ta))
        });
        Ok(backups.into_iter().map(|(_, e)| e).collect())
    }

    /// Remove all but the newest backups; failures are logged
    pub fn prune(&self) {
        let backups = match self.list() {
            Ok(backups) => backups,
            Err(e) => {
                warn!("Cannot list backups for pruning: {e}");
                return;
            }
        };
        for old in backups.iter().skip(self.keep) {
            if let Err(e) = fs::remove_file(&old.path) {
                warn!("Cannot remove old backup {}: {e}", old.name);
            }
        }
    }

    /// Path of a named backup; only plain names from this store resolve
    ///
    /// # Errors
    /// Returns [`CatalogError::BackupNotFound`] for unknown or foreign names
    pub fn resolve(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let plain = !name.contains(['/', '\\']) && name != "." && name != "..";
        let path = self.dir.join(name);
        if plain && name.starts_with(&self.prefix) && path.is_file() {
            Ok(path)
        } else {
            Err(CatalogError::BackupNotFound(name.to_string()))
        }
    }

    /// Contents of a named backup
    ///
    /// # Errors
    /// Returns [`CatalogError::BackupNotFound`] or an I/O error
    pub fn read(&self, name: &str) -> Result<String, CatalogError> {
        let path = self.resolve(name)?;
        fs::read_to_string(&path).map_err(|e| CatalogError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> (BackupStore, PathBuf) {
        let data = dir.path().join("all_courses.json");
        fs::write(&data, "[]").unwrap();
        (BackupStore::new(dir.path().join("backups"), &data), data)
    }

    #[test]
    fn test_create_names_and_lists_newest_first() {
        let dir = TempDir::new().unwrap();
        let (store, data) = store(&dir);
        let first = store.create(&data).unwrap();
        let second = store.create(&data).unwrap();
        let names: Vec<_> = store.list().unwrap().into_iter().map(|b| b.path).collect();
        assert_eq!(names, vec![second, first.clone()]);
        assert!(first
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("all_courses.json.bak-"));
    }

    #[test]
    fn test_prune_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let (store, data) = store(&dir);
        let store = store.with_keep(3);
        for _ in 0..5 {
            store.create(&data).unwrap();
        }
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_rejects_foreign_names() {
        let dir = TempDir::new().unwrap();
        let (store, data) = store(&dir);
        let created = store.create(&data).unwrap();
        let name = created.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(store.read(&name).unwrap(), "[]");
        assert!(matches!(
            store.read("../all_courses.json"),
            Err(CatalogError::BackupNotFound(_))
        ));
        assert!(matches!(
            store.read("all_courses.json.bak-0"),
            Err(CatalogError::BackupNotFound(_))
        ));
    }
}
