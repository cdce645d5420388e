//! Course collection loading with ordered fallback sources.
//!
//! Sources are tried in order and the first one that yields a non-empty
//! array wins. A failing source is logged and skipped; only when every
//! source fails does loading return [`CatalogError::NoData`].

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::error::CatalogError;
use crate::core::filter::PreFilter;
use crate::core::grouped::GroupedSource;
use crate::core::models::RawCourse;
use crate::{debug, info, warn};

/// Sample collection compiled into the binary
const EMBEDDED_COURSES: &str = include_str!("../assets/sample_courses.json");

/// A place course records can be read from
pub trait CourseSource {
    /// Human-readable name used in logs and errors
    fn describe(&self) -> String;

    /// Fetch the raw records
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or is not a JSON array
    fn fetch(&self) -> Result<Vec<Value>, CatalogError>;
}

/// JSON array in a file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CourseSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<Value>, CatalogError> {
        read_json_array(&self.path)
    }
}

/// Flattened courses from a grouped file
#[derive(Debug, Clone)]
pub struct GroupedFileSource {
    path: PathBuf,
}

impl GroupedFileSource {
    /// Source reading the grouped file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CourseSource for GroupedFileSource {
    fn describe(&self) -> String {
        format!("{} (grouped)", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<Value>, CatalogError> {
        Ok(read_grouped(&self.path)?.courses())
    }
}

/// The sample collection compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl CourseSource for EmbeddedSource {
    fn describe(&self) -> String {
        "embedded sample".to_string()
    }

    fn fetch(&self) -> Result<Vec<Value>, CatalogError> {
        parse_array(EMBEDDED_COURSES, "embedded sample")
    }
}

/// Records from the winning source
#[derive(Debug, Clone)]
pub struct LoadedCollection {
    /// Source the records came from
    pub origin: String,
    /// Parsed records
    pub records: Vec<RawCourse>,
    /// Entries skipped because they were not course-shaped
    pub skipped: usize,
}

fn parse_array(text: &str, origin: &str) -> Result<Vec<Value>, CatalogError> {
    match serde_json::from_str(text).map_err(|e| CatalogError::json(origin, e))? {
        Value::Array(items) => Ok(items),
        _ => Err(CatalogError::InvalidRecord(format!(
            "{origin} does not contain a JSON array"
        ))),
    }
}

/// Read a JSON array of records from a file
///
/// # Errors
/// Returns an error if the file cannot be read or does not hold an array
pub fn read_json_array(path: &Path) -> Result<Vec<Value>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    parse_array(&text, &path.display().to_string())
}

/// Read a grouped file in either shape
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_grouped(path: &Path) -> Result<GroupedSource, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| CatalogError::json(path.display().to_string(), e))?;
    GroupedSource::from_value(value)
}

/// Turn raw values into records, skipping entries that are not objects or
/// do not fit the record shape
#[must_use]
pub fn parse_records(values: Vec<Value>, origin: &str) -> (Vec<RawCourse>, usize) {
    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for (position, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            warn!("{origin}: entry {position} is not an object, skipping");
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<RawCourse>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("{origin}: entry {position} is malformed ({e}), skipping");
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

/// Try each source in order; the first non-empty array wins
///
/// # Errors
/// Returns [`CatalogError::NoData`] listing every source tried when none
/// yields records
pub fn load_first(sources: &[Box<dyn CourseSource>]) -> Result<LoadedCollection, CatalogError> {
    let mut attempts = Vec::with_capacity(sources.len());
    for source in sources {
        let origin = source.describe();
        debug!("Trying course source {origin}");
        match source.fetch() {
            Ok(values) if !values.is_empty() => {
                let (records, skipped) = parse_records(values, &origin);
                if records.is_empty() {
                    warn!("{origin}: no usable records");
                    attempts.push(origin);
                    continue;
                }
                info!("Loaded {} courses from {origin}", records.len());
                return Ok(LoadedCollection {
                    origin,
                    records,
                    skipped,
                });
            }
            Ok(_) => debug!("{origin}: empty collection"),
            Err(e) => debug!("{origin}: {e}"),
        }
        attempts.push(origin);
    }
    Err(CatalogError::NoData { attempts })
}

/// Load a listing scoped to one track or domain.
///
/// The grouped file is consulted first; when it is missing, unreadable or
/// has no group for the scope, the regular sources are used and the caller
/// applies the scope as a pre-filter.
///
/// # Errors
/// Returns [`CatalogError::NoData`] when the fallback sources all fail
pub fn load_scoped(
    grouped: Option<&Path>,
    scope: &PreFilter,
    sources: &[Box<dyn CourseSource>],
) -> Result<LoadedCollection, CatalogError> {
    if let Some(path) = grouped {
        match read_grouped(path).map(|g| g.scoped(scope)) {
            Ok(Some(values)) => {
                let origin = format!("{} ({} = {})", path.display(), scope.dimension, scope.value);
                let (records, skipped) = parse_records(values, &origin);
                if !records.is_empty() {
                    info!("Loaded {} scoped courses from {origin}", records.len());
                    return Ok(LoadedCollection {
                        origin,
                        records,
                        skipped,
                    });
                }
            }
            Ok(None) => debug!("{}: no group for {} = {}", path.display(), scope.dimension, scope.value),
            Err(e) => debug!("Grouped source unavailable: {e}"),
        }
    }
    load_first(sources)
}

/// Standard source order: each candidate file, then the grouped file, then
/// the embedded sample when enabled
#[must_use]
pub fn default_sources(
    candidates: &[PathBuf],
    grouped: Option<&Path>,
    embedded_fallback: bool,
) -> Vec<Box<dyn CourseSource>> {
    let mut sources: Vec<Box<dyn CourseSource>> = candidates
        .iter()
        .map(|p| Box::new(FileSource::new(p)) as Box<dyn CourseSource>)
        .collect();
    if let Some(path) = grouped {
        sources.push(Box::new(GroupedFileSource::new(path)));
    }
    if embedded_fallback {
        sources.push(Box::new(EmbeddedSource));
    }
    sources
}
