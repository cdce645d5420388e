//! Grouped catalog: tracks split into industry and regular, each broken
//! down by domain.
//!
//! The grouped file is derived from the data file and rewritten after every
//! admin change. Listings scoped to one track or domain may read it instead
//! of the full collection.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::core::error::CatalogError;
use crate::core::filter::PreFilter;
use crate::core::indexer::Dimension;
use crate::core::normalizer::fold_key;

/// Bucket name for records without a track or domain
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Track names shipped as the default industry list
pub const DEFAULT_INDUSTRY_TRACKS: [&str; 19] = [
    "Industry AI Leadership & Strategy",
    "Government & Public AI",
    "No-Code AI & Citizen Innovation",
    "AI Research & Scientific Discovery",
    "Industry AI & Intelligent Manufacturing",
    "AI for Sustainability & Climate Resilience",
    "AI for Global Health, Biomedicine & Life Sciences",
    "AI for Advanced Materials & Nanotech",
    "AI for Energy, Environment & Sustainability",
    "AI for Space, Geospatial & Planetary Science",
    "AI for Quantum & Cybersecurity",
    "AI for Robotics & Intelligent Systems",
    "AI for Biomedical Engineering",
    "AI for Climate & Sustainability",
    "AI for Policy & Global Security",
    "AI for Quantum Computing & Emerging Tech",
    "Quantum AI & Software Engineering",
    "Quantum AI Deployment & Integration",
    "Quantum AI & Industry Applications",
];

/// Set of industry track names, matched on folded keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryTracks {
    keys: HashSet<String>,
}

impl Default for IndustryTracks {
    fn default() -> Self {
        Self::new(DEFAULT_INDUSTRY_TRACKS)
    }
}

impl IndustryTracks {
    /// Build from track names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: names.into_iter().map(|n| fold_key(n.as_ref())).collect(),
        }
    }

    /// Whether `track` is an industry track
    #[must_use]
    pub fn contains(&self, track: &str) -> bool {
        self.keys.contains(&fold_key(track))
    }
}

/// Courses of one domain inside a track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainGroup {
    /// Domain name
    pub name: String,
    /// Course summaries
    #[serde(default)]
    pub courses: Vec<Value>,
    /// Number of courses
    #[serde(default)]
    pub course_count: usize,
}

/// One track and its domains
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackGroup {
    /// Track name
    pub track: String,
    /// Whether the track is in the industry list
    #[serde(default)]
    pub is_industry_track: bool,
    /// Domains in first-seen order
    #[serde(default)]
    pub domains: Vec<DomainGroup>,
    /// Number of courses across all domains
    #[serde(default)]
    pub course_count: usize,
}

impl TrackGroup {
    /// Every course summary in the track, domain by domain
    pub fn courses(&self) -> impl Iterator<Item = &Value> {
        self.domains.iter().flat_map(|d| d.courses.iter())
    }
}

/// The grouped catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCatalog {
    /// Industry tracks, alphabetical
    #[serde(default)]
    pub industry_tracks: Vec<TrackGroup>,
    /// Other tracks, alphabetical
    #[serde(default)]
    pub regular_tracks: Vec<TrackGroup>,
    /// Number of courses grouped
    #[serde(default)]
    pub total_courses: usize,
}

fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn instructor(record: &Map<String, Value>) -> Value {
    let first = record
        .get("instructors")
        .and_then(Value::as_array)
        .and_then(|list| list.first());
    match first {
        Some(Value::Object(obj)) => obj.get("name").cloned().unwrap_or_else(|| json!("")),
        Some(other) => other.clone(),
        None => record.get("instructor").cloned().unwrap_or_else(|| json!("")),
    }
}

/// Course entry written into the grouped file: the whole record plus the
/// first instructor name, so a scoped listing sees the same fields as the
/// data file
#[must_use]
pub fn course_summary(record: &Map<String, Value>) -> Value {
    let mut summary = record.clone();
    summary
        .entry("instructor")
        .or_insert_with(|| instructor(record));
    Value::Object(summary)
}

fn sort_tracks(tracks: &mut [TrackGroup]) {
    tracks.sort_by(|a, b| {
        fold_key(&a.track)
            .cmp(&fold_key(&b.track))
            .then_with(|| a.track.cmp(&b.track))
    });
}

impl GroupedCatalog {
    /// Group raw records by track, then domain.
    ///
    /// Non-object entries are skipped and not counted.
    #[must_use]
    pub fn build(records: &[Value], industry: &IndustryTracks) -> Self {
        let mut tracks: Vec<TrackGroup> = Vec::new();
        let mut total = 0;
        for record in records.iter().filter_map(Value::as_object) {
            let track = text_field(record, "track").unwrap_or_else(|| UNCATEGORIZED.to_string());
            let domain = text_field(record, "domain").unwrap_or_else(|| UNCATEGORIZED.to_string());
            let summary = course_summary(record);

            let pos = if let Some(pos) = tracks.iter().position(|t| t.track == track) {
                pos
            } else {
                tracks.push(TrackGroup {
                    is_industry_track: industry.contains(&track),
                    track: track.clone(),
                    ..TrackGroup::default()
                });
                tracks.len() - 1
            };
            let entry = &mut tracks[pos];
            if let Some(group) = entry.domains.iter_mut().find(|d| d.name == domain) {
                group.courses.push(summary);
                group.course_count = group.courses.len();
            } else {
                entry.domains.push(DomainGroup {
                    name: domain,
                    courses: vec![summary],
                    course_count: 1,
                });
            }
            entry.course_count += 1;
            total += 1;
        }

        let (mut industry_tracks, mut regular_tracks): (Vec<_>, Vec<_>) =
            tracks.into_iter().partition(|t| t.is_industry_track);
        sort_tracks(&mut industry_tracks);
        sort_tracks(&mut regular_tracks);
        Self {
            industry_tracks,
            regular_tracks,
            total_courses: total,
        }
    }

    /// All tracks, industry first
    pub fn tracks(&self) -> impl Iterator<Item = &TrackGroup> {
        self.industry_tracks.iter().chain(self.regular_tracks.iter())
    }

    /// Write as pretty JSON
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails
    pub fn write(&self, path: &Path) -> Result<(), CatalogError> {
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::json("grouped catalog", e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        std::fs::write(path, body).map_err(|e| CatalogError::io(path, e))
    }
}

/// A grouped file in either supported shape
#[derive(Debug, Clone, PartialEq)]
pub enum GroupedSource {
    /// `{industryTracks, regularTracks}`
    Split(GroupedCatalog),
    /// `{tracks: {name: [...]}, domains: {name: [...]}}`
    Keyed {
        /// Courses keyed by track name
        tracks: Map<String, Value>,
        /// Courses keyed by domain name
        domains: Map<String, Value>,
    },
}

fn array_items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

fn dedup(values: impl Iterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

impl GroupedSource {
    /// Recognize the shape of a parsed grouped file
    ///
    /// # Errors
    /// Returns an error if the value is not an object or the split shape is
    /// malformed
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let Value::Object(mut obj) = value else {
            return Err(CatalogError::InvalidRecord(
                "grouped catalog must be a JSON object".into(),
            ));
        };
        if obj.contains_key("industryTracks") || obj.contains_key("regularTracks") {
            let catalog = serde_json::from_value(Value::Object(obj))
                .map_err(|e| CatalogError::json("grouped catalog", e))?;
            return Ok(Self::Split(catalog));
        }
        let mut take = |key: &str| match obj.remove(key) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Ok(Self::Keyed {
            tracks: take("tracks"),
            domains: take("domains"),
        })
    }

    /// Every course in the file; the keyed shape lists a course under both
    /// its track and its domain, so repeats are dropped
    #[must_use]
    pub fn courses(&self) -> Vec<Value> {
        match self {
            Self::Split(catalog) => catalog.tracks().flat_map(TrackGroup::courses).cloned().collect(),
            Self::Keyed { tracks, domains } => dedup(
                tracks
                    .values()
                    .chain(domains.values())
                    .flat_map(array_items)
                    .cloned(),
            ),
        }
    }

    /// Courses for a scoped listing, or `None` when the file has no group
    /// for the scope and the caller should fall back to the full collection
    #[must_use]
    pub fn scoped(&self, scope: &PreFilter) -> Option<Vec<Value>> {
        let matches = |name: &str| fold_key(name) == scope.value;
        let found: Vec<Value> = match (self, scope.dimension) {
            (Self::Split(catalog), Dimension::Track) => catalog
                .tracks()
                .filter(|t| matches(&t.track))
                .flat_map(TrackGroup::courses)
                .cloned()
                .collect(),
            (Self::Split(catalog), Dimension::Domain) => catalog
                .tracks()
                .flat_map(|t| t.domains.iter())
                .filter(|d| matches(&d.name))
                .flat_map(|d| d.courses.iter())
                .cloned()
                .collect(),
            (Self::Keyed { tracks, .. }, Dimension::Track) => dedup(
                tracks
                    .iter()
                    .filter(|(k, _)| matches(k))
                    .flat_map(|(_, v)| array_items(v))
                    .cloned(),
            ),
            (Self::Keyed { domains, .. }, Dimension::Domain) => dedup(
                domains
                    .iter()
                    .filter(|(k, _)| matches(k))
                    .flat_map(|(_, v)| array_items(v))
                    .cloned(),
            ),
            (_, Dimension::Category) => Vec::new(),
        };
        (!found.is_empty()).then_some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Value> {
        vec![
            json!({"id": "AI-1", "title": "Vision", "track": "AI for Robotics & Intelligent Systems", "domain": "Robotics"}),
            json!({"id": "AI-2", "title": "Agents", "track": "Applied AI", "domain": "Agents", "status": "Upcoming"}),
            json!({"id": "AI-3", "title": "Planning", "track": "AI for Robotics & Intelligent Systems", "domain": "Robotics", "instructors": [{"name": "R. Rao"}]}),
            json!({"id": "AI-4", "title": "Loose"}),
            json!("not a course"),
        ]
    }

    #[test]
    fn test_build_splits_and_counts() {
        let grouped = GroupedCatalog::build(&records(), &IndustryTracks::default());
        assert_eq!(grouped.total_courses, 4);
        assert_eq!(grouped.industry_tracks.len(), 1);
        let industry = &grouped.industry_tracks[0];
        assert!(industry.is_industry_track);
        assert_eq!(industry.course_count, 2);
        assert_eq!(industry.domains[0].course_count, 2);
        assert_eq!(industry.domains[0].courses[1]["instructor"], "R. Rao");

        let names: Vec<_> = grouped.regular_tracks.iter().map(|t| t.track.as_str()).collect();
        assert_eq!(names, vec!["Applied AI", UNCATEGORIZED]);
    }

    #[test]
    fn test_summary_keeps_record_fields() {
        let grouped = GroupedCatalog::build(&records(), &IndustryTracks::default());
        let loose = &grouped.regular_tracks[1].domains[0].courses[0];
        assert!(loose.get("status").is_none());
        assert!(loose.get("domain").is_none());
        assert_eq!(grouped.regular_tracks[1].domains[0].name, UNCATEGORIZED);

        let record = json!({"id": "AI-9", "category": "Industrial", "pricing": {"lms": {"usd": 19, "inr": 1499}}});
        let summary = course_summary(record.as_object().unwrap());
        assert_eq!(summary["category"], "Industrial");
        assert_eq!(summary["pricing"]["lms"]["inr"], 1499);
        assert_eq!(summary["instructor"], "");
    }

    #[test]
    fn test_industry_match_is_folded() {
        let industry = IndustryTracks::new(["Government & Public AI"]);
        assert!(industry.contains("  government & public ai "));
        assert!(!industry.contains("Government"));
    }

    #[test]
    fn test_split_source_round_trip_and_scope() {
        let grouped = GroupedCatalog::build(&records(), &IndustryTracks::default());
        let value = serde_json::to_value(&grouped).unwrap();
        let source = GroupedSource::from_value(value).unwrap();
        assert_eq!(source.courses().len(), 4);

        let scoped = source
            .scoped(&PreFilter::new(Dimension::Domain, "ROBOTICS"))
            .unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(source.scoped(&PreFilter::new(Dimension::Track, "missing")).is_none());
    }

    #[test]
    fn test_keyed_source_dedups() {
        let course = json!({"id": "AI-7", "title": "NLP", "track": "Language", "domain": "Text"});
        let source = GroupedSource::from_value(json!({
            "tracks": {"Language": [course.clone()]},
            "domains": {"Text": [course]}
        }))
        .unwrap();
        assert_eq!(source.courses().len(), 1);
        assert_eq!(
            source
                .scoped(&PreFilter::new(Dimension::Track, "language"))
                .map(|c| c.len()),
            Some(1)
        );
        assert!(GroupedSource::from_value(json!([1])).is_err());
    }
}
