//! Normalization boundary: raw records in, typed courses out.
//!
//! Canonical status facets, collision-free internal ids and field defaults
//! are all applied here, once, at load time.

use std::collections::{HashMap, HashSet};

use crate::core::models::{parse_weeks, split_tools, Course, Level, RawCourse, Status};
use crate::warn;

/// Map a raw status string to its canonical facet.
///
/// Checked in order: blank → `Upcoming`; green-circle prefix or
/// `active`/`existing`/`high` → `Active`; 🆕/🟡 prefix or
/// `upcoming`/`new`/`coming` → `Upcoming`; `medium` → `Medium`; `low` →
/// `Low`; anything else keeps its trimmed text with the first letter
/// upper-cased.
#[must_use]
pub fn normalize_status(raw: Option<&str>) -> Status {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Status::Upcoming;
    };
    let lower = s.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if s.starts_with('🟢') || contains_any(&["active", "existing", "high"]) {
        Status::Active
    } else if s.starts_with('🆕')
        || s.starts_with('🟡')
        || contains_any(&["upcoming", "new", "coming"])
    {
        Status::Upcoming
    } else if lower.contains("medium") {
        Status::Medium
    } else if lower.contains("low") {
        Status::Low
    } else {
        Status::Other(capitalize_first(s))
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Fold a facet value for comparison with navigation parameters: curly
/// quotes become straight quotes, then lower-case and trim.
#[must_use]
pub fn fold_key(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// A raw id that appeared more than once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    /// The colliding raw id
    pub raw_id: String,
    /// Internal id given to this occurrence
    pub internal_id: String,
    /// Position of the record in the collection
    pub position: usize,
}

/// Assign an internal id to each record from its raw id.
///
/// The first occurrence of a raw id keeps it verbatim. Later occurrences get
/// `<id>-<occurrence>`, and records without an id get `auto-<n>`. Generated
/// ids never reuse a value that some record carries as its own first-seen
/// raw id, so the result is unique for any input.
#[must_use]
pub fn assign_internal_ids(raw_ids: &[Option<String>]) -> (Vec<String>, Vec<DuplicateId>) {
    let mut used: HashSet<String> = raw_ids.iter().flatten().cloned().collect();
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    let mut next_auto = 1usize;
    let mut ids = Vec::with_capacity(raw_ids.len());
    let mut duplicates = Vec::new();

    for (position, raw) in raw_ids.iter().enumerate() {
        let Some(raw) = raw else {
            let id = loop {
                let candidate = format!("auto-{next_auto}");
                next_auto += 1;
                if used.insert(candidate.clone()) {
                    break candidate;
                }
            };
            ids.push(id);
            continue;
        };

        let count = occurrences.entry(raw.as_str()).or_insert(0);
        *count += 1;
        if *count == 1 {
            ids.push(raw.clone());
            continue;
        }

        let id = loop {
            let candidate = format!("{raw}-{count}");
            if used.insert(candidate.clone()) {
                break candidate;
            }
            *count += 1;
        };
        warn!("Duplicate course id detected: {raw} (assigned internal id {id})");
        duplicates.push(DuplicateId {
            raw_id: raw.clone(),
            internal_id: id.clone(),
            position,
        });
        ids.push(id);
    }

    (ids, duplicates)
}

/// Result of normalizing a raw collection
#[derive(Debug, Clone, Default)]
pub struct NormalizedCollection {
    /// Courses in source order
    pub courses: Vec<Course>,
    /// Every id collision that was resolved
    pub duplicates: Vec<DuplicateId>,
}

/// Normalize a raw collection into typed courses.
#[must_use]
pub fn normalize_collection(raws: Vec<RawCourse>) -> NormalizedCollection {
    let raw_ids: Vec<Option<String>> = raws.iter().map(RawCourse::raw_id).collect();
    let (internal_ids, duplicates) = assign_internal_ids(&raw_ids);

    let courses = raws
        .into_iter()
        .zip(raw_ids)
        .zip(internal_ids)
        .map(|((raw, id), internal_id)| build_course(raw, id, internal_id))
        .collect();

    NormalizedCollection {
        courses,
        duplicates,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn build_course(raw: RawCourse, id: Option<String>, internal_id: String) -> Course {
    let tool = raw.tool_text();
    let rating = raw.effective_rating();
    let status = raw.status_text().unwrap_or_default().to_string();
    let duration = raw.duration.unwrap_or_default();
    let students = raw
        .students
        .filter(|s| s.is_finite() && *s > 0.0)
        .map_or(0, |s| s.round() as u64);

    Course {
        id,
        internal_id,
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        level: raw
            .level
            .map_or_else(|| Level::Other(String::new()), |l| Level::parse(&l)),
        weeks: parse_weeks(&duration),
        duration,
        track: non_blank(raw.track),
        domain: non_blank(raw.domain),
        category: non_blank(raw.category),
        tools: split_tools(&tool),
        tool,
        normalized_status: normalize_status(Some(&status)),
        status,
        rating,
        students,
        pricing: raw.pricing,
        enrollment_url: raw.enrollment_url,
        main_page_url: raw.main_page_url,
    }
}
