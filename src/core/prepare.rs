//! Batch data preparation over the raw data file.
//!
//! Works on raw JSON records so fields the catalog does not model survive
//! the rewrite untouched.

use serde::Serialize;
use serde_json::{json, Value};

use crate::core::models::Pricing;
use crate::warn;

/// Which preparation passes to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Assign sequential ids and enrollment urls
    pub ids: bool,
    /// Set `mainPageUrl` from the title slug
    pub urls: bool,
    /// Derive pricing tiers from the duration
    pub pricing: bool,
    /// With `ids`, also set every status to `Active`
    pub reset_status: bool,
}

/// Naming settings used by the passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareSettings {
    /// Id prefix, e.g. `AI` for `AI-1`
    pub id_prefix: String,
    /// Enrollment url prefix; the id is appended
    pub enrollment_base: String,
    /// Course page url prefix; the slug and `/` are appended
    pub main_page_base: String,
}

/// Records touched by each pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    /// Records given new ids
    pub ids: usize,
    /// Records given new page urls
    pub urls: usize,
    /// Records given pricing
    pub pricing: usize,
    /// Entries skipped because they are not objects
    pub skipped: usize,
}

/// URL slug of a title.
///
/// Lower-case, drop everything except ASCII word characters, whitespace and
/// `-`, turn whitespace runs into `-`, collapse repeated `-` and trim `-`
/// from both ends.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let mapped = if ch.is_whitespace() {
            '-'
        } else if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            ch
        } else {
            continue;
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }
    slug.trim_matches('-').to_string()
}

/// Week count for pricing: the first integer in the duration, or 1 when the
/// duration is missing or has no digits.
#[must_use]
pub fn duration_weeks(duration: Option<&str>) -> u32 {
    duration
        .filter(|d| d.chars().any(|c| c.is_ascii_digit()))
        .map_or(1, crate::core::models::parse_weeks)
}

fn for_each_object(records: &mut [Value], mut apply: impl FnMut(usize, &mut serde_json::Map<String, Value>)) -> usize {
    let mut skipped = 0;
    for (position, record) in records.iter_mut().enumerate() {
        if let Some(obj) = record.as_object_mut() {
            apply(position, obj);
        } else {
            warn!("Skipping entry {position}: not a JSON object");
            skipped += 1;
        }
    }
    skipped
}

/// Give every record a sequential `<prefix>-<n>` id (n from 1) and an
/// enrollment url ending in that id.
pub fn assign_ids(records: &mut [Value], settings: &PrepareSettings, reset_status: bool) -> usize {
    let mut count = 0;
    for_each_object(records, |position, obj| {
        let id = format!("{}-{}", settings.id_prefix, position + 1);
        obj.insert(
            "enrollmentUrl".into(),
            Value::String(format!("{}{id}", settings.enrollment_base)),
        );
        obj.insert("id".into(), Value::String(id));
        if reset_status {
            obj.insert("status".into(), Value::String("Active".into()));
        }
        count += 1;
    });
    count
}

/// Set `mainPageUrl` to `<base><slug(title)>/`
pub fn assign_urls(records: &mut [Value], settings: &PrepareSettings) -> usize {
    let mut count = 0;
    for_each_object(records, |_, obj| {
        let title = obj.get("title").and_then(Value::as_str).unwrap_or_default();
        let url = format!("{}{}/", settings.main_page_base, slugify(title));
        obj.insert("mainPageUrl".into(), Value::String(url));
        count += 1;
    });
    count
}

/// Replace `pricing` with tiers derived from the duration
pub fn assign_pricing(records: &mut [Value]) -> usize {
    let mut count = 0;
    for_each_object(records, |_, obj| {
        let weeks = duration_weeks(obj.get("duration").and_then(Value::as_str));
        obj.insert("pricing".into(), pricing_value(&Pricing::from_weeks(weeks)));
        count += 1;
    });
    count
}

fn pricing_value(pricing: &Pricing) -> Value {
    // serializing a plain struct of numbers cannot fail
    serde_json::to_value(pricing).unwrap_or_else(|_| json!({}))
}

/// Run the selected passes in order: ids, urls, pricing
pub fn prepare(records: &mut [Value], options: PrepareOptions, settings: &PrepareSettings) -> PrepareReport {
    let skipped = records.iter().filter(|r| !r.is_object()).count();
    let mut report = PrepareReport {
        skipped,
        ..PrepareReport::default()
    };
    if options.ids {
        report.ids = assign_ids(records, settings, options.reset_status);
    }
    if options.urls {
        report.urls = assign_urls(records, settings);
    }
    if options.pricing {
        report.pricing = assign_pricing(records);
    }
    report
}
