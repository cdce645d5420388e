//! Groups and facets command handlers

use std::fmt::Write as _;

use course_catalog::config::Config;
use course_catalog::core::grouped::{GroupedCatalog, TrackGroup};
use course_catalog::core::indexer::CatalogIndex;
use course_catalog::core::loader::read_json_array;
use course_catalog::info;
use serde_json::{json, Value};

use super::{fail, load_catalog};

/// Grouped catalog built from the configured data file, or from whatever
/// source the loader falls back to when that file is unavailable
fn grouped_catalog(config: &Config) -> GroupedCatalog {
    let records = match read_json_array(&config.admin_paths().data_file) {
        Ok(records) if !records.is_empty() => records,
        Ok(_) | Err(_) => {
            info!("Data file unavailable; grouping the loaded collection");
            let catalog = load_catalog(config, None).unwrap_or_else(|e| fail(e));
            catalog
                .courses()
                .iter()
                .filter_map(|c| serde_json::to_value(c).ok())
                .collect()
        }
    };
    GroupedCatalog::build(&records, &config.industry_tracks())
}

fn write_tracks(out: &mut String, heading: &str, tracks: &[TrackGroup]) {
    let _ = writeln!(out, "{heading} ({})", tracks.len());
    for track in tracks {
        let _ = writeln!(out, "  {}  ({} course(s))", track.track, track.course_count);
        for domain in &track.domains {
            let _ = writeln!(out, "    - {}: {}", domain.name, domain.course_count);
        }
    }
}

/// Print industry and regular tracks with their domains
pub fn run_groups(config: &Config, json: bool) {
    let grouped = grouped_catalog(config);
    if json {
        match serde_json::to_string_pretty(&grouped) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }
    let mut out = String::new();
    write_tracks(&mut out, "Industry tracks", &grouped.industry_tracks);
    out.push('\n');
    write_tracks(&mut out, "Regular tracks", &grouped.regular_tracks);
    let _ = writeln!(out, "\n{} courses", grouped.total_courses);
    print!("{out}");
}

/// Print facet counts and the option lists for the filter controls
pub fn run_facets(config: &Config, json: bool) {
    let catalog = load_catalog(config, None).unwrap_or_else(|e| fail(e));
    let index: &CatalogIndex = catalog.index();
    let facets = &index.facets;
    let options = &index.options;

    if json {
        let counts = |pairs: Vec<(String, usize)>| -> Value {
            pairs.into_iter().map(|(k, n)| json!({"value": k, "count": n})).collect()
        };
        let body = json!({
            "tools": counts(facets.tools.clone()),
            "levels": counts(facets.levels.clone()),
            "durations": counts(
                facets.durations.iter().map(|(b, n)| (b.to_string(), *n)).collect()
            ),
            "options": {
                "tracks": options.tracks,
                "domains": options.domains,
                "tools": options.tools,
                "statuses": options.statuses,
            },
        });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    let mut out = String::new();
    let _ = writeln!(out, "Levels:");
    for (level, n) in &facets.levels {
        let label = if level.is_empty() { "(none)" } else { level };
        let _ = writeln!(out, "  {label:<16} {n}");
    }
    let _ = writeln!(out, "Durations (weeks):");
    for (bucket, n) in &facets.durations {
        let _ = writeln!(out, "  {:<16} {n}", bucket.to_string());
    }
    let _ = writeln!(out, "Tools:");
    for (tool, n) in &facets.tools {
        let _ = writeln!(out, "  {tool:<24} {n}");
    }
    let _ = writeln!(out, "Tracks: {}", options.tracks.join(", "));
    let _ = writeln!(out, "Domains: {}", options.domains.join(", "));
    let _ = writeln!(out, "Statuses: {}", options.statuses.join(", "));
    print!("{out}");
}
