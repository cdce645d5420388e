//! CLI command handlers for the course catalog.
//!
//! Each command is implemented in its own submodule.

pub mod admin;
pub mod browse;
pub mod config;
pub mod groups;
pub mod interactive;
pub mod prepare;

use std::path::PathBuf;

use course_catalog::config::Config;
use course_catalog::core::filter::PreFilter;
use course_catalog::core::loader::{default_sources, load_first, load_scoped};
use course_catalog::core::state::Catalog;
use course_catalog::core::CatalogError;
use course_catalog::{verbose, warn};

/// Load and index the collection from the configured sources.
///
/// With a scope, the grouped file is tried first for just that scope.
pub fn load_catalog(config: &Config, scope: Option<&PreFilter>) -> Result<Catalog, CatalogError> {
    let grouped = (!config.paths.grouped_file.is_empty())
        .then(|| PathBuf::from(&config.paths.grouped_file));
    let sources = default_sources(
        &config.candidate_paths(),
        grouped.as_deref(),
        config.data.embedded_fallback,
    );
    let loaded = match scope {
        Some(scope) => load_scoped(grouped.as_deref(), scope, &sources)?,
        None => load_first(&sources)?,
    };
    verbose!("Loaded {} courses from {}", loaded.records.len(), loaded.origin);
    if loaded.skipped > 0 {
        warn!("Skipped {} malformed entries from {}", loaded.skipped, loaded.origin);
    }
    Ok(Catalog::from_raw(loaded.records))
}

/// Print an error and exit non-zero
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("✗ {message}");
    std::process::exit(1);
}
