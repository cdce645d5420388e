//! Browse command handler

use std::time::Duration;

use course_catalog::config::Config;
use course_catalog::core::filter::{PreFilter, SearchMode};
use course_catalog::core::render::text::render_listing;
use course_catalog::core::render::ViewMode;
use course_catalog::core::sort::SortKey;
use course_catalog::core::state::{Facet, ListingState};
use course_catalog::{debug, info};

use super::{fail, interactive, load_catalog};
use crate::args::BrowseArgs;

/// Run the browse command
pub fn run(args: &BrowseArgs, config: &Config) {
    let scope = args.query.as_deref().and_then(PreFilter::from_query);
    if let (Some(query), None) = (&args.query, &scope) {
        info!("Query '{query}' has no usable scope; listing everything");
    }

    let catalog = load_catalog(config, scope.as_ref()).unwrap_or_else(|e| fail(e));
    for dup in catalog.duplicates() {
        debug!("Duplicate id {} stored as {}", dup.raw_id, dup.internal_id);
    }

    let mut state = ListingState::scoped(&catalog, scope).with_page_size(config.listing.page_size);
    if let Err(e) = apply_args(&mut state, args, config) {
        fail(e);
    }

    if args.interactive {
        let quiet = Duration::from_millis(config.listing.search_debounce_ms);
        interactive::run(&mut state, quiet);
        return;
    }

    if args.json {
        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(format!("Failed to serialize listing: {e}")),
        }
    } else {
        print!("{}", render_listing(&state));
    }
}

/// Apply command-line controls to a fresh listing
pub fn apply_args(state: &mut ListingState, args: &BrowseArgs, config: &Config) -> Result<(), String> {
    let view = match &args.view {
        Some(v) => v.parse::<ViewMode>()?,
        None => config.default_view(),
    };
    state.set_view(view);

    let sort = match &args.sort {
        Some(s) => s.parse::<SortKey>()?,
        None => config.default_sort(),
    };
    state.set_sort(sort);

    if args.relevance {
        state.set_search_mode(SearchMode::Relevance);
    }
    if let Some(search) = args.search.as_deref().filter(|s| !s.trim().is_empty()) {
        state.set_search(search);
    }
    if let Some(track) = &args.track {
        state.add_filter(Facet::Track, track)?;
    }

    let multi = [
        (Facet::Domain, &args.domain),
        (Facet::Level, &args.level),
        (Facet::Status, &args.status),
        (Facet::Tool, &args.tool),
        (Facet::Duration, &args.duration),
    ];
    for (facet, values) in multi {
        for value in values {
            state.add_filter(facet, value)?;
        }
    }
    if let Some(range) = args.price_range() {
        state.add_filter(Facet::Price, &range)?;
    }
    if let Some(rating) = args.min_rating {
        state.add_filter(Facet::Rating, &rating.to_string())?;
    }

    for group in &args.expand {
        if !state.is_expanded(group) {
            state.toggle_group(group);
        }
    }
    if let Some(page) = args.page {
        if !state.go_to_page(page) {
            info!("Page {page} is out of range; showing page {}", state.page());
        }
    }
    Ok(())
}
