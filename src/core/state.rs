//! Catalog and listing state.
//!
//! [`Catalog`] is the immutable, normalized and indexed collection.
//! [`ListingState`] holds every user-adjustable control over one catalog and
//! re-derives the filtered subset, page and statistics whenever a control
//! changes. Active-filter tags are read straight from the controls, so the
//! two can never disagree.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::filter::{self, Criteria, PreFilter, PriceRange, SearchMode};
use crate::core::indexer::{CatalogIndex, Dimension, Partition};
use crate::core::models::{Course, DurationBucket, Level, RawCourse, Status};
use crate::core::normalizer::{normalize_collection, DuplicateId};
use crate::core::pagination::{self, PageControls, DEFAULT_PAGE_SIZE};
use crate::core::render::ViewMode;
use crate::core::sort::{sort_indices, SortKey};
use crate::debug;

/// Category whose members make up the industrial view
pub const INDUSTRIAL_CATEGORY: &str = "Industrial";

/// Normalized, indexed, immutable course collection
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    index: CatalogIndex,
    duplicates: Vec<DuplicateId>,
}

impl Catalog {
    /// Index an already-normalized collection
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        let index = CatalogIndex::build(&courses);
        Self {
            courses,
            index,
            duplicates: Vec::new(),
        }
    }

    /// Normalize and index raw records
    #[must_use]
    pub fn from_raw(raws: Vec<RawCourse>) -> Self {
        let normalized = normalize_collection(raws);
        let mut catalog = Self::new(normalized.courses);
        catalog.duplicates = normalized.duplicates;
        catalog
    }

    /// Courses in source order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Load-time index
    #[must_use]
    pub const fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Id collisions resolved during normalization
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateId] {
        &self.duplicates
    }

    /// Look a course up by internal id
    #[must_use]
    pub fn get(&self, internal_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.internal_id == internal_id)
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// A user-adjustable filter control
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    /// Search box
    Search,
    /// Track select (single choice)
    Track,
    /// Domain checkboxes
    Domain,
    /// Level checkboxes
    Level,
    /// Status checkboxes
    Status,
    /// Tool checkboxes
    Tool,
    /// Duration bucket checkboxes
    Duration,
    /// Price range select
    Price,
    /// Minimum rating select
    Rating,
}

impl Facet {
    /// Tag label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Track => "Track",
            Self::Domain => "Domain",
            Self::Level => "Level",
            Self::Status => "Status",
            Self::Tool => "Tool",
            Self::Duration => "Duration",
            Self::Price => "Price",
            Self::Rating => "Rating",
        }
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" | "q" => Ok(Self::Search),
            "track" => Ok(Self::Track),
            "domain" => Ok(Self::Domain),
            "level" => Ok(Self::Level),
            "status" => Ok(Self::Status),
            "tool" => Ok(Self::Tool),
            "duration" => Ok(Self::Duration),
            "price" => Ok(Self::Price),
            "rating" | "min-rating" => Ok(Self::Rating),
            _ => Err(format!("Unknown filter: {s}")),
        }
    }
}

/// One removable active-filter tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FilterTag {
    /// Control the tag belongs to
    pub facet: Facet,
    /// Applied value
    pub value: String,
}

impl FilterTag {
    /// Create a tag
    #[must_use]
    pub fn new(facet: Facet, value: impl Into<String>) -> Self {
        Self {
            facet,
            value: value.into(),
        }
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.facet.label(), self.value)
    }
}

/// Aggregate statistics over the current subset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Courses in the subset
    pub total: usize,
    /// Courses with status `Active`
    pub active: usize,
    /// Courses at Advanced or Expert level
    pub advanced: usize,
    /// Courses with status `Upcoming`
    pub upcoming: usize,
    /// Mean rating over rated courses; `None` when none are rated
    pub avg_rating: Option<f64>,
    /// Sum of enrollments
    pub total_students: u64,
}

impl Stats {
    /// Compute statistics over the courses at `indices`
    #[must_use]
    pub fn compute(courses: &[Course], indices: &[usize]) -> Self {
        let mut stats = Self {
            total: indices.len(),
            ..Self::default()
        };
        let mut rating_sum = 0.0;
        let mut rated = 0u32;
        for course in indices.iter().map(|&i| &courses[i]) {
            match course.normalized_status {
                Status::Active => stats.active += 1,
                Status::Upcoming => stats.upcoming += 1,
                _ => {}
            }
            if course.level.is_advanced() {
                stats.advanced += 1;
            }
            if let Some(rating) = course.rating {
                rating_sum += rating;
                rated += 1;
            }
            stats.total_students = stats.total_students.saturating_add(course.students);
        }
        if rated > 0 {
            stats.avg_rating = Some(rating_sum / f64::from(rated));
        }
        stats
    }
}

/// Controls and derived view for one listing over a [`Catalog`]
#[derive(Debug, Clone)]
pub struct ListingState<'a> {
    catalog: &'a Catalog,
    pre_filter: Option<PreFilter>,
    criteria: Criteria,
    sort: SortKey,
    view: ViewMode,
    page: usize,
    page_size: usize,
    expanded: BTreeSet<String>,
    filtered: Vec<usize>,
    stats: Stats,
}

impl<'a> ListingState<'a> {
    /// Unfiltered listing over the whole catalog
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut state = Self {
            catalog,
            pre_filter: None,
            criteria: Criteria::default(),
            sort: SortKey::default(),
            view: ViewMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            expanded: BTreeSet::new(),
            filtered: Vec::new(),
            stats: Stats::default(),
        };
        state.refresh();
        state
    }

    /// Listing scoped by a navigation pre-filter
    #[must_use]
    pub fn scoped(catalog: &'a Catalog, pre_filter: Option<PreFilter>) -> Self {
        let mut state = Self::new(catalog);
        state.pre_filter = pre_filter;
        state.refresh();
        state
    }

    /// Set the page size (minimum 1) and return to page 1
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.page = 1;
        self
    }

    /// Re-run filter and sort, reset to page 1 and recompute statistics
    pub fn refresh(&mut self) {
        let courses = self.catalog.courses();
        let mut filtered = filter::filter(courses, &self.criteria, self.pre_filter.as_ref());
        let ranked = self.criteria.search_mode == SearchMode::Relevance
            && !self.criteria.search.trim().is_empty();
        if !ranked {
            sort_indices(courses, &mut filtered, self.sort);
        }
        self.stats = Stats::compute(courses, &filtered);
        self.filtered = filtered;
        self.page = 1;
        debug!(
            "Listing refreshed: {} of {} courses",
            self.filtered.len(),
            courses.len()
        );
    }

    /// Apply a filter value. Returns `Ok(false)` if it was already applied.
    ///
    /// Selecting a track replaces the current track. The filter re-runs only
    /// when something changed.
    ///
    /// # Errors
    /// Returns an error if the value cannot be parsed for the facet
    pub fn add_filter(&mut self, facet: Facet, value: &str) -> Result<bool, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Empty value for {} filter", facet.label()));
        }
        let c = &mut self.criteria;
        let changed = match facet {
            Facet::Search => {
                let changed = c.search != value;
                c.search = value.to_string();
                changed
            }
            Facet::Track => {
                let changed = c.track.as_deref() != Some(value);
                c.track = Some(value.to_string());
                changed
            }
            Facet::Domain => c.domains.insert(value.to_string()),
            Facet::Level => c.levels.insert(Level::parse(value).label().to_string()),
            Facet::Status => c.statuses.insert(value.to_string()),
            Facet::Tool => c.tools.insert(value.to_string()),
            Facet::Duration => {
                let bucket = DurationBucket::parse(value)
                    .ok_or_else(|| format!("Unknown duration bucket: {value}"))?;
                c.durations.insert(bucket)
            }
            Facet::Price => {
                let range =
                    PriceRange::parse(value).ok_or_else(|| format!("Invalid price range: {value}"))?;
                let changed = c.price_range != Some(range);
                c.price_range = Some(range);
                changed
            }
            Facet::Rating => {
                let threshold: f64 = value
                    .parse()
                    .map_err(|_| format!("Invalid rating threshold: {value}"))?;
                let changed = c.min_rating != Some(threshold);
                c.min_rating = Some(threshold);
                changed
            }
        };
        if changed {
            self.refresh();
        }
        Ok(changed)
    }

    /// Remove a tag and clear its control. Returns `false` if it was not applied.
    pub fn remove_filter(&mut self, tag: &FilterTag) -> bool {
        let c = &mut self.criteria;
        let value = tag.value.as_str();
        let removed = match tag.facet {
            Facet::Search => {
                let applied = !c.search.trim().is_empty() && c.search.trim() == value;
                if applied {
                    c.search.clear();
                }
                applied
            }
            Facet::Track => {
                let applied = c.track.as_deref() == Some(value);
                if applied {
                    c.track = None;
                }
                applied
            }
            Facet::Domain => c.domains.remove(value),
            Facet::Level => c.levels.remove(Level::parse(value).label()),
            Facet::Status => c.statuses.remove(value),
            Facet::Tool => c.tools.remove(value),
            Facet::Duration => {
                DurationBucket::parse(value).is_some_and(|b| c.durations.remove(&b))
            }
            Facet::Price => {
                let applied = c.price_range.is_some_and(|r| r.to_string() == value);
                if applied {
                    c.price_range = None;
                }
                applied
            }
            Facet::Rating => {
                let applied = c.min_rating.is_some_and(|r| r.to_string() == value);
                if applied {
                    c.min_rating = None;
                }
                applied
            }
        };
        if removed {
            self.refresh();
        }
        removed
    }

    /// Reset every control. The pre-filter stays in force.
    pub fn clear_filters(&mut self) {
        let search_mode = self.criteria.search_mode;
        self.criteria = Criteria {
            search_mode,
            ..Criteria::default()
        };
        self.refresh();
    }

    /// Replace the search text (blank clears it)
    pub fn set_search(&mut self, text: &str) {
        self.criteria.search = text.trim().to_string();
        self.refresh();
    }

    /// Switch between word matching and relevance ranking
    pub fn set_search_mode(&mut self, mode: SearchMode) {
        if self.criteria.search_mode != mode {
            self.criteria.search_mode = mode;
            self.refresh();
        }
    }

    /// Change the sort key
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
        self.refresh();
    }

    /// Switch view; the page and its contents are unchanged
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Move to `page`. Out-of-range requests are ignored and return `false`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if !pagination::is_valid_page(self.filtered.len(), self.page_size, page) {
            return false;
        }
        self.page = page;
        true
    }

    /// Move to the next page, if any
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    /// Move to the previous page, if any
    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    /// Expand or collapse a group in the grouped views. Returns the new state.
    pub fn toggle_group(&mut self, key: &str) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        }
    }

    /// Whether a group is expanded
    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Active-filter tags derived from the controls
    #[must_use]
    pub fn active_filters(&self) -> Vec<FilterTag> {
        let c = &self.criteria;
        let mut tags = Vec::new();
        if !c.search.trim().is_empty() {
            tags.push(FilterTag::new(Facet::Search, c.search.trim()));
        }
        if let Some(track) = &c.track {
            tags.push(FilterTag::new(Facet::Track, track));
        }
        tags.extend(c.domains.iter().map(|v| FilterTag::new(Facet::Domain, v)));
        tags.extend(c.levels.iter().map(|v| FilterTag::new(Facet::Level, v)));
        tags.extend(c.statuses.iter().map(|v| FilterTag::new(Facet::Status, v)));
        tags.extend(c.tools.iter().map(|v| FilterTag::new(Facet::Tool, v)));
        tags.extend(
            c.durations
                .iter()
                .map(|b| FilterTag::new(Facet::Duration, b.key())),
        );
        if let Some(range) = c.price_range {
            tags.push(FilterTag::new(Facet::Price, range.to_string()));
        }
        if let Some(rating) = c.min_rating {
            tags.push(FilterTag::new(Facet::Rating, rating.to_string()));
        }
        tags
    }

    /// Indices of the courses on the current page
    #[must_use]
    pub fn page_indices(&self) -> &[usize] {
        pagination::page_slice(&self.filtered, self.page_size, self.page)
    }

    /// Courses on the current page
    #[must_use]
    pub fn page_courses(&self) -> Vec<&'a Course> {
        let courses = self.catalog.courses();
        self.page_indices().iter().map(|&i| &courses[i]).collect()
    }

    /// Pagination control model for the current page
    #[must_use]
    pub fn page_controls(&self) -> PageControls {
        PageControls::new(self.filtered.len(), self.page_size, self.page)
    }

    /// Grouped partition of the current subset for a grouped view.
    ///
    /// Uses the load-time partition restricted to the subset, so buckets
    /// keep their first-seen order.
    #[must_use]
    pub fn groups(&self, dimension: Dimension) -> Partition {
        let keep: HashSet<usize> = self.filtered.iter().copied().collect();
        self.catalog.index().partition(dimension).restrict(&keep)
    }

    /// Industrial courses of the current subset, grouped by track
    #[must_use]
    pub fn industrial_groups(&self) -> Partition {
        let courses = self.catalog.courses();
        let mut members: Vec<usize> = self
            .filtered
            .iter()
            .copied()
            .filter(|&i| Dimension::Category.bucket_of(&courses[i]) == INDUSTRIAL_CATEGORY)
            .collect();
        members.sort_unstable();
        Partition::build_subset(Dimension::Track, courses, members)
    }

    /// The catalog being listed
    #[must_use]
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Current controls
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Navigation pre-filter, if any
    #[must_use]
    pub const fn pre_filter(&self) -> Option<&PreFilter> {
        self.pre_filter.as_ref()
    }

    /// Filtered and sorted indices
    #[must_use]
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Statistics over the filtered subset
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Current page (1-based)
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Courses per page
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current sort key
    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Current view
    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// Serializable snapshot of what the presentation layer shows
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot<'a> {
        let controls = self.page_controls();
        ListingSnapshot {
            view: self.view.to_string(),
            sort: self.sort.name(),
            page: self.page,
            total_pages: controls.total,
            page_size: self.page_size,
            pre_filter: self.pre_filter.clone(),
            active_filters: self.active_filters(),
            stats: self.stats.clone(),
            courses: self.page_courses(),
        }
    }
}

/// JSON-friendly view of a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot<'a> {
    /// View mode name
    pub view: String,
    /// Sort key name
    pub sort: &'static str,
    /// Current page
    pub page: usize,
    /// Total pages
    pub total_pages: usize,
    /// Courses per page
    pub page_size: usize,
    /// Navigation pre-filter
    pub pre_filter: Option<PreFilter>,
    /// Removable tags
    pub active_filters: Vec<FilterTag>,
    /// Subset statistics
    pub stats: Stats,
    /// Courses on the current page
    pub courses: Vec<&'a Course>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut courses = Vec::new();
        for i in 0..30 {
            let mut c = Course::new(&format!("AI-{i}"), &format!("Course {i:02}"));
            c.track = Some(if i % 3 == 0 { "Robotics" } else { "Vision" }.to_string());
            c.weeks = if i % 2 == 0 { 1 } else { 6 };
            c.students = i;
            c.level = if i % 5 == 0 { Level::Expert } else { Level::Beginner };
            c.normalized_status = if i % 4 == 0 { Status::Active } else { Status::Upcoming };
            if i % 10 == 0 {
                c.rating = Some(4.0);
            }
            courses.push(c);
        }
        Catalog::new(courses)
    }

    #[test]
    fn test_level_filter_ignores_case() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        state.add_filter(Facet::Level, "expert").unwrap();
        assert_eq!(state.filtered().len(), 6);
        assert_eq!(state.add_filter(Facet::Level, "EXPERT"), Ok(false));
        assert_eq!(state.active_filters()[0].value, "Expert");

        assert!(state.remove_filter(&FilterTag::new(Facet::Level, "expert")));
        assert_eq!(state.filtered().len(), 30);
    }

    #[test]
    fn test_add_filter_idempotent() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        assert_eq!(state.add_filter(Facet::Domain, "NLP"), Ok(true));
        assert_eq!(state.add_filter(Facet::Domain, "NLP"), Ok(false));
        assert_eq!(state.active_filters().len(), 1);
    }

    #[test]
    fn test_track_replaces_previous_track() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        state.add_filter(Facet::Track, "Robotics").unwrap();
        state.add_filter(Facet::Track, "Vision").unwrap();
        assert_eq!(
            state.active_filters(),
            vec![FilterTag::new(Facet::Track, "Vision")]
        );
        assert_eq!(state.filtered().len(), 20);
    }

    #[test]
    fn test_remove_filter_clears_control_and_reruns() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        state.add_filter(Facet::Duration, "0-2").unwrap();
        assert_eq!(state.filtered().len(), 15);
        assert!(state.remove_filter(&FilterTag::new(Facet::Duration, "0-2")));
        assert!(state.criteria().durations.is_empty());
        assert_eq!(state.filtered().len(), 30);
        assert!(!state.remove_filter(&FilterTag::new(Facet::Duration, "0-2")));
    }

    #[test]
    fn test_clear_keeps_pre_filter() {
        let catalog = catalog();
        let pre = PreFilter::new(Dimension::Track, "robotics");
        let mut state = ListingState::scoped(&catalog, Some(pre));
        state.add_filter(Facet::Duration, "0-2").unwrap();
        state.clear_filters();
        assert!(state.active_filters().is_empty());
        assert_eq!(state.filtered().len(), 10);
        assert!(state
            .filtered()
            .iter()
            .all(|&i| catalog.courses()[i].track.as_deref() == Some("Robotics")));
    }

    #[test]
    fn test_out_of_range_page_rejected() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        assert!(state.go_to_page(3));
        assert!(!state.go_to_page(4));
        assert!(!state.go_to_page(0));
        assert_eq!(state.page(), 3);
        assert_eq!(state.page_indices().len(), 6);
        assert!(!state.next_page());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        assert!(state.go_to_page(2));
        state.set_sort(SortKey::Title);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_view_switch_keeps_page_contents() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        state.go_to_page(2);
        let before = state.page_indices().to_vec();
        state.set_view(ViewMode::List);
        assert_eq!(state.page_indices(), before.as_slice());
    }

    #[test]
    fn test_stats_over_subset() {
        let catalog = catalog();
        let state = ListingState::new(&catalog);
        let stats = state.stats();
        assert_eq!(stats.total, 30);
        assert_eq!(stats.active, 8);
        assert_eq!(stats.upcoming, 22);
        assert_eq!(stats.advanced, 6);
        assert_eq!(stats.avg_rating, Some(4.0));
        assert_eq!(stats.total_students, (0..30).sum::<u64>());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        assert!(state.add_filter(Facet::Duration, "3-4").is_err());
        assert!(state.add_filter(Facet::Price, "cheap").is_err());
        assert!(state.add_filter(Facet::Rating, "five").is_err());
        assert!(state.add_filter(Facet::Tool, "  ").is_err());
    }

    #[test]
    fn test_grouped_view_follows_subset() {
        let catalog = catalog();
        let mut state = ListingState::new(&catalog);
        assert_eq!(state.groups(Dimension::Track).len(), 2);
        state.add_filter(Facet::Track, "Robotics").unwrap();
        let groups = state.groups(Dimension::Track);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.groups()[0].key, "Robotics");
        assert!(state.toggle_group("Robotics"));
        assert!(state.is_expanded("Robotics"));
        assert!(!state.toggle_group("Robotics"));
    }
}
