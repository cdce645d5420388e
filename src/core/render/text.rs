//! Terminal layouts

use std::fmt::Write;

use super::{group_thousands, price_label, stars, truncate, ViewRenderer};
use crate::core::indexer::{Dimension, Partition};
use crate::core::models::Course;
use crate::core::state::ListingState;

const CARD_WIDTH: usize = 34;
const DEFAULT_COLUMNS: usize = 3;

/// Fixed-column card grid
#[derive(Debug, Clone, Copy)]
pub struct GridView {
    columns: usize,
}

impl Default for GridView {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl GridView {
    /// Grid with `columns` cards per row (at least one)
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    fn card(course: &Course) -> Vec<String> {
        let level = match course.level.label() {
            "" => "All levels",
            label => label,
        };
        vec![
            truncate(&course.title, CARD_WIDTH),
            truncate(&course.description, CARD_WIDTH),
            truncate(&format!("{level} · {}", course.duration), CARD_WIDTH),
            truncate(
                &format!("{} · {} students", stars(course.rating), group_thousands(course.students)),
                CARD_WIDTH,
            ),
            truncate(
                &format!("{} · {}", course.normalized_status, price_label(course.min_price())),
                CARD_WIDTH,
            ),
        ]
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

impl ViewRenderer for GridView {
    fn render(&self, state: &ListingState) -> String {
        let courses = state.page_courses();
        let mut out = String::new();
        if courses.is_empty() {
            out.push_str("No courses match the current filters.\n");
            return out;
        }
        let border = format!("+{}", format!("{}+", "-".repeat(CARD_WIDTH + 2)).repeat(self.columns));
        for row in courses.chunks(self.columns) {
            let cards: Vec<Vec<String>> = row.iter().map(|c| Self::card(c)).collect();
            let _ = writeln!(out, "{border}");
            let height = cards.iter().map(Vec::len).max().unwrap_or(0);
            for line in 0..height {
                out.push('|');
                for col in 0..self.columns {
                    let text = cards
                        .get(col)
                        .and_then(|card| card.get(line))
                        .map_or("", String::as_str);
                    let _ = write!(out, " {} |", pad(text, CARD_WIDTH));
                }
                out.push('\n');
            }
        }
        let _ = writeln!(out, "{border}");
        out
    }
}

/// Full-width rows
#[derive(Debug, Clone, Copy, Default)]
pub struct ListView;

impl ViewRenderer for ListView {
    fn render(&self, state: &ListingState) -> String {
        let courses = state.page_courses();
        let mut out = String::new();
        if courses.is_empty() {
            out.push_str("No courses match the current filters.\n");
            return out;
        }
        for course in courses {
            let _ = writeln!(
                out,
                "{:<44} {:<12} {:<10} {:<12} {:>8}  {}",
                truncate(&course.title, 44),
                course.level.label(),
                truncate(&course.duration, 10),
                course.rating_label(),
                group_thousands(course.students),
                price_label(course.min_price()),
            );
            if !course.description.is_empty() {
                let _ = writeln!(out, "    {}", truncate(&course.description, 96));
            }
        }
        out
    }
}

fn member_line(course: &Course, other: Dimension) -> String {
    let context = other.bucket_of(course);
    let tool = if course.tool.is_empty() { "-" } else { course.tool.as_str() };
    format!(
        "    • {}  [{context} • {tool}]  {}",
        course.title, course.normalized_status
    )
}

fn render_partition(
    state: &ListingState,
    partition: &Partition,
    context: Dimension,
    noun: &str,
    always_expanded: bool,
) -> String {
    let courses = state.catalog().courses();
    let mut out = String::new();
    for group in partition.groups() {
        let expanded = always_expanded || state.is_expanded(&group.key);
        let marker = if expanded { '▾' } else { '▸' };
        let _ = writeln!(out, "{marker} {}  ({} {noun})", group.key, group.members.len());
        if expanded {
            for &i in &group.members {
                let _ = writeln!(out, "{}", member_line(&courses[i], context));
            }
        }
    }
    out
}

/// Collapsible group summaries; members are listed only for expanded groups
#[derive(Debug, Clone, Copy)]
pub struct GroupedView {
    dimension: Dimension,
}

impl GroupedView {
    /// Group by `dimension`
    #[must_use]
    pub const fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl ViewRenderer for GroupedView {
    fn render(&self, state: &ListingState) -> String {
        let partition = state.groups(self.dimension);
        if partition.is_empty() {
            return "No courses match the current filters.\n".to_string();
        }
        // members show the other classification as context
        let context = match self.dimension {
            Dimension::Track => Dimension::Domain,
            Dimension::Domain | Dimension::Category => Dimension::Track,
        };
        render_partition(state, &partition, context, "course(s)", false)
    }
}

/// Industrial category, grouped by track, always expanded
#[derive(Debug, Clone, Copy, Default)]
pub struct IndustrialView;

impl ViewRenderer for IndustrialView {
    fn render(&self, state: &ListingState) -> String {
        let partition = state.industrial_groups();
        if partition.is_empty() {
            return "No industrial courses available.\n".to_string();
        }
        render_partition(state, &partition, Dimension::Domain, "item(s)", true)
    }
}

/// Results line, statistics, active tags and page controls
#[must_use]
pub fn render_summary(state: &ListingState) -> String {
    let mut out = String::new();
    let total = state.filtered().len();
    if state.view().is_paginated() && total > 0 {
        let start = (state.page() - 1) * state.page_size() + 1;
        let end = start + state.page_indices().len() - 1;
        let _ = writeln!(out, "Showing {start}-{end} of {total} courses");
    } else {
        let _ = writeln!(out, "{total} courses");
    }

    let stats = state.stats();
    let avg = stats
        .avg_rating
        .map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}"));
    let _ = writeln!(
        out,
        "Total {} · Active {} · Advanced {} · Upcoming {} · Avg rating {avg} · Students {}",
        stats.total,
        stats.active,
        stats.advanced,
        stats.upcoming,
        group_thousands(stats.total_students)
    );

    if let Some(pre) = state.pre_filter() {
        let _ = writeln!(out, "Scope: {} = {}", pre.dimension, pre.value);
    }
    let tags = state.active_filters();
    if !tags.is_empty() {
        let rendered: Vec<String> = tags.iter().map(|t| format!("[{t} ×]")).collect();
        let _ = writeln!(out, "Filters: {}", rendered.join(" "));
    }
    out
}

/// Pagination bar, empty when there is a single page
#[must_use]
pub fn render_pagination(state: &ListingState) -> String {
    let controls = state.page_controls();
    if !state.view().is_paginated() || !controls.is_visible() {
        return String::new();
    }
    let mut parts = Vec::new();
    parts.push(if controls.has_prev { "«".to_string() } else { " ".to_string() });
    for p in &controls.window {
        if *p == controls.current {
            parts.push(format!("[{p}]"));
        } else {
            parts.push(p.to_string());
        }
    }
    parts.push(if controls.has_next { "»".to_string() } else { " ".to_string() });
    format!("{}  (page {} of {})\n", parts.join(" "), controls.current, controls.total)
}

/// Summary, body for the current view and pagination bar
#[must_use]
pub fn render_listing(state: &ListingState) -> String {
    let mut out = render_summary(state);
    out.push('\n');
    out.push_str(&state.view().renderer().render(state));
    out.push_str(&render_pagination(state));
    out
}
