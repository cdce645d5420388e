//! Page slicing and the pagination control model

use serde::Serialize;

/// Default number of courses per page
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Largest number of page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// Number of pages needed for `count` items; 0 when there are none
#[must_use]
pub const fn total_pages(count: usize, size: usize) -> usize {
    if size == 0 {
        0
    } else {
        count.div_ceil(size)
    }
}

/// Items `[(page-1)*size, page*size)` of `items`.
///
/// Pages are 1-based; page 0 and pages past the end yield an empty slice.
#[must_use]
pub fn page_slice<T>(items: &[T], size: usize, page: usize) -> &[T] {
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Whether `page` is a valid navigation target
#[must_use]
pub const fn is_valid_page(count: usize, size: usize, page: usize) -> bool {
    page >= 1 && page <= total_pages(count, size)
}

/// State of the pagination control for one listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControls {
    /// Current page (1-based)
    pub current: usize,
    /// Total pages
    pub total: usize,
    /// Whether "previous" is enabled
    pub has_prev: bool,
    /// Whether "next" is enabled
    pub has_next: bool,
    /// Page numbers to show, centred on the current page
    pub window: Vec<usize>,
}

impl PageControls {
    /// Build the control for `count` items at `page`
    #[must_use]
    pub fn new(count: usize, size: usize, page: usize) -> Self {
        let total = total_pages(count, size);
        let current = page.clamp(1, total.max(1));
        let half = PAGE_WINDOW / 2;
        let mut start = current.saturating_sub(half).max(1);
        let end = (start + PAGE_WINDOW - 1).min(total);
        if end + 1 - start < PAGE_WINDOW {
            start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        }
        let window = if total == 0 { Vec::new() } else { (start..=end).collect() };
        Self {
            current,
            total,
            has_prev: current > 1,
            has_next: current < total,
            window,
        }
    }

    /// Whether the control should be shown at all
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total > 1
    }
}
