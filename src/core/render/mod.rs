//! View rendering for course listings
//!
//! Text views for the terminal (grid, list, grouped, industrial) and the
//! static HTML detail page written by the admin tool.

pub mod page;
pub mod text;

pub use page::{DetailPage, FaqEntry};
pub use text::{GridView, GroupedView, IndustrialView, ListView};

use std::fmt;
use std::str::FromStr;

use crate::core::indexer::Dimension;
use crate::core::state::ListingState;

/// Listing layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Fixed-column cards
    #[default]
    Grid,
    /// Full-width rows
    List,
    /// Collapsible group summaries by a dimension
    Grouped(Dimension),
    /// Industrial category grouped by track
    Industrial,
}

impl ViewMode {
    /// Renderer for this view
    #[must_use]
    pub fn renderer(self) -> Box<dyn ViewRenderer> {
        match self {
            Self::Grid => Box::new(GridView::default()),
            Self::List => Box::new(ListView),
            Self::Grouped(dimension) => Box::new(GroupedView::new(dimension)),
            Self::Industrial => Box::new(IndustrialView),
        }
    }

    /// Whether the view shows the paginated flat listing
    #[must_use]
    pub const fn is_paginated(self) -> bool {
        matches!(self, Self::Grid | Self::List)
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" | "all" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            "track" | "tracks" => Ok(Self::Grouped(Dimension::Track)),
            "domain" | "domains" => Ok(Self::Grouped(Dimension::Domain)),
            "category" | "categories" => Ok(Self::Grouped(Dimension::Category)),
            "industrial" => Ok(Self::Industrial),
            _ => Err(format!("Unknown view: {s}")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::List => write!(f, "list"),
            Self::Grouped(dimension) => write!(f, "{dimension}"),
            Self::Industrial => write!(f, "industrial"),
        }
    }
}

/// A listing layout
pub trait ViewRenderer {
    /// Render the current listing state as text
    fn render(&self, state: &ListingState) -> String;
}

/// Star rating: full stars, a half star at .5 or more, empty stars to five.
/// Unrated courses show `New`.
#[must_use]
pub fn stars(rating: Option<f64>) -> String {
    let Some(rating) = rating else {
        return "New".to_string();
    };
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor();
    let half = rating - full >= 0.5;
    // bounded to 0..=5 by the clamp above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = full as usize;
    let empty = 5 - full - usize::from(half);
    format!(
        "{}{}{} {rating:.1}",
        "★".repeat(full),
        if half { "½" } else { "" },
        "☆".repeat(empty)
    )
}

/// Group digits in threes: `12345` → `12,345`
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Indian-style rupee amount rounded to whole rupees: `100000` → `₹1,00,000`
#[must_use]
pub fn format_inr(amount: f64) -> String {
    // display only; fractional rupees and negatives are not shown
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rupees = amount.max(0.0).round() as u64;
    let digits = rupees.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₹{grouped},{tail}")
}

/// Minimum-price label for a card
#[must_use]
pub fn price_label(min_price: Option<f64>) -> String {
    min_price.map_or_else(|| "N/A".to_string(), |p| format!("From {}", format_inr(p)))
}

/// Truncate to `width` characters, ending with `…` when cut
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(None), "New");
        assert_eq!(stars(Some(4.5)), "★★★★½ 4.5");
        assert_eq!(stars(Some(3.2)), "★★★☆☆ 3.2");
        assert_eq!(stars(Some(5.0)), "★★★★★ 5.0");
        assert_eq!(stars(Some(0.0)), "☆☆☆☆☆ 0.0");
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1499.0), "₹1,499");
        assert_eq!(format_inr(100_000.0), "₹1,00,000");
        assert_eq!(format_inr(12_345_678.0), "₹1,23,45,678");
        assert_eq!(price_label(None), "N/A");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(1234), "1,234");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_view_mode_round_trip_names() {
        for name in ["grid", "list", "track", "domain", "category", "industrial"] {
            let view: ViewMode = name.parse().unwrap();
            assert_eq!(view.to_string(), name);
        }
        assert!("carousel".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
