//! Sort engine. Every sort is stable.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::models::Course;

/// Sort keys offered by the sort control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Title, case-insensitive
    Title,
    /// Level ordinal ascending
    Level,
    /// Week count ascending
    Duration,
    /// Week count descending
    DurationDesc,
    /// Normalized status label
    Status,
    /// Students descending
    #[default]
    Popular,
    /// Rating descending, unrated last
    Rating,
    /// Minimum price ascending, unpriced last
    PriceAsc,
    /// Minimum price descending, unpriced first
    PriceDesc,
    /// Numeric id suffix descending
    Newest,
}

impl SortKey {
    /// All keys in menu order
    pub const ALL: [Self; 10] = [
        Self::Popular,
        Self::Rating,
        Self::Newest,
        Self::Title,
        Self::Level,
        Self::Duration,
        Self::DurationDesc,
        Self::Status,
        Self::PriceAsc,
        Self::PriceDesc,
    ];

    /// Key name as accepted on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Level => "level",
            Self::Duration => "duration",
            Self::DurationDesc => "durationDesc",
            Self::Status => "status",
            Self::Popular => "popular",
            Self::Rating => "rating",
            Self::PriceAsc => "priceAsc",
            Self::PriceDesc => "priceDesc",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown sort key '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Numeric suffix after the last `-` of the raw id, e.g. `AI-12` → 12
#[must_use]
pub fn id_suffix(course: &Course) -> Option<u64> {
    course
        .id
        .as_deref()
        .and_then(|id| id.rsplit_once('-'))
        .and_then(|(_, n)| n.trim().parse().ok())
}

/// Put `None` after every `Some`, comparing `Some` values with `cmp`
fn nones_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two courses under `key`
#[must_use]
pub fn compare(a: &Course, b: &Course, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortKey::Level => a.level.ordinal().cmp(&b.level.ordinal()),
        SortKey::Duration => a.weeks.cmp(&b.weeks),
        SortKey::DurationDesc => b.weeks.cmp(&a.weeks),
        SortKey::Status => a
            .normalized_status
            .label()
            .cmp(b.normalized_status.label()),
        SortKey::Popular => b.students.cmp(&a.students),
        SortKey::Rating => nones_last(a.rating, b.rating, |x, y| y.total_cmp(&x)),
        SortKey::PriceAsc => nones_last(a.min_price(), b.min_price(), |x, y| x.total_cmp(&y)),
        SortKey::PriceDesc => {
            nones_last(b.min_price(), a.min_price(), |x, y| x.total_cmp(&y))
        }
        SortKey::Newest => nones_last(id_suffix(a), id_suffix(b), |x, y| y.cmp(&x)),
    }
}

/// Stable-sort course indices in place
pub fn sort_indices(courses: &[Course], indices: &mut [usize], key: SortKey) {
    indices.sort_by(|&a, &b| compare(&courses[a], &courses[b], key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Level, PriceTier, Pricing};

    fn priced(id: &str, inr: Option<f64>) -> Course {
        let mut c = Course::new(id, id);
        c.pricing = inr.map(|inr| Pricing {
            lms: Some(PriceTier::new(0.0, inr)),
            ..Pricing::default()
        });
        c
    }

    fn order(courses: &[Course], key: SortKey) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..courses.len()).collect();
        sort_indices(courses, &mut idx, key);
        idx
    }

    #[test]
    fn test_price_unpriced_placement() {
        let courses = vec![priced("a", None), priced("b", Some(500.0)), priced("c", Some(100.0))];
        assert_eq!(order(&courses, SortKey::PriceAsc), vec![2, 1, 0]);
        assert_eq!(order(&courses, SortKey::PriceDesc), vec![0, 1, 2]);
    }

    #[test]
    fn test_rating_unrated_last() {
        let mut a = Course::new("a", "a");
        a.rating = Some(3.0);
        let b = Course::new("b", "b");
        let mut c = Course::new("c", "c");
        c.rating = Some(4.5);
        assert_eq!(order(&[a, b, c], SortKey::Rating), vec![2, 0, 1]);
    }

    #[test]
    fn test_level_unknown_first() {
        let mut a = Course::new("a", "a");
        a.level = Level::Expert;
        let b = Course::new("b", "b");
        let mut c = Course::new("c", "c");
        c.level = Level::Beginner;
        assert_eq!(order(&[a, b, c], SortKey::Level), vec![1, 2, 0]);
    }

    #[test]
    fn test_title_case_insensitive_stable() {
        let courses = vec![
            Course::new("1", "beta"),
            Course::new("2", "Alpha"),
            Course::new("3", "alpha"),
        ];
        assert_eq!(order(&courses, SortKey::Title), vec![1, 2, 0]);
    }

    #[test]
    fn test_newest_by_id_suffix() {
        let mut courses = vec![
            Course::new("AI-2", "x"),
            Course::new("AI-10", "y"),
            Course::new("legacy", "z"),
        ];
        courses[2].id = Some("legacy".into());
        assert_eq!(order(&courses, SortKey::Newest), vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_idempotent() {
        let mut courses: Vec<Course> = (0..6).map(|i| Course::new(&format!("AI-{i}"), "t")).collect();
        for (i, c) in courses.iter_mut().enumerate() {
            c.students = (i as u64 * 7) % 4;
        }
        for key in SortKey::ALL {
            let once = order(&courses, key);
            let mut twice = once.clone();
            sort_indices(&courses, &mut twice, key);
            assert_eq!(once, twice, "{key} not idempotent");
        }
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("priceAsc".parse::<SortKey>(), Ok(SortKey::PriceAsc));
        assert_eq!("POPULAR".parse::<SortKey>(), Ok(SortKey::Popular));
        assert!("cheapest".parse::<SortKey>().is_err());
    }
}
