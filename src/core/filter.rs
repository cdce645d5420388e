//! Filter engine.
//!
//! `filter` is pure: the same collection and criteria always produce the
//! same index list. The pre-filter narrows the base collection before any
//! other predicate runs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::indexer::Dimension;
use crate::core::models::{Course, DurationBucket};
use crate::core::normalizer::fold_key;

/// How the search text is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every word must appear in the title, description or tools
    #[default]
    AllWords,
    /// Weighted score per field; positive scores only, best first
    Relevance,
}

/// Inclusive price bounds in INR; `max = None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound, if any
    pub max: Option<f64>,
}

impl PriceRange {
    /// Preset ranges offered by the price control
    pub const PRESETS: [Self; 4] = [
        Self::new(0.0, Some(10_000.0)),
        Self::new(10_000.0, Some(25_000.0)),
        Self::new(25_000.0, Some(50_000.0)),
        Self::new(50_000.0, None),
    ];

    /// Create a range
    #[must_use]
    pub const fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Parse a preset key such as `0-10000` or `50000+`
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if let Some(min) = key.strip_suffix('+') {
            return min.trim().parse().ok().map(|min| Self::new(min, None));
        }
        let (min, max) = key.split_once('-')?;
        let min: f64 = min.trim().parse().ok()?;
        let max: f64 = max.trim().parse().ok()?;
        (min <= max).then_some(Self::new(min, Some(max)))
    }

    /// Whether a price lies in the range (bounds inclusive)
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Navigation-context constraint; never removable by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreFilter {
    /// Dimension being constrained
    pub dimension: Dimension,
    /// Folded value to compare against
    pub value: String,
}

impl PreFilter {
    /// Create a pre-filter; the value is folded for comparison
    #[must_use]
    pub fn new(dimension: Dimension, value: &str) -> Self {
        Self {
            dimension,
            value: fold_key(value),
        }
    }

    /// Whether the course belongs to the scoped listing
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        self.dimension
            .value_of(course)
            .is_some_and(|v| fold_key(v) == self.value)
    }

    /// Read the pre-filter from a listing query string.
    ///
    /// Accepts `mode=<dimension>&value=<v>`, then `track=<v>`, then
    /// `domain=<v>`. A leading `?` is ignored. Returns `None` when none of
    /// them carries a non-blank value.
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        let pairs: Vec<(String, String)> = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(k), percent_decode(v))
            })
            .collect();
        let param = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.trim().is_empty())
        };

        if let (Some(mode), Some(value)) = (param("mode"), param("value")) {
            if let Some(dimension) = Dimension::parse(mode) {
                return Some(Self::new(dimension, value));
            }
        }
        param("track")
            .map(|v| Self::new(Dimension::Track, v))
            .or_else(|| param("domain").map(|v| Self::new(Dimension::Domain, v)))
    }
}

/// Decode `%XX` escapes and `+` in a query component.
///
/// Malformed escapes are kept literally; invalid UTF-8 is replaced.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escaped {
                    out.push(byte);
                    i += 2;
                } else {
                    out.push(b'%');
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Every user-adjustable constraint. Empty fields impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Criteria {
    /// Search text
    pub search: String,
    /// How `search` is applied
    pub search_mode: SearchMode,
    /// Single selected track
    pub track: Option<String>,
    /// Selected domains (any)
    pub domains: BTreeSet<String>,
    /// Selected level labels (any)
    pub levels: BTreeSet<String>,
    /// Selected normalized status labels (any)
    pub statuses: BTreeSet<String>,
    /// Selected tools (any)
    pub tools: BTreeSet<String>,
    /// Selected duration buckets (any)
    pub durations: BTreeSet<DurationBucket>,
    /// Minimum-price bounds
    pub price_range: Option<PriceRange>,
    /// Rating threshold; unrated courses never pass
    pub min_rating: Option<f64>,
}

impl Criteria {
    /// Whether no constraint is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.track.is_none()
            && self.domains.is_empty()
            && self.levels.is_empty()
            && self.statuses.is_empty()
            && self.tools.is_empty()
            && self.durations.is_empty()
            && self.price_range.is_none()
            && self.min_rating.is_none()
    }

    /// Facet predicates only (no search)
    #[must_use]
    pub fn matches_facets(&self, course: &Course) -> bool {
        if let Some(track) = &self.track {
            if course.track.as_deref() != Some(track.as_str()) {
                return false;
            }
        }
        if !self.domains.is_empty()
            && !course
                .domain
                .as_ref()
                .is_some_and(|d| self.domains.contains(d))
        {
            return false;
        }
        if !self.levels.is_empty() && !self.levels.contains(course.level.label()) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(course.normalized_status.label()) {
            return false;
        }
        if !self.tools.is_empty() && !course.tools.iter().any(|t| self.tools.contains(t)) {
            return false;
        }
        if !self.durations.is_empty() && !self.durations.contains(&course.duration_bucket()) {
            return false;
        }
        if let Some(range) = &self.price_range {
            if !course.min_price().is_some_and(|p| range.contains(p)) {
                return false;
            }
        }
        if let Some(threshold) = self.min_rating {
            if !course.rating.is_some_and(|r| r >= threshold) {
                return false;
            }
        }
        true
    }
}

fn search_words(search: &str) -> Vec<String> {
    search
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Whether every word appears in at least one of title, description, tool
#[must_use]
pub fn matches_all_words(course: &Course, words: &[String]) -> bool {
    let fields = [
        course.title.to_lowercase(),
        course.description.to_lowercase(),
        course.tool.to_lowercase(),
    ];
    words
        .iter()
        .all(|word| fields.iter().any(|field| field.contains(word.as_str())))
}

/// Relevance score of a course for a search phrase.
///
/// Title phrase 100, 50 per word in the title, description phrase 30, 15 per
/// word in the description, 25 per word in the tools, 40 each for a domain
/// or track phrase match.
#[must_use]
pub fn relevance_score(course: &Course, search: &str) -> u32 {
    let phrase = search.to_lowercase().trim().to_string();
    if phrase.is_empty() {
        return 0;
    }
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let title = course.title.to_lowercase();
    let description = course.description.to_lowercase();
    let tool = course.tool.to_lowercase();
    let per_word = |field: &str, weight: u32| -> u32 {
        words
            .iter()
            .filter(|w| field.contains(**w))
            .map(|_| weight)
            .sum()
    };
    let phrase_in = |field: Option<&str>, weight: u32| -> u32 {
        if field.is_some_and(|f| f.to_lowercase().contains(&phrase)) {
            weight
        } else {
            0
        }
    };

    let mut score = 0;
    score += phrase_in(Some(&title), 100) + per_word(&title, 50);
    score += phrase_in(Some(&description), 30) + per_word(&description, 15);
    if !tool.is_empty() {
        score += per_word(&tool, 25);
    }
    score += phrase_in(course.domain.as_deref(), 40);
    score += phrase_in(course.track.as_deref(), 40);
    score
}

/// Rank `indices` by relevance, dropping zero scores. Ties keep their order.
#[must_use]
pub fn rank_by_relevance(courses: &[Course], indices: &[usize], search: &str) -> Vec<usize> {
    let mut scored: Vec<(usize, u32)> = indices
        .iter()
        .map(|&i| (i, relevance_score(&courses[i], search)))
        .filter(|(_, score)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(i, _)| i).collect()
}

/// Evaluate the criteria over the collection.
///
/// Returns indices in collection order, or in relevance order when the
/// search mode is [`SearchMode::Relevance`] and the search is non-blank.
#[must_use]
pub fn filter(courses: &[Course], criteria: &Criteria, pre_filter: Option<&PreFilter>) -> Vec<usize> {
    let base = courses
        .iter()
        .enumerate()
        .filter(|(_, c)| pre_filter.map_or(true, |p| p.matches(c)));

    let search = criteria.search.trim();
    if search.is_empty() {
        return base
            .filter(|(_, c)| criteria.matches_facets(c))
            .map(|(i, _)| i)
            .collect();
    }

    match criteria.search_mode {
        SearchMode::AllWords => {
            let words = search_words(search);
            base.filter(|(_, c)| matches_all_words(c, &words) && criteria.matches_facets(c))
                .map(|(i, _)| i)
                .collect()
        }
        SearchMode::Relevance => {
            let candidates: Vec<usize> = base
                .filter(|(_, c)| criteria.matches_facets(c))
                .map(|(i, _)| i)
                .collect();
            rank_by_relevance(courses, &candidates, search)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{PriceTier, Pricing};

    fn course(id: &str, title: &str) -> Course {
        Course::new(id, title)
    }

    #[test]
    fn test_all_words_and_across_words_or_across_fields() {
        let mut a = course("a", "Deep Learning");
        a.tool = "PyTorch".into();
        let b = course("b", "Deep Thoughts");
        let courses = vec![a, b];
        let criteria = Criteria {
            search: "deep pytorch".into(),
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &criteria, None), vec![0]);
    }

    #[test]
    fn test_relevance_title_phrase_outranks_description() {
        let mut desc_only = course("a", "Statistics Basics");
        desc_only.description = "Touches on machine learning".into();
        let title = course("b", "Intro to Machine Learning");
        let courses = vec![desc_only, title];

        assert!(relevance_score(&courses[1], "machine learning") >= 100);
        assert_eq!(relevance_score(&courses[0], "machine learning"), 30 + 15 * 2);

        let criteria = Criteria {
            search: "machine learning".into(),
            search_mode: SearchMode::Relevance,
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &criteria, None), vec![1, 0]);
    }

    #[test]
    fn test_relevance_drops_zero_scores() {
        let courses = vec![course("a", "Robotics"), course("b", "Vision")];
        let criteria = Criteria {
            search: "vision".into(),
            search_mode: SearchMode::Relevance,
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &criteria, None), vec![1]);
    }

    #[test]
    fn test_tool_matches_any_split_tool() {
        let mut a = course("a", "A");
        a.tools = vec!["Python".into(), "TensorFlow".into()];
        let courses = vec![a, course("b", "B")];
        let criteria = Criteria {
            tools: BTreeSet::from(["TensorFlow".to_string()]),
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &criteria, None), vec![0]);
    }

    #[test]
    fn test_price_range_uses_minimum_tier() {
        let mut priced = course("a", "A");
        priced.pricing = Some(Pricing {
            weeks: Some(1),
            lms: Some(PriceTier::new(19.0, 1499.0)),
            lms_video: Some(PriceTier::new(79.0, 7499.0)),
            lms_video_live: Some(PriceTier::new(139.0, 12499.0)),
        });
        let courses = vec![priced, course("b", "unpriced")];

        let low = Criteria {
            price_range: Some(PriceRange::new(0.0, Some(10_000.0))),
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &low, None), vec![0]);

        let mid = Criteria {
            price_range: Some(PriceRange::new(10_000.0, Some(25_000.0))),
            ..Criteria::default()
        };
        assert!(filter(&courses, &mid, None).is_empty());
    }

    #[test]
    fn test_min_rating_excludes_unrated() {
        let mut rated = course("a", "A");
        rated.rating = Some(4.5);
        let courses = vec![rated, course("b", "B")];
        let criteria = Criteria {
            min_rating: Some(4.0),
            ..Criteria::default()
        };
        assert_eq!(filter(&courses, &criteria, None), vec![0]);
    }

    #[test]
    fn test_pre_filter_folds_quotes_and_case() {
        let mut a = course("a", "A");
        a.track = Some("Women\u{2019}s Health AI".into());
        let courses = vec![a, course("b", "B")];
        let pre = PreFilter::new(Dimension::Track, "women's health ai ");
        assert_eq!(filter(&courses, &Criteria::default(), Some(&pre)), vec![0]);
    }

    #[test]
    fn test_pre_filter_from_query() {
        let pre = PreFilter::from_query("?mode=domain&value=Computer%20Vision").unwrap();
        assert_eq!(pre.dimension, Dimension::Domain);
        assert_eq!(pre.value, "computer vision");

        let pre = PreFilter::from_query("track=Robotics+%26+Automation").unwrap();
        assert_eq!(pre.dimension, Dimension::Track);
        assert_eq!(pre.value, "robotics & automation");

        assert!(PreFilter::from_query("page=2").is_none());
        assert!(PreFilter::from_query("track=").is_none());
    }

    #[test]
    fn test_percent_decode_utf8_and_malformed() {
        assert_eq!(percent_decode("Women%E2%80%99s"), "Women\u{2019}s");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_price_range_parse() {
        assert_eq!(PriceRange::parse("0-10000"), Some(PriceRange::new(0.0, Some(10_000.0))));
        assert_eq!(PriceRange::parse("50000+"), Some(PriceRange::new(50_000.0, None)));
        assert_eq!(PriceRange::parse("9-1"), None);
        assert!(PriceRange::PRESETS[3].contains(1e9));
        assert!(PriceRange::PRESETS[0].contains(10_000.0));
    }
}
