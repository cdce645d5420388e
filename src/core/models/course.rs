//! Course model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Pricing, Status};

/// Course difficulty level.
///
/// The four ranked levels order as `Beginner < Intermediate < Advanced <
/// Expert`. Any other label is kept verbatim and ranks below `Beginner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    /// Entry level
    Beginner,
    /// Intermediate
    Intermediate,
    /// Advanced
    Advanced,
    /// Expert
    Expert,
    /// Label outside the ranked set (empty when the record had none)
    Other(String),
}

impl Level {
    /// The ranked levels in ascending order
    pub const RANKED: [Self; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    /// Parse a raw level label, matching the ranked names case-insensitively
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Sort ordinal: 1..=4 for ranked levels, 0 for anything else
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
            Self::Expert => 4,
            Self::Other(_) => 0,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Other(label) => label,
        }
    }

    /// Whether the level counts toward the "advanced" statistic
    #[must_use]
    pub const fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced | Self::Expert)
    }
}

impl From<String> for Level {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Level> for String {
    fn from(value: Level) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the four fixed duration ranges used for filtering and badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DurationBucket {
    /// Up to two weeks (including unparseable durations, which count as 0)
    #[serde(rename = "0-2")]
    UpToTwo,
    /// More than two, at most five weeks
    #[serde(rename = "2-5")]
    TwoToFive,
    /// More than five, at most ten weeks
    #[serde(rename = "5-10")]
    FiveToTen,
    /// More than ten weeks
    #[serde(rename = "10+")]
    OverTen,
}

impl DurationBucket {
    /// All buckets in ascending order
    pub const ALL: [Self; 4] = [Self::UpToTwo, Self::TwoToFive, Self::FiveToTen, Self::OverTen];

    /// Bucket containing a week count
    #[must_use]
    pub const fn from_weeks(weeks: u32) -> Self {
        match weeks {
            0..=2 => Self::UpToTwo,
            3..=5 => Self::TwoToFive,
            6..=10 => Self::FiveToTen,
            _ => Self::OverTen,
        }
    }

    /// Filter key (`0-2`, `2-5`, `5-10`, `10+`)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::UpToTwo => "0-2",
            Self::TwoToFive => "2-5",
            Self::FiveToTen => "5-10",
            Self::OverTen => "10+",
        }
    }

    /// Parse a filter key
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key.trim())
    }

    /// Whether a week count falls in this bucket
    #[must_use]
    pub fn contains(self, weeks: u32) -> bool {
        Self::from_weeks(weeks) == self
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Extract the week count from a free-text duration: the first run of ASCII
/// digits, or 0 when there is none. Values beyond `u32` saturate.
#[must_use]
pub fn parse_weeks(duration: &str) -> u32 {
    let digits: String = duration
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(u32::MAX)
    }
}

/// Split a comma-separated tool field into trimmed, non-empty tags
#[must_use]
pub fn split_tools(tool: &str) -> Vec<String> {
    tool.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A normalized course record.
///
/// Built once from a [`RawCourse`](super::RawCourse) at load time; every
/// field that has a display default already carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Persisted identifier exactly as the source had it (stringified)
    pub id: Option<String>,
    /// Collision-free identifier used for lookups; never persisted
    pub internal_id: String,
    /// Course title
    pub title: String,
    /// Course description
    pub description: String,
    /// Difficulty level
    pub level: Level,
    /// Free-text duration (e.g. "6 Weeks")
    pub duration: String,
    /// Week count parsed from `duration`
    pub weeks: u32,
    /// Track classification
    pub track: Option<String>,
    /// Domain classification
    pub domain: Option<String>,
    /// Category classification
    pub category: Option<String>,
    /// Raw comma-separated tool field
    pub tool: String,
    /// Split tool tags
    pub tools: Vec<String>,
    /// Raw status text
    pub status: String,
    /// Canonical status facet
    pub normalized_status: Status,
    /// Rating out of 5, absent for unrated courses
    pub rating: Option<f64>,
    /// Enrollment count
    pub students: u64,
    /// Pricing tiers
    pub pricing: Option<Pricing>,
    /// External enrollment link
    pub enrollment_url: Option<String>,
    /// External course page link
    pub main_page_url: Option<String>,
}

impl Course {
    /// Create a minimal course; remaining fields take their defaults
    #[must_use]
    pub fn new(internal_id: &str, title: &str) -> Self {
        Self {
            id: Some(internal_id.to_string()),
            internal_id: internal_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            level: Level::Other(String::new()),
            duration: String::new(),
            weeks: 0,
            track: None,
            domain: None,
            category: None,
            tool: String::new(),
            tools: Vec::new(),
            status: String::new(),
            normalized_status: Status::Upcoming,
            rating: None,
            students: 0,
            pricing: None,
            enrollment_url: None,
            main_page_url: None,
        }
    }

    /// Lowest INR price across the pricing tiers, `None` when unpriced
    #[must_use]
    pub fn min_price(&self) -> Option<f64> {
        self.pricing.as_ref().and_then(Pricing::min_inr)
    }

    /// Duration bucket of the parsed week count
    #[must_use]
    pub const fn duration_bucket(&self) -> DurationBucket {
        DurationBucket::from_weeks(self.weeks)
    }

    /// Whether any of the course's tools equals `tool`
    #[must_use]
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }

    /// Rating label: one decimal, or "New" when unrated
    #[must_use]
    pub fn rating_label(&self) -> String {
        self.rating
            .map_or_else(|| "New".to_string(), |r| format!("{r:.1}"))
    }
}
