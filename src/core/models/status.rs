//! Canonical status facet

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical course status.
///
/// Produced by [`normalize_status`](crate::core::normalizer::normalize_status);
/// raw statuses that match none of the known buckets keep their own label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Running now
    Active,
    /// Announced or newly added
    Upcoming,
    /// Medium priority
    Medium,
    /// Low priority
    Low,
    /// Anything else, first letter capitalized
    Other(String),
}

impl Status {
    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Upcoming => "Upcoming",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        crate::core::normalizer::normalize_status(Some(&value))
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
