//! Grouping partitions and facet count tables.
//!
//! Built once per load from the normalized collection. Partitions hold
//! indices into the collection, never copies of courses.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::core::models::{Course, DurationBucket, Level};

/// A grouping dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Group by `track`
    Track,
    /// Group by `domain`
    Domain,
    /// Group by `category`
    Category,
}

impl Dimension {
    /// All dimensions
    pub const ALL: [Self; 3] = [Self::Track, Self::Domain, Self::Category];

    /// Catch-all bucket name for courses missing this dimension
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Track => "Untracked",
            Self::Domain => "Undomain",
            Self::Category => "Academic",
        }
    }

    /// The course's raw value for this dimension
    #[must_use]
    pub fn value_of(self, course: &Course) -> Option<&str> {
        match self {
            Self::Track => course.track.as_deref(),
            Self::Domain => course.domain.as_deref(),
            Self::Category => course.category.as_deref(),
        }
    }

    /// Bucket key: the raw value, or the placeholder when missing
    #[must_use]
    pub fn bucket_of(self, course: &Course) -> &str {
        self.value_of(course).unwrap_or_else(|| self.placeholder())
    }

    /// Lower-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Domain => "domain",
            Self::Category => "category",
        }
    }

    /// Parse a dimension name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One bucket of a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Facet value (or placeholder)
    pub key: String,
    /// Member indices in collection order
    pub members: Vec<usize>,
}

/// Ordered mapping from facet value to member courses.
///
/// Buckets appear in first-seen order. Every course lands in exactly one
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    dimension: Dimension,
    groups: Vec<Group>,
}

impl Partition {
    /// Partition `courses` along `dimension`
    #[must_use]
    pub fn build(dimension: Dimension, courses: &[Course]) -> Self {
        Self::build_subset(dimension, courses, 0..courses.len())
    }

    /// Partition only the courses at `indices`, keeping their order
    pub fn build_subset(
        dimension: Dimension,
        courses: &[Course],
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for idx in indices {
            let key = dimension.bucket_of(&courses[idx]);
            if let Some(&slot) = slots.get(key) {
                groups[slot].members.push(idx);
            } else {
                slots.insert(key.to_string(), groups.len());
                groups.push(Group {
                    key: key.to_string(),
                    members: vec![idx],
                });
            }
        }
        Self { dimension, groups }
    }

    /// Dimension this partition groups by
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Buckets in first-seen order
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Members of one bucket
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[usize]> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.members.as_slice())
    }

    /// Number of buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no buckets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of members across all buckets
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// Keep only members in `keep`, dropping buckets left empty.
    ///
    /// Bucket order and member order are unchanged.
    #[must_use]
    pub fn restrict(&self, keep: &HashSet<usize>) -> Self {
        let groups = self
            .groups
            .iter()
            .filter_map(|g| {
                let members: Vec<usize> =
                    g.members.iter().copied().filter(|i| keep.contains(i)).collect();
                (!members.is_empty()).then(|| Group {
                    key: g.key.clone(),
                    members,
                })
            })
            .collect();
        Self {
            dimension: self.dimension,
            groups,
        }
    }
}

/// Count badges for the tool, level and duration controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    /// Tool tags by count descending, first-seen order for ties
    pub tools: Vec<(String, usize)>,
    /// Ranked levels in ascending order
    pub levels: Vec<(String, usize)>,
    /// Duration buckets in ascending order
    pub durations: Vec<(DurationBucket, usize)>,
}

impl FacetCounts {
    /// Count facets over `courses`
    #[must_use]
    pub fn build(courses: &[Course]) -> Self {
        let mut tools: Vec<(String, usize)> = Vec::new();
        let mut tool_slots: HashMap<&str, usize> = HashMap::new();
        for tool in courses.iter().flat_map(|c| c.tools.iter()) {
            if let Some(&slot) = tool_slots.get(tool.as_str()) {
                tools[slot].1 += 1;
            } else {
                tool_slots.insert(tool.as_str(), tools.len());
                tools.push((tool.clone(), 1));
            }
        }
        // stable: ties keep first-seen order
        tools.sort_by(|a, b| b.1.cmp(&a.1));

        let levels = Level::RANKED
            .iter()
            .map(|level| {
                let count = courses.iter().filter(|c| &c.level == level).count();
                (level.label().to_string(), count)
            })
            .collect();

        let durations = DurationBucket::ALL
            .into_iter()
            .map(|bucket| {
                let count = courses
                    .iter()
                    .filter(|c| c.duration_bucket() == bucket)
                    .count();
                (bucket, count)
            })
            .collect();

        Self {
            tools,
            levels,
            durations,
        }
    }

    /// Count for one tool, 0 when unseen
    #[must_use]
    pub fn tool_count(&self, tool: &str) -> usize {
        self.tools
            .iter()
            .find(|(t, _)| t == tool)
            .map_or(0, |(_, n)| *n)
    }

    /// Count for one duration bucket
    #[must_use]
    pub fn duration_count(&self, bucket: DurationBucket) -> usize {
        self.durations
            .iter()
            .find(|(b, _)| *b == bucket)
            .map_or(0, |(_, n)| *n)
    }
}

/// Distinct sorted values for populating the filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Tracks present in the collection
    pub tracks: Vec<String>,
    /// Domains present in the collection
    pub domains: Vec<String>,
    /// Tool tags present in the collection
    pub tools: Vec<String>,
    /// Normalized status labels present in the collection
    pub statuses: Vec<String>,
}

impl FilterOptions {
    /// Collect option lists from `courses`
    #[must_use]
    pub fn build(courses: &[Course]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        Self {
            tracks: distinct(courses.iter().filter_map(|c| c.track.as_deref())),
            domains: distinct(courses.iter().filter_map(|c| c.domain.as_deref())),
            tools: distinct(courses.iter().flat_map(|c| c.tools.iter().map(String::as_str))),
            statuses: distinct(courses.iter().map(|c| c.normalized_status.label())),
        }
    }
}

/// Everything derived from the collection at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogIndex {
    /// Partition by track
    pub by_track: Partition,
    /// Partition by domain
    pub by_domain: Partition,
    /// Partition by category
    pub by_category: Partition,
    /// Facet count badges
    pub facets: FacetCounts,
    /// Filter control options
    pub options: FilterOptions,
}

impl CatalogIndex {
    /// Build every partition and facet table
    #[must_use]
    pub fn build(courses: &[Course]) -> Self {
        crate::debug!("Indexing {} courses", courses.len());
        Self {
            by_track: Partition::build(Dimension::Track, courses),
            by_domain: Partition::build(Dimension::Domain, courses),
            by_category: Partition::build(Dimension::Category, courses),
            facets: FacetCounts::build(courses),
            options: FilterOptions::build(courses),
        }
    }

    /// Partition for a dimension
    #[must_use]
    pub const fn partition(&self, dimension: Dimension) -> &Partition {
        match dimension {
            Dimension::Track => &self.by_track,
            Dimension::Domain => &self.by_domain,
            Dimension::Category => &self.by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, track: Option<&str>, tools: &str, weeks: u32) -> Course {
        let mut c = Course::new(id, id);
        c.track = track.map(str::to_string);
        c.tool = tools.to_string();
        c.tools = crate::core::models::split_tools(tools);
        c.weeks = weeks;
        c
    }

    #[test]
    fn test_partition_first_seen_order_with_placeholder() {
        let courses = vec![
            course("a", Some("Robotics"), "", 1),
            course("b", None, "", 1),
            course("c", Some("Vision"), "", 1),
            course("d", Some("Robotics"), "", 1),
        ];
        let partition = Partition::build(Dimension::Track, &courses);
        let keys: Vec<_> = partition.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Robotics", "Untracked", "Vision"]);
        assert_eq!(partition.get("Robotics"), Some(&[0, 3][..]));
        assert_eq!(partition.member_count(), courses.len());
    }

    #[test]
    fn test_every_dimension_covers_collection() {
        let courses = vec![
            course("a", Some("T"), "", 1),
            course("b", None, "", 1),
        ];
        let index = CatalogIndex::build(&courses);
        for dim in Dimension::ALL {
            assert_eq!(index.partition(dim).member_count(), 2);
        }
        assert_eq!(index.by_domain.groups()[0].key, "Undomain");
        assert_eq!(index.by_category.groups()[0].key, "Academic");
    }

    #[test]
    fn test_tool_counts_sorted_with_stable_ties() {
        let courses = vec![
            course("a", None, "Rust, Python", 1),
            course("b", None, "Go, Python", 1),
            course("c", None, "Go", 1),
            course("d", None, "Zig", 1),
        ];
        let facets = FacetCounts::build(&courses);
        let names: Vec<_> = facets.tools.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, vec!["Python", "Go", "Rust", "Zig"]);
        assert_eq!(facets.tool_count("Python"), 2);
        assert_eq!(facets.tool_count("Java"), 0);
    }

    #[test]
    fn test_duration_and_level_counts() {
        let mut courses = vec![
            course("a", None, "", 1),
            course("b", None, "", 3),
            course("c", None, "", 12),
        ];
        courses[0].level = Level::Advanced;
        let facets = FacetCounts::build(&courses);
        assert_eq!(facets.duration_count(DurationBucket::UpToTwo), 1);
        assert_eq!(facets.duration_count(DurationBucket::FiveToTen), 0);
        assert_eq!(facets.duration_count(DurationBucket::OverTen), 1);
        assert_eq!(facets.levels[2], ("Advanced".to_string(), 1));
    }

    #[test]
    fn test_filter_options_sorted_distinct() {
        let courses = vec![
            course("a", Some("Vision"), "PyTorch", 1),
            course("b", Some("Audio"), "PyTorch, Librosa", 1),
        ];
        let options = FilterOptions::build(&courses);
        assert_eq!(options.tracks, vec!["Audio", "Vision"]);
        assert_eq!(options.tools, vec!["Librosa", "PyTorch"]);
        assert_eq!(options.statuses, vec!["Upcoming"]);
    }

    #[test]
    fn test_restrict_keeps_order_and_drops_empty() {
        let courses = vec![
            course("a", Some("A"), "", 1),
            course("b", Some("B"), "", 1),
            course("c", Some("A"), "", 1),
        ];
        let partition = Partition::build(Dimension::Track, &courses);
        let restricted = partition.restrict(&HashSet::from([2, 0]));
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted.get("A"), Some(&[0, 2][..]));
        assert_eq!(restricted.get("B"), None);
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!(Dimension::parse("Track"), Some(Dimension::Track));
        assert_eq!(Dimension::parse("level"), None);
    }
}
