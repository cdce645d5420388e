//! Raw course records as they appear in the data file

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Pricing;

/// Text field that also accepts numbers and booleans; other types read as
/// missing
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Number field that also accepts numeric strings such as `"1,200"`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite()))
}

/// Nested block that reads as missing when it does not fit its shape
fn lenient_block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| serde_json::from_value(v).ok()))
}

/// `aggregateRating` block carried by some records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    /// Average rating
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating_value: Option<f64>,
}

/// A course record before normalization.
///
/// Every field is optional and loosely typed;
/// [`normalize_collection`](crate::core::normalizer::normalize_collection)
/// turns it into a [`Course`](super::Course) with defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCourse {
    /// Identifier, string or number
    #[serde(default)]
    pub id: Option<Value>,
    /// Alternate identifier field
    #[serde(default)]
    pub course_id: Option<Value>,
    /// Title
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Level label
    #[serde(default, deserialize_with = "lenient_text")]
    pub level: Option<String>,
    /// Free-text duration
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    /// Track
    #[serde(default, deserialize_with = "lenient_text")]
    pub track: Option<String>,
    /// Domain
    #[serde(default, deserialize_with = "lenient_text")]
    pub domain: Option<String>,
    /// Category
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    /// Tools, either a comma-separated string or a list
    #[serde(default)]
    pub tool: Option<Value>,
    /// Alternate tools field, used when `tool` is empty
    #[serde(default)]
    pub tools: Option<Value>,
    /// Status text
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    /// Alternate status field, used when `status` is absent
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    /// Rating
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    /// Structured rating, used when `rating` is absent
    #[serde(default, deserialize_with = "lenient_block")]
    pub aggregate_rating: Option<AggregateRating>,
    /// Enrollment count
    #[serde(default, deserialize_with = "lenient_number")]
    pub students: Option<f64>,
    /// Pricing tiers
    #[serde(default, deserialize_with = "lenient_block")]
    pub pricing: Option<Pricing>,
    /// Enrollment link
    #[serde(default, deserialize_with = "lenient_text")]
    pub enrollment_url: Option<String>,
    /// Course page link
    #[serde(default, deserialize_with = "lenient_text")]
    pub main_page_url: Option<String>,
}

impl RawCourse {
    /// Raw identifier as a string: `id` first, then `courseId`.
    ///
    /// Numbers are stringified; blank strings and other JSON types count as
    /// missing.
    #[must_use]
    pub fn raw_id(&self) -> Option<String> {
        [self.id.as_ref(), self.course_id.as_ref()]
            .into_iter()
            .flatten()
            .find_map(value_to_id)
    }

    /// Tools flattened to a comma-separated string: `tool`, or `tools`
    /// when `tool` is missing or empty
    #[must_use]
    pub fn tool_text(&self) -> String {
        let text = flatten_tools(self.tool.as_ref());
        if text.is_empty() {
            flatten_tools(self.tools.as_ref())
        } else {
            text
        }
    }

    /// Status text: `status`, then `state`
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_deref().or(self.state.as_deref())
    }

    /// Rating from `rating` or `aggregateRating.ratingValue`
    #[must_use]
    pub fn effective_rating(&self) -> Option<f64> {
        self.rating
            .or_else(|| self.aggregate_rating.as_ref().and_then(|a| a.rating_value))
            .filter(|r| r.is_finite())
    }
}

fn flatten_tools(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_id_prefers_id_then_course_id() {
        let raw: RawCourse = serde_json::from_value(json!({"id": "AI-5", "courseId": "X"})).unwrap();
        assert_eq!(raw.raw_id(), Some("AI-5".to_string()));

        let raw: RawCourse = serde_json::from_value(json!({"courseId": 42})).unwrap();
        assert_eq!(raw.raw_id(), Some("42".to_string()));

        let raw: RawCourse = serde_json::from_value(json!({"id": "  "})).unwrap();
        assert_eq!(raw.raw_id(), None);
    }

    #[test]
    fn test_tool_aliases_and_lists() {
        let raw: RawCourse =
            serde_json::from_value(json!({"tools": ["Python", " PyTorch "]})).unwrap();
        assert_eq!(raw.tool_text(), "Python, PyTorch");

        let raw: RawCourse = serde_json::from_value(json!({"tool": "Qiskit, Cirq"})).unwrap();
        assert_eq!(raw.tool_text(), "Qiskit, Cirq");
    }

    #[test]
    fn test_state_alias_and_aggregate_rating() {
        let raw: RawCourse = serde_json::from_value(json!({
            "state": "🟢 Active",
            "aggregateRating": {"ratingValue": 4.5}
        }))
        .unwrap();
        assert_eq!(raw.status_text(), Some("🟢 Active"));
        assert_eq!(raw.effective_rating(), Some(4.5));
    }

    #[test]
    fn test_both_spellings_present() {
        let raw: RawCourse = serde_json::from_value(json!({
            "status": "🟢 Active",
            "state": "live",
            "tool": "",
            "tools": ["Python"]
        }))
        .unwrap();
        assert_eq!(raw.status_text(), Some("🟢 Active"));
        assert_eq!(raw.tool_text(), "Python");

        let raw: RawCourse =
            serde_json::from_value(json!({"tool": "R", "tools": ["Python"]})).unwrap();
        assert_eq!(raw.tool_text(), "R");
    }

    #[test]
    fn test_loose_types_are_coerced() {
        let raw: RawCourse = serde_json::from_value(json!({
            "students": "1,200",
            "rating": "4.5",
            "duration": 6,
            "title": 101,
            "pricing": "TBD",
            "aggregateRating": "n/a"
        }))
        .unwrap();
        assert_eq!(raw.students, Some(1200.0));
        assert_eq!(raw.rating, Some(4.5));
        assert_eq!(raw.duration.as_deref(), Some("6"));
        assert_eq!(raw.title.as_deref(), Some("101"));
        assert!(raw.pricing.is_none());
        assert!(raw.aggregate_rating.is_none());

        let raw: RawCourse =
            serde_json::from_value(json!({"students": {"count": 3}, "rating": "new"})).unwrap();
        assert_eq!(raw.students, None);
        assert_eq!(raw.effective_rating(), None);
    }

    #[test]
    fn test_null_fields_are_missing() {
        let raw: RawCourse =
            serde_json::from_value(json!({"rating": null, "track": null})).unwrap();
        assert_eq!(raw.effective_rating(), None);
        assert!(raw.track.is_none());
    }
}
