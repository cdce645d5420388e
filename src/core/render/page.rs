//! Static course detail page

use askama::Template;
use serde_json::{Map, Value};

use super::{format_inr, group_thousands, stars};
use crate::core::error::CatalogError;
use crate::core::models::{split_tools, Pricing};
use crate::core::prepare::slugify;

/// One pricing row on the page
#[derive(Debug, Clone, PartialEq)]
pub struct TierRow {
    /// Tier label
    pub label: &'static str,
    /// Dollar price
    pub usd: String,
    /// Rupee price
    pub inr: String,
}

/// One FAQ entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    /// Question
    pub question: String,
    /// Answer
    pub answer: String,
}

/// Detail page for one course record
#[derive(Debug, Clone, Template)]
#[template(path = "course_detail.html")]
pub struct DetailPage {
    /// Course title
    pub title: String,
    /// Lead paragraph
    pub description: String,
    /// Level label
    pub level: String,
    /// Duration text
    pub duration: String,
    /// Track
    pub track: String,
    /// Domain
    pub domain: String,
    /// Tool tags
    pub tools: Vec<String>,
    /// Status text
    pub status: String,
    /// Star rating
    pub rating: String,
    /// Formatted enrollment count
    pub students: String,
    /// Canonical page url
    pub main_page_url: String,
    /// Enrollment link
    pub enrollment_url: Option<String>,
    /// Pricing rows
    pub tiers: Vec<TierRow>,
    /// Syllabus entries
    pub syllabus: Vec<String>,
    /// Project entries
    pub projects: Vec<String>,
    /// FAQ entries
    pub faqs: Vec<FaqEntry>,
}

fn text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Strings, or the first text-like field of objects
fn items(record: &Map<String, Value>, key: &str) -> Vec<String> {
    let Some(Value::Array(values)) = record.get(key) else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => text(obj, &["title", "name", "topic", "description"]),
            _ => None,
        })
        .collect()
}

fn faqs(record: &Map<String, Value>) -> Vec<FaqEntry> {
    let Some(Value::Array(values)) = record.get("faqs") else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|obj| {
            Some(FaqEntry {
                question: text(obj, &["question", "q"])?,
                answer: text(obj, &["answer", "a"]).unwrap_or_default(),
            })
        })
        .collect()
}

impl DetailPage {
    /// Build a page from a raw record.
    ///
    /// Missing fields get safe defaults: title from the id or
    /// `Untitled Course`, page url from the title slug, zero-priced tiers
    /// and empty syllabus, projects and FAQs.
    ///
    /// # Errors
    /// Returns an error if the record is not a JSON object
    pub fn from_record(record: &Value) -> Result<Self, CatalogError> {
        let record = record
            .as_object()
            .ok_or_else(|| CatalogError::InvalidRecord("course record must be a JSON object".into()))?;

        let title = text(record, &["title", "id", "courseId"])
            .unwrap_or_else(|| "Untitled Course".to_string());
        let main_page_url = text(record, &["mainPageUrl"])
            .unwrap_or_else(|| format!("/ai/courses/{}/", slugify(&title)));

        let pricing: Pricing = record
            .get("pricing")
            .and_then(|p| serde_json::from_value(p.clone()).ok())
            .unwrap_or_default();
        let tiers = [
            ("LMS", pricing.lms),
            ("LMS + Video", pricing.lms_video),
            ("LMS + Video + Live", pricing.lms_video_live),
        ]
        .into_iter()
        .map(|(label, tier)| {
            let tier = tier.unwrap_or_default();
            TierRow {
                label,
                usd: format!("${:.0}", tier.usd),
                inr: format_inr(tier.inr),
            }
        })
        .collect();

        let tool = match record.get("tool").or_else(|| record.get("tools")) {
            Some(Value::String(s)) => split_tools(s),
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let rating = record
            .get("rating")
            .and_then(Value::as_f64)
            .or_else(|| {
                record
                    .get("aggregateRating")
                    .and_then(|a| a.get("ratingValue"))
                    .and_then(Value::as_f64)
            });
        // display only; negative or fractional counts are not meaningful
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let students = record
            .get("students")
            .and_then(Value::as_f64)
            .map_or(0, |s| s.max(0.0).round() as u64);

        Ok(Self {
            description: text(record, &["description", "shortDescription"]).unwrap_or_default(),
            level: text(record, &["level"]).unwrap_or_default(),
            duration: text(record, &["duration"]).unwrap_or_default(),
            track: text(record, &["track"]).unwrap_or_default(),
            domain: text(record, &["domain"]).unwrap_or_default(),
            tools: tool,
            status: text(record, &["status", "state"]).unwrap_or_default(),
            rating: stars(rating),
            students: group_thousands(students),
            enrollment_url: text(record, &["enrollmentUrl"]),
            tiers,
            syllabus: items(record, "syllabus"),
            projects: items(record, "projects"),
            faqs: faqs(record),
            title,
            main_page_url,
        })
    }

    /// Directory name the page is written under
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Render to HTML
    ///
    /// # Errors
    /// Returns an error if template rendering fails
    pub fn to_html(&self) -> Result<String, CatalogError> {
        Ok(self.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_defaults() {
        let page = DetailPage::from_record(&json!({"id": "AI-9"})).unwrap();
        assert_eq!(page.title, "AI-9");
        assert_eq!(page.main_page_url, "/ai/courses/ai-9/");
        assert_eq!(page.tiers.len(), 3);
        assert!(page.tiers.iter().all(|t| t.inr == "₹0"));
        assert!(page.syllabus.is_empty() && page.faqs.is_empty());

        let page = DetailPage::from_record(&json!({})).unwrap();
        assert_eq!(page.title, "Untitled Course");
        assert_eq!(page.slug(), "untitled-course");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            DetailPage::from_record(&json!([1, 2])),
            Err(CatalogError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_render_escapes_and_lists() {
        let page = DetailPage::from_record(&json!({
            "title": "Vision <Lab>",
            "tool": "OpenCV, PyTorch",
            "syllabus": ["Week 1: Images", {"title": "Week 2: CNNs"}],
            "faqs": [{"question": "Prerequisites?", "answer": "Python"}],
            "pricing": {"lms": {"usd": 19, "inr": 1499}}
        }))
        .unwrap();
        let html = page.to_html().unwrap();
        assert!(html.contains("Vision &lt;Lab&gt;"));
        assert!(html.contains("Week 2: CNNs"));
        assert!(html.contains("Prerequisites?"));
        assert!(html.contains("₹1,499"));
        assert!(html.contains("PyTorch"));
    }
}
