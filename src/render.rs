//! HTML badges for openness scores.
//!
//! Both helpers read the `qa` mapping attached by [`crate::hooks`] and never
//! fail: missing or mistyped data renders an HTML comment instead.

use std::fmt;

use quick_xml::escape::escape;
use serde_json::Value;

/// Template used for a single resource: stars plus the written reason.
pub const RESOURCE_TEMPLATE: &str = "qa/openness_stars.html";
/// Template used for a dataset summary: stars only, reason as a tooltip.
pub const DATASET_TEMPLATE: &str = "qa/openness_stars_brief.html";

/// A fragment of HTML that is already escaped and safe to embed as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the openness badge for a resource record carrying a `qa` field.
pub fn resource_badge_html(resource: &Value) -> Markup {
    match qa_fields(resource) {
        Qa::Missing => Markup("<!-- No qa info for this resource -->".to_string()),
        Qa::WrongType => Markup("<!-- QA info was of the wrong type -->".to_string()),
        Qa::Present { score, reason } => render(RESOURCE_TEMPLATE, score, &reason, true),
    }
}

/// Render the brief openness badge for a dataset record carrying a `qa` field.
pub fn dataset_badge_html(dataset: &Value) -> Markup {
    match qa_fields(dataset) {
        Qa::Missing => Markup("<!-- No qa info for this dataset -->".to_string()),
        Qa::WrongType => Markup("<!-- QA info was of the wrong type -->".to_string()),
        Qa::Present { score, reason } => render(DATASET_TEMPLATE, score, &reason, false),
    }
}

enum Qa {
    Missing,
    WrongType,
    Present { score: u8, reason: String },
}

fn qa_fields(record: &Value) -> Qa {
    let qa = match record.get("qa") {
        Some(qa) if !is_falsy(qa) => qa,
        _ => return Qa::Missing,
    };
    let Some(map) = qa.as_object() else {
        return Qa::WrongType;
    };

    // Scores are clamped into the scale; non-numeric scores read as 0.
    let score = map
        .get("openness_score")
        .and_then(Value::as_u64)
        .map(|s| s.min(5) as u8)
        .unwrap_or(0);
    let reason = map
        .get("openness_score_reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Qa::Present { score, reason }
}

/// Empty containers, empty strings, zero, false and null count as "no data".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn render(template: &str, score: u8, reason: &str, with_reason: bool) -> Markup {
    let reason = escape(reason);
    let class = if with_reason {
        "openness-stars"
    } else {
        "openness-stars openness-stars-brief"
    };

    let mut html = format!(
        r#"<span class="{class}" data-template="{template}" data-score="{score}" title="{reason}">"#
    );
    for i in 1..=5u8 {
        let state = if i <= score { "star-on" } else { "star-off" };
        html.push_str(&format!(r#"<i class="star {state}"></i>"#));
    }
    if with_reason {
        html.push_str(&format!(r#"<span class="openness-reason">{reason}</span>"#));
    }
    html.push_str("</span>");

    Markup(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_qa_placeholders() {
        assert_eq!(
            resource_badge_html(&json!({})).as_str(),
            "<!-- No qa info for this resource -->"
        );
        assert_eq!(
            dataset_badge_html(&json!({ "qa": null })).as_str(),
            "<!-- No qa info for this dataset -->"
        );
        assert_eq!(
            dataset_badge_html(&json!({ "qa": {} })).as_str(),
            "<!-- No qa info for this dataset -->"
        );
    }

    #[test]
    fn test_wrong_type_placeholder() {
        assert_eq!(
            resource_badge_html(&json!({ "qa": "five stars" })).as_str(),
            "<!-- QA info was of the wrong type -->"
        );
        assert_eq!(
            dataset_badge_html(&json!({ "qa": [1, 2] })).as_str(),
            "<!-- QA info was of the wrong type -->"
        );
    }

    #[test]
    fn test_resource_badge_shows_stars_and_reason() {
        let html = resource_badge_html(&json!({
            "qa": { "openness_score": 3, "openness_score_reason": "3-star data" }
        }));
        let html = html.as_str();
        assert!(html.contains(RESOURCE_TEMPLATE));
        assert_eq!(html.matches("star-on").count(), 3);
        assert_eq!(html.matches("star-off").count(), 2);
        assert!(html.contains(r#"<span class="openness-reason">3-star data</span>"#));
    }

    #[test]
    fn test_dataset_badge_is_brief() {
        let html = dataset_badge_html(&json!({
            "qa": { "openness_score": 5, "openness_score_reason": "linked data" }
        }));
        assert!(html.as_str().contains(DATASET_TEMPLATE));
        assert!(!html.as_str().contains("openness-reason"));
        assert_eq!(html.as_str().matches("star-on").count(), 5);
    }

    #[test]
    fn test_reason_is_escaped() {
        let html = resource_badge_html(&json!({
            "qa": { "openness_score": 1, "openness_score_reason": "<script>\"x\" & y</script>" }
        }));
        assert!(!html.as_str().contains("<script>"));
        assert!(html.as_str().contains("&lt;script&gt;"));
        assert!(html.as_str().contains("&amp;"));
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let html = dataset_badge_html(&json!({ "qa": { "openness_score": 12 } }));
        assert_eq!(html.as_str().matches("star-on").count(), 5);
        let html = dataset_badge_html(&json!({ "qa": { "openness_score": "high" } }));
        assert_eq!(html.as_str().matches("star-off").count(), 5);
    }
}
