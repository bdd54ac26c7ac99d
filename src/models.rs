use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of scoring one dataset (or one resource) for openness.
///
/// Serialized with the same keys the catalog's QA extension uses, so the
/// value can be attached to a package dict and read back by templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Openness {
    #[serde(rename = "openness_score")]
    pub score: u8,
    #[serde(rename = "openness_score_reason")]
    pub reason: String,
}

/// A named bucket of formats sharing the same star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    FiveStar,
    FourStar,
    ThreeStar,
    TwoStar,
}

impl Tier {
    /// Tiers in the order they are tested; the first match wins.
    pub const DESCENDING: [Tier; 4] = [
        Tier::FiveStar,
        Tier::FourStar,
        Tier::ThreeStar,
        Tier::TwoStar,
    ];

    pub fn stars(self) -> u8 {
        match self {
            Tier::FiveStar => 5,
            Tier::FourStar => 4,
            Tier::ThreeStar => 3,
            Tier::TwoStar => 2,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Tier::FiveStar => "One of the resource formats is 5-star data - linked data.",
            Tier::FourStar => "One of the resource formats is 4-star data - data that uses URIs.",
            Tier::ThreeStar => {
                "One of the resource formats is 3-star data - machine-readable data in an open format."
            }
            Tier::TwoStar => {
                "One of the resource formats is 2-star data - machine-readable data in a proprietary format."
            }
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-star", self.stars())
    }
}

/// The parts of a catalog package dict that scoring and reporting need.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub license_id: Option<String>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    pub id: Option<String>,
    pub name: Option<String>,
    pub format: Option<String>,
}

impl Dataset {
    /// Extract a dataset from a package dict.
    ///
    /// Fields of the wrong type are treated as absent; a missing or non-array
    /// `resources` yields no resources.
    pub fn from_value(value: &Value) -> Self {
        let resources = value
            .get("resources")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().map(Resource::from_value).collect())
            .unwrap_or_default();

        Dataset {
            id: str_field(value, "id"),
            name: str_field(value, "name"),
            title: str_field(value, "title"),
            license_id: str_field(value, "license_id"),
            resources,
        }
    }

    /// Best human-readable label: title, then name, then id.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
            .or(self.id.as_deref())
            .unwrap_or("(unnamed dataset)")
    }

    pub fn formats(&self) -> impl Iterator<Item = Option<&str>> {
        self.resources.iter().map(|r| r.format.as_deref())
    }
}

impl Resource {
    pub fn from_value(value: &Value) -> Self {
        Resource {
            id: str_field(value, "id"),
            name: str_field(value, "name"),
            format: str_field(value, "format"),
        }
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// A scored dataset, as shown in reports.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetScore {
    pub name: String,
    pub license: Option<String>,
    /// Distinct, lowercased resource formats in first-seen order.
    pub formats: Vec<String>,
    #[serde(flatten)]
    pub openness: Openness,
}

impl DatasetScore {
    pub fn new(dataset: &Dataset, openness: Openness) -> Self {
        let mut formats: Vec<String> = Vec::new();
        for format in dataset.formats().flatten() {
            let lower = format.to_lowercase();
            if !lower.is_empty() && !formats.contains(&lower) {
                formats.push(lower);
            }
        }

        DatasetScore {
            name: dataset.display_name().to_string(),
            license: dataset.license_id.clone(),
            formats,
            openness,
        }
    }

    pub fn license_label(&self) -> &str {
        self.license.as_deref().unwrap_or("none")
    }
}

/// Render a score as filled and empty stars, e.g. `★★★☆☆`.
pub fn star_string(score: u8) -> String {
    let filled = usize::from(score.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_tolerates_wrong_types() {
        let value = json!({
            "name": "roads",
            "license_id": 42,
            "resources": [
                { "format": "CSV" },
                { "format": null },
                { "format": ["xls"] },
                {}
            ]
        });
        let dataset = Dataset::from_value(&value);
        assert_eq!(dataset.name.as_deref(), Some("roads"));
        assert_eq!(dataset.license_id, None);
        let formats: Vec<_> = dataset.formats().collect();
        assert_eq!(formats, vec![Some("CSV"), None, None, None]);
    }

    #[test]
    fn test_from_value_missing_resources() {
        let dataset = Dataset::from_value(&json!({ "license_id": "cc-by", "resources": null }));
        assert!(dataset.resources.is_empty());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut dataset = Dataset {
            id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(dataset.display_name(), "abc");
        dataset.name = Some(String::new());
        assert_eq!(dataset.display_name(), "abc");
        dataset.name = Some("roads".into());
        assert_eq!(dataset.display_name(), "roads");
        dataset.title = Some(String::new());
        assert_eq!(dataset.display_name(), "roads");
        dataset.title = Some("Road network".into());
        assert_eq!(dataset.display_name(), "Road network");
    }

    #[test]
    fn test_openness_serializes_with_qa_keys() {
        let openness = Openness {
            score: 3,
            reason: "ok".into(),
        };
        let value = serde_json::to_value(&openness).unwrap();
        assert_eq!(value, json!({ "openness_score": 3, "openness_score_reason": "ok" }));
    }

    #[test]
    fn test_dataset_score_dedups_formats() {
        let dataset = Dataset::from_value(&json!({
            "title": "Budget",
            "resources": [{ "format": "CSV" }, { "format": "csv" }, { "format": "" }, { "format": "PDF" }]
        }));
        let score = DatasetScore::new(
            &dataset,
            Openness {
                score: 0,
                reason: String::new(),
            },
        );
        assert_eq!(score.formats, vec!["csv", "pdf"]);
        assert_eq!(score.license_label(), "none");
    }

    #[test]
    fn test_star_string() {
        assert_eq!(star_string(0), "☆☆☆☆☆");
        assert_eq!(star_string(3), "★★★☆☆");
        assert_eq!(star_string(9), "★★★★★");
        assert_eq!(Tier::ThreeStar.to_string(), "3-star");
    }
}
