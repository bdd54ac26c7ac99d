use std::collections::HashSet;

use crate::config::Config;
use crate::models::{Dataset, Openness, Tier};

const LICENSE_NOT_OPEN: &str = "The dataset license is not in our list of Open Licenses.";
const LICENSE_OPEN: &str = "The dataset license is an open license";

/// Score a license and a set of resource formats on the 0-5 star scale.
///
/// - A license outside the registry scores 0 whatever the formats are.
/// - An open license scores at least 1.
/// - The highest tier sharing a format with the resources sets the final
///   score (5, 4, 3 or 2).
///
/// Absent or empty formats are skipped. Matching is case-insensitive.
pub fn classify<'a, I>(config: &Config, license_id: Option<&str>, formats: I) -> Openness
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    if !config.licenses.is_open(license_id) {
        return Openness {
            score: 0,
            reason: LICENSE_NOT_OPEN.to_string(),
        };
    }

    let formats: HashSet<String> = formats
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
        .collect();

    match best_tier(config, &formats) {
        Some(tier) => Openness {
            score: tier.stars(),
            reason: tier.reason().to_string(),
        },
        None => Openness {
            score: 1,
            reason: LICENSE_OPEN.to_string(),
        },
    }
}

/// Score a dataset from its license and all of its resource formats.
pub fn classify_dataset(config: &Config, dataset: &Dataset) -> Openness {
    classify(config, dataset.license_id.as_deref(), dataset.formats())
}

fn best_tier(config: &Config, formats: &HashSet<String>) -> Option<Tier> {
    Tier::DESCENDING
        .into_iter()
        .find(|tier| !config.formats.formats(*tier).is_disjoint(formats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatTiers;

    fn score(license: Option<&str>, formats: &[&str]) -> Openness {
        classify(&Config::default(), license, formats.iter().map(|f| Some(*f)))
    }

    #[test]
    fn test_csv_is_three_star() {
        let result = score(Some("cc0"), &["CSV", "PDF"]);
        assert_eq!(result.score, 3);
        assert!(result.reason.contains("3-star"));
    }

    #[test]
    fn test_shapefile_is_two_star() {
        assert_eq!(score(Some("cc0"), &["shp"]).score, 2);
    }

    #[test]
    fn test_closed_license_short_circuits() {
        let result = score(Some("proprietary"), &["rdf"]);
        assert_eq!(result.score, 0);
        assert_eq!(result.reason, LICENSE_NOT_OPEN);
    }

    #[test]
    fn test_highest_tier_wins() {
        let result = score(Some("cc-by"), &["rdf", "csv"]);
        assert_eq!(result.score, 5);
        assert!(result.reason.contains("5-star"));
    }

    #[test]
    fn test_license_is_case_insensitive() {
        let result = score(Some("CC0"), &[]);
        assert_eq!(result.score, 1);
        assert_eq!(result.reason, LICENSE_OPEN);
    }

    #[test]
    fn test_absent_license_scores_zero() {
        assert_eq!(score(None, &["rdf"]).score, 0);
        assert_eq!(score(Some(""), &["rdf"]).score, 0);
    }

    #[test]
    fn test_absent_and_empty_formats_are_skipped() {
        let cfg = Config::default();
        let result = classify(&cfg, Some("psi"), vec![None, Some(""), Some("Xls")]);
        assert_eq!(result.score, 2);
        let result = classify(&cfg, Some("psi"), vec![None, Some("")]);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_multi_word_formats() {
        assert_eq!(score(Some("cc-by"), &["Atom Feed"]).score, 3);
        assert_eq!(score(Some("cc-by"), &["ArcGIS Map Service"]).score, 2);
    }

    #[test]
    fn test_no_default_format_reaches_four_stars() {
        let cfg = Config::default();
        let every_format: Vec<&str> = Tier::DESCENDING
            .iter()
            .flat_map(|t| cfg.formats.formats(*t))
            .map(String::as_str)
            .collect();
        for format in &every_format {
            assert_ne!(score(Some("cc-by"), &[*format]).score, 4);
        }
        assert_ne!(score(Some("cc-by"), &every_format).score, 4);
    }

    #[test]
    fn test_configured_four_star_tier() {
        let mut cfg = Config::default();
        cfg.formats = FormatTiers {
            four_star: ["json-ld".to_string()].into_iter().collect(),
            ..FormatTiers::default()
        };
        let result = classify(&cfg, Some("cc-by"), vec![Some("JSON-LD"), Some("csv")]);
        assert_eq!(result.score, 4);
        assert!(result.reason.contains("4-star"));
    }

    #[test]
    fn test_resource_order_does_not_matter() {
        let forward = score(Some("odc-by"), &["pdf", "xls", "csv"]);
        let backward = score(Some("odc-by"), &["csv", "xls", "pdf"]);
        assert_eq!(forward, backward);
        assert_eq!(forward.score, 3);
    }

    #[test]
    fn test_classify_dataset() {
        let dataset = Dataset::from_value(&serde_json::json!({
            "license_id": "uk-ogl",
            "resources": [{ "format": "TTL" }, { "url": "http://example.com" }]
        }));
        assert_eq!(classify_dataset(&Config::default(), &dataset).score, 5);
    }
}
