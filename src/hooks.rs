//! Integration points for a catalog host.
//!
//! The host hands over package dicts and search documents as JSON; the
//! functions here attach openness data to them in place. None of them fail:
//! unusable input degrades to a score of 0.

use serde_json::{Map, Value};

use crate::config::Config;
use crate::models::{Dataset, Openness, Resource};
use crate::openness::classifier::{classify, classify_dataset};
use crate::render::{self, Markup};

/// Search-index field (and facet key) carrying the numeric score.
pub const SCORE_FIELD: &str = "openness_score";
/// Label shown for the score facet.
pub const FACET_LABEL: &str = "Openness";
/// Key under which the full result is attached to package and resource dicts.
pub const QA_KEY: &str = "qa";

/// Ordered facet registry: `(field, label)` pairs as the host displays them.
pub type Facets = Vec<(String, String)>;

/// Helpers exposed to the host's templates.
pub trait TemplateHelpers {
    fn classify(&self, license_id: Option<&str>, formats: &[Option<&str>]) -> Openness;
    fn resource_badge_html(&self, resource: &Value) -> Markup;
    fn dataset_badge_html(&self, dataset: &Value) -> Markup;
}

/// Openness scoring bound to one set of rules.
pub struct OpennessPlugin {
    config: Config,
}

impl OpennessPlugin {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn score(&self, dataset: &Dataset) -> Openness {
        classify_dataset(&self.config, dataset)
    }

    /// Add the numeric score to a search document before it is indexed.
    ///
    /// The package dict is read from the JSON string under `data_dict`; if it
    /// is missing or unparseable the dataset scores 0.
    pub fn before_index(&self, search_dict: &mut Map<String, Value>) {
        let pkg = search_dict
            .get("data_dict")
            .and_then(Value::as_str)
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .unwrap_or(Value::Null);

        let openness = self.score(&Dataset::from_value(&pkg));
        search_dict.insert(SCORE_FIELD.to_string(), Value::from(openness.score));
    }

    /// Attach `qa` to a package dict before it is rendered.
    pub fn before_view(&self, pkg: &mut Value) {
        self.attach_qa(pkg);
    }

    /// Attach `qa` to a package dict returned by the show API.
    pub fn after_show(&self, pkg: &mut Value) {
        self.attach_qa(pkg);
    }

    /// Register the openness facet for datasets; other package types are untouched.
    pub fn dataset_facets(&self, facets: &mut Facets, package_type: &str) {
        if package_type != "dataset" {
            return;
        }
        let label = FACET_LABEL.to_string();
        match facets.iter_mut().find(|(field, _)| field == SCORE_FIELD) {
            Some(existing) => existing.1 = label,
            None => facets.push((SCORE_FIELD.to_string(), label)),
        }
    }

    /// The dataset gets a score from all its formats; each resource gets one
    /// from the dataset license and its own format.
    fn attach_qa(&self, pkg: &mut Value) {
        let dataset = Dataset::from_value(pkg);
        let openness = self.score(&dataset);

        let Some(obj) = pkg.as_object_mut() else {
            return;
        };

        if let Some(resources) = obj.get_mut("resources").and_then(Value::as_array_mut) {
            for resource in resources.iter_mut() {
                let format = Resource::from_value(resource).format;
                let qa = classify(
                    &self.config,
                    dataset.license_id.as_deref(),
                    [format.as_deref()],
                );
                if let Some(res) = resource.as_object_mut() {
                    res.insert(QA_KEY.to_string(), to_qa_value(&qa));
                }
            }
        }

        obj.insert(QA_KEY.to_string(), to_qa_value(&openness));
    }
}

impl TemplateHelpers for OpennessPlugin {
    fn classify(&self, license_id: Option<&str>, formats: &[Option<&str>]) -> Openness {
        classify(&self.config, license_id, formats.iter().copied())
    }

    fn resource_badge_html(&self, resource: &Value) -> Markup {
        render::resource_badge_html(resource)
    }

    fn dataset_badge_html(&self, dataset: &Value) -> Markup {
        render::dataset_badge_html(dataset)
    }
}

fn to_qa_value(openness: &Openness) -> Value {
    serde_json::to_value(openness).unwrap_or_default()
}
