//! Score catalog datasets on the 5-star open data scale.
//!
//! A catalog host drives [`OpennessPlugin`]: its hooks attach scores to
//! search documents and package dicts, and its [`TemplateHelpers`] render the
//! badges. [`classify`] is the scoring function underneath both.

pub mod catalog;
pub mod config;
pub mod hooks;
pub mod loader;
pub mod models;
pub mod openness;
pub mod render;
pub mod report;

pub use config::Config;
pub use hooks::{OpennessPlugin, TemplateHelpers};
pub use models::{Dataset, Openness};
pub use openness::classifier::classify;
pub use render::Markup;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_surface() {
        let plugin = OpennessPlugin::new(Config::default());
        let mut pkg = json!({ "license_id": "odc-odbl", "resources": [{ "format": "geojson" }] });
        plugin.after_show(&mut pkg);

        let badge: Markup = plugin.dataset_badge_html(&pkg);
        assert_eq!(badge.as_str().matches("star-on").count(), 3);
        assert_eq!(
            TemplateHelpers::classify(&plugin, Some("odc-odbl"), &[Some("geojson")]),
            classify(&Config::default(), Some("odc-odbl"), [Some("geojson")])
        );
    }
}
