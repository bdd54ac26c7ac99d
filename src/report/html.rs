use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use serde_json::Value;

use crate::hooks::{Facets, OpennessPlugin, TemplateHelpers, SCORE_FIELD};
use crate::models::{star_string, Dataset, Resource};

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem;color:#14162a}\
aside{float:right;width:14rem;border:1px solid #d9dde8;border-radius:4px;padding:.5rem 1rem}\
main{margin-right:16rem}\
.star{display:inline-block;width:.9em;height:.9em;margin-right:1px;border-radius:50%}\
.star-on{background:#f4b400}.star-off{background:#d9dde8}\
.openness-reason{margin-left:.5rem;color:#5c6685;font-size:.9em}\
li{margin:.25rem 0}";

/// Write a standalone HTML page for view-enriched package dicts.
///
/// `packages` must already carry `qa` (see [`OpennessPlugin::before_view`]).
pub fn render(plugin: &OpennessPlugin, packages: &[Value], output_path: &Path) -> Result<()> {
    let page = build_page(plugin, packages);
    std::fs::write(output_path, page)
        .with_context(|| format!("Failed to write HTML to {}", output_path.display()))?;

    println!("HTML report written to: {}", output_path.display());
    Ok(())
}

fn build_page(plugin: &OpennessPlugin, packages: &[Value]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Dataset openness</title>");
    let _ = write!(html, "<style>{STYLE}</style></head><body>");

    html.push_str(&facet_block(plugin, packages));

    html.push_str("<main><h1>Dataset openness</h1>");
    for pkg in packages {
        let dataset = Dataset::from_value(pkg);
        let _ = write!(
            html,
            "<section><h2>{} {}</h2>",
            escape(dataset.display_name()),
            plugin.dataset_badge_html(pkg)
        );
        let _ = write!(
            html,
            "<p>License: {}</p><ul>",
            escape(dataset.license_id.as_deref().unwrap_or("none"))
        );

        let resources = pkg.get("resources").and_then(Value::as_array);
        for resource in resources.into_iter().flatten() {
            let res = Resource::from_value(resource);
            let label = res
                .name
                .as_deref()
                .or(res.id.as_deref())
                .unwrap_or("resource");
            let _ = write!(
                html,
                "<li>{} ({}) {}</li>",
                escape(label),
                escape(res.format.as_deref().unwrap_or("unknown format")),
                plugin.resource_badge_html(resource)
            );
        }
        html.push_str("</ul></section>");
    }
    html.push_str("</main></body></html>\n");
    html
}

/// Sidebar listing the registered facets, with per-score counts for openness.
fn facet_block(plugin: &OpennessPlugin, packages: &[Value]) -> String {
    let mut facets = Facets::new();
    plugin.dataset_facets(&mut facets, "dataset");

    let mut counts = [0usize; 6];
    for pkg in packages {
        let score = pkg
            .get("qa")
            .and_then(|qa| qa.get(SCORE_FIELD))
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .min(5);
        counts[score as usize] += 1;
    }

    let mut html = String::from("<aside>");
    for (field, label) in &facets {
        let _ = write!(
            html,
            "<h3 data-facet=\"{}\">{}</h3><ul>",
            escape(field.as_str()),
            escape(label.as_str())
        );
        if field == SCORE_FIELD {
            for score in (0..=5u8).rev() {
                let _ = write!(
                    html,
                    "<li>{} <span class=\"count\">{}</span></li>",
                    star_string(score),
                    counts[usize::from(score)]
                );
            }
        }
        html.push_str("</ul>");
    }
    html.push_str("</aside>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use tempfile::TempDir;

    fn enriched() -> (OpennessPlugin, Vec<Value>) {
        let plugin = OpennessPlugin::new(Config::default());
        let mut packages = vec![
            json!({
                "title": "Roads & <Rail>",
                "license_id": "cc-by",
                "resources": [{ "name": "network", "format": "CSV" }]
            }),
            json!({ "name": "budget", "license_id": "proprietary", "resources": [] }),
        ];
        for pkg in &mut packages {
            plugin.before_view(pkg);
        }
        (plugin, packages)
    }

    #[test]
    fn test_page_contains_badges_and_escapes_titles() {
        let (plugin, packages) = enriched();
        let page = build_page(&plugin, &packages);
        assert!(page.contains("Roads &amp; &lt;Rail&gt;"));
        assert!(page.contains("qa/openness_stars_brief.html"));
        assert!(page.contains("qa/openness_stars.html"));
        assert!(page.contains("network (CSV)"));
    }

    #[test]
    fn test_facet_block_counts_scores() {
        let (plugin, packages) = enriched();
        let block = facet_block(&plugin, &packages);
        assert!(block.contains("data-facet=\"openness_score\">Openness"));
        assert!(block.contains("★★★☆☆ <span class=\"count\">1</span>"));
        assert!(block.contains("☆☆☆☆☆ <span class=\"count\">1</span>"));
    }

    #[test]
    fn test_render_writes_file() {
        let (plugin, packages) = enriched();
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("openness.html");
        render(&plugin, &packages, &out).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
