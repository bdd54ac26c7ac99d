//! `openness-stars` — score catalog datasets on the 5-star open data scale.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the License Registry and Format Tier Table ([`load_config`]).
//! 3. Read package dicts from disk ([`loader`]) or a live catalog (`--catalog`, [`catalog`]).
//! 4. Score each dataset through the host hooks ([`OpennessPlugin`]).
//! 5. Render the requested report ([`report`]) or hook-enriched documents.
//! 6. Exit `0`, or `1` when `--fail-under` is set and a dataset scores below it.

mod cli;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use openness_stars::config::load_config;
use openness_stars::models::{Dataset, DatasetScore};
use openness_stars::{catalog, loader, report, OpennessPlugin};

use cli::{Cli, ReportFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve input path; config is looked up next to it
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());
    let project_dir = if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.clone()
    };

    let config = load_config(&project_dir, cli.config.as_deref())?;

    if !cli.quiet {
        for (format, tiers) in config.overlapping_formats() {
            let tiers: Vec<String> = tiers.iter().map(ToString::to_string).collect();
            eprintln!(
                "  {} format {:?} is listed in several tiers ({}); the highest applies",
                "⚠".yellow(),
                format,
                tiers.join(", ")
            );
        }
    }

    // `--dataset` fetches come back from the show API
    let shown = cli.catalog.is_some() && !cli.datasets.is_empty();
    let (packages, source) = match &cli.catalog {
        Some(base) => (fetch_packages(&cli, base).await?, base.clone()),
        None => (
            loader::load_datasets(&path, cli.quiet)?,
            path.display().to_string(),
        ),
    };

    if packages.is_empty() {
        eprintln!("No datasets found in {}", source);
        std::process::exit(1);
    }

    if !cli.quiet {
        eprintln!("  {} {} datasets", "→".cyan(), packages.len());
    }

    let plugin = OpennessPlugin::new(config);
    let scores: Vec<DatasetScore> = packages
        .iter()
        .map(|pkg| {
            let dataset = Dataset::from_value(pkg);
            let openness = plugin.score(&dataset);
            DatasetScore::new(&dataset, openness)
        })
        .collect();

    match cli.report_format() {
        ReportFormat::Terminal => {
            report::terminal::render(&scores, &source, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&scores)?);
        }
        ReportFormat::View => {
            let viewed = view_documents(&plugin, &packages, shown);
            println!("{}", serde_json::to_string_pretty(&viewed)?);
        }
        ReportFormat::Index => {
            for pkg in &packages {
                let doc = index_document(&plugin, pkg);
                println!("{}", serde_json::to_string(&doc)?);
            }
        }
        ReportFormat::Html => {
            let html_path = cli
                .html
                .clone()
                .unwrap_or_else(|| PathBuf::from("openness-report.html"));
            let viewed = view_documents(&plugin, &packages, shown);
            report::html::render(&plugin, &viewed, &html_path)?;
        }
        ReportFormat::Pdf => {
            let pdf_path = cli
                .pdf
                .clone()
                .unwrap_or_else(|| PathBuf::from("openness-report.pdf"));
            report::pdf::render(&scores, &source, &pdf_path)?;
        }
    }

    // Exit code: 1 if any dataset falls below the threshold
    if let Some(threshold) = cli.fail_under {
        let below = scores
            .iter()
            .filter(|s| s.openness.score < threshold)
            .count();
        if below > 0 {
            if !cli.quiet {
                eprintln!(
                    "  {} {} dataset(s) below {} stars",
                    "✗".red(),
                    below,
                    threshold
                );
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Package dicts as the host would render them, with `qa` attached.
///
/// `shown` marks dicts that came from the show API; those go through
/// `after_show` instead of `before_view`.
fn view_documents(plugin: &OpennessPlugin, packages: &[Value], shown: bool) -> Vec<Value> {
    packages
        .iter()
        .map(|pkg| {
            let mut pkg = pkg.clone();
            if shown {
                plugin.after_show(&mut pkg);
            } else {
                plugin.before_view(&mut pkg);
            }
            pkg
        })
        .collect()
}

/// A search document for `pkg`, shaped like the host's index payload.
fn index_document(plugin: &OpennessPlugin, pkg: &Value) -> Map<String, Value> {
    let mut doc = Map::new();
    for key in ["id", "name", "title", "license_id"] {
        if let Some(value) = pkg.get(key) {
            doc.insert(key.to_string(), value.clone());
        }
    }

    let formats: Vec<Value> = Dataset::from_value(pkg)
        .formats()
        .flatten()
        .map(Value::from)
        .collect();
    doc.insert("res_format".to_string(), Value::Array(formats));
    doc.insert("data_dict".to_string(), Value::from(pkg.to_string()));

    plugin.before_index(&mut doc);
    doc
}

/// Fetch package dicts from a CKAN catalog, either by id or by search.
async fn fetch_packages(cli: &Cli, base: &str) -> Result<Vec<Value>> {
    use futures::future::join_all;

    const BATCH_SIZE: usize = 25;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    if cli.datasets.is_empty() {
        if !cli.quiet {
            eprintln!("  {} searching {} for {:?}", "→".cyan(), base, cli.query);
        }
        return catalog::ckan::search(&client, base, &cli.query, cli.rows).await;
    }

    let (ids, invalid) = catalog::partition_dataset_ids(&cli.datasets)?;
    if !cli.quiet {
        for id in &invalid {
            eprintln!("  {} skipping invalid dataset id {:?}", "⚠".yellow(), id);
        }
    }

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut packages = Vec::new();
    for batch in ids.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|id| catalog::ckan::fetch_dataset(&client, base, id))
            .collect();

        for (id, result) in batch.iter().zip(join_all(futures).await) {
            match result {
                Ok(Some(pkg)) => packages.push(pkg),
                Ok(None) => {
                    if let Some(pb) = &pb {
                        pb.println(format!("  {} dataset {:?} not found", "⚠".yellow(), id));
                    }
                }
                Err(err) => {
                    if let Some(pb) = &pb {
                        pb.println(format!("  {} {}: {:#}", "✗".red(), id, err));
                    }
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(packages)
}
