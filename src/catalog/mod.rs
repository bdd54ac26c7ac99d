//! Async clients for pulling package dicts straight from a live catalog.
//!
//! Each function returns `Ok(None)` / an empty list when the catalog answers
//! but has nothing usable, and `Err` on network failures.

pub mod ckan;

use anyhow::Result;
use regex::Regex;

/// Split `ids` into those that look like a catalog dataset name or UUID and
/// those that don't, keeping their order.
///
/// Names are 2-100 characters of lowercase alphanumerics, `-` and `_`; UUIDs
/// fit the same shape.
pub fn partition_dataset_ids(ids: &[String]) -> Result<(Vec<&str>, Vec<&str>)> {
    let re = Regex::new(r"^[a-z0-9_-]{2,100}$")?;
    Ok(ids.iter().map(String::as_str).partition(|id| re.is_match(id)))
}
