use anyhow::Result;
use reqwest::Client;
use serde_json::Value;

/// Largest page `package_search` will return.
const MAX_PAGE: usize = 1000;

fn action_url(base: &str, action: &str) -> String {
    format!("{}/api/3/action/{}", base.trim_end_matches('/'), action)
}

/// Fetch one package dict via `package_show`.
pub async fn fetch_dataset(client: &Client, base: &str, id: &str) -> Result<Option<Value>> {
    let response = client
        .get(action_url(base, "package_show"))
        .query(&[("id", id)])
        .header("User-Agent", concat!("openness-stars/", env!("CARGO_PKG_VERSION")))
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let data: Value = response.json().await?;
    Ok(unwrap_result(data).filter(Value::is_object))
}

/// Fetch up to `rows` package dicts matching `query` via `package_search`,
/// paging through the results.
pub async fn search(client: &Client, base: &str, query: &str, rows: usize) -> Result<Vec<Value>> {
    let mut packages = Vec::new();

    while packages.len() < rows {
        let page = (rows - packages.len()).min(MAX_PAGE);
        let start = packages.len();

        let response = client
            .get(action_url(base, "package_search"))
            .query(&[
                ("q", query.to_string()),
                ("rows", page.to_string()),
                ("start", start.to_string()),
            ])
            .header("User-Agent", concat!("openness-stars/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            break;
        }

        let data: Value = response.json().await?;
        let (results, count) = search_page(data);
        let fetched = results.len();
        packages.extend(results);

        if !has_more(fetched, page, packages.len(), count) {
            break;
        }
    }

    packages.truncate(rows);
    Ok(packages)
}

/// The `result` of an action response, or `None` when the catalog reports
/// `"success": false`.
fn unwrap_result(data: Value) -> Option<Value> {
    if data.get("success").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    match data {
        Value::Object(mut obj) => obj.remove("result"),
        _ => None,
    }
}

/// Whether another `package_search` page may hold results. Without a total
/// `count`, a short page marks the end.
fn has_more(fetched: usize, page: usize, total: usize, count: Option<usize>) -> bool {
    if fetched == 0 {
        return false;
    }
    match count {
        Some(count) => total < count,
        None => fetched >= page,
    }
}

/// Package dicts and the total match count, if reported, from one
/// `package_search` page.
fn search_page(data: Value) -> (Vec<Value>, Option<usize>) {
    let Some(result) = unwrap_result(data) else {
        return (Vec::new(), Some(0));
    };
    let count = result
        .get("count")
        .and_then(Value::as_u64)
        .map(|c| c as usize);
    let results = result
        .get("results")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
        .unwrap_or_default();
    (results, count)
}
