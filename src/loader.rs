use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

/// Load package dicts from a JSON file or from every `*.json` file in a
/// directory (non-recursive, sorted by file name).
///
/// Files in a directory that fail to parse are skipped with a warning; a single
/// file given explicitly must parse.
pub fn load_datasets(path: &Path, quiet: bool) -> Result<Vec<Value>> {
    if path.is_file() {
        return read_packages(path);
    }

    let mut files = json_files(path)?;
    files.sort();

    let mut packages = Vec::new();
    for file in &files {
        match read_packages(file) {
            Ok(found) => packages.extend(found),
            Err(err) => {
                if !quiet {
                    eprintln!("  {} skipping {}: {:#}", "⚠".yellow(), file.display(), err);
                }
            }
        }
    }

    Ok(packages)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_packages(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(extract_packages(json))
}

/// Pull package dicts out of the shapes a catalog export can take:
///
/// - a single package dict
/// - an array of package dicts
/// - a `package_show` response: `{"result": {...}}`
/// - a `package_search` response: `{"result": {"results": [...]}}`
pub fn extract_packages(json: Value) -> Vec<Value> {
    match json {
        Value::Array(items) => items.into_iter().filter(Value::is_object).collect(),
        Value::Object(mut obj) => match obj.remove("result") {
            Some(Value::Object(mut result)) => match result.remove("results") {
                Some(results) => extract_packages(results),
                None => vec![Value::Object(result)],
            },
            Some(other) => extract_packages(other),
            None => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_extract_single_package() {
        let pkgs = extract_packages(json!({ "name": "roads", "resources": [] }));
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0]["name"], "roads");
    }

    #[test]
    fn test_extract_package_show_response() {
        let pkgs = extract_packages(json!({
            "success": true,
            "result": { "name": "roads" }
        }));
        assert_eq!(pkgs, vec![json!({ "name": "roads" })]);
    }

    #[test]
    fn test_extract_package_search_response() {
        let pkgs = extract_packages(json!({
            "success": true,
            "result": {
                "count": 2,
                "results": [{ "name": "a" }, { "name": "b" }, "junk"]
            }
        }));
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[1]["name"], "b");
    }

    #[test]
    fn test_extract_ignores_scalars() {
        assert!(extract_packages(json!(42)).is_empty());
        assert!(extract_packages(json!({ "result": null })).is_empty());
    }

    #[test]
    fn test_load_single_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"[{{"name": "a"}}, {{"name": "b"}}]"#).unwrap();
        let pkgs = load_datasets(f.path(), true).unwrap();
        assert_eq!(pkgs.len(), 2);
    }

    #[test]
    fn test_load_directory_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"name": "second"}"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"name": "first"}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), r#"{"name": "ignored"}"#).unwrap();

        let pkgs = load_datasets(dir.path(), true).unwrap();
        let names: Vec<_> = pkgs.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_load_explicit_broken_file_fails() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(load_datasets(f.path(), true).is_err());
    }
}
