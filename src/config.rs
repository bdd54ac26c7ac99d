use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::models::Tier;
use crate::openness::tiers;

/// Root configuration structure, deserialized from `.openness-stars/config.toml`.
///
/// Both sections are optional; anything left out keeps the built-in table.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Licenses that qualify a dataset for at least one star.
    #[serde(default)]
    pub licenses: LicenseRegistry,
    /// Format tables for the 2- to 5-star tiers.
    #[serde(default)]
    pub formats: FormatTiers,
}

/// The set of license identifiers considered open. Matching is case-insensitive.
#[derive(Debug, Deserialize)]
pub struct LicenseRegistry {
    #[serde(default = "default_open_licenses", deserialize_with = "lowercase_set")]
    pub open: HashSet<String>,
}

impl LicenseRegistry {
    /// Whether `license_id` is open. An absent id is never open.
    pub fn is_open(&self, license_id: Option<&str>) -> bool {
        license_id
            .map(|id| self.open.contains(&id.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for LicenseRegistry {
    fn default() -> Self {
        LicenseRegistry {
            open: default_open_licenses(),
        }
    }
}

/// Format sets for each star tier, keyed in the TOML by `five_star`,
/// `four_star`, `three_star` and `two_star`.
#[derive(Debug, Deserialize)]
pub struct FormatTiers {
    #[serde(default = "default_five_star", deserialize_with = "lowercase_set")]
    pub five_star: HashSet<String>,
    #[serde(default = "default_four_star", deserialize_with = "lowercase_set")]
    pub four_star: HashSet<String>,
    #[serde(default = "default_three_star", deserialize_with = "lowercase_set")]
    pub three_star: HashSet<String>,
    #[serde(default = "default_two_star", deserialize_with = "lowercase_set")]
    pub two_star: HashSet<String>,
}

impl FormatTiers {
    pub fn formats(&self, tier: Tier) -> &HashSet<String> {
        match tier {
            Tier::FiveStar => &self.five_star,
            Tier::FourStar => &self.four_star,
            Tier::ThreeStar => &self.three_star,
            Tier::TwoStar => &self.two_star,
        }
    }
}

impl Default for FormatTiers {
    fn default() -> Self {
        FormatTiers {
            five_star: default_five_star(),
            four_star: default_four_star(),
            three_star: default_three_star(),
            two_star: default_two_star(),
        }
    }
}

fn default_open_licenses() -> HashSet<String> {
    tiers::to_set(tiers::OPEN_LICENSES)
}

fn default_five_star() -> HashSet<String> {
    tiers::to_set(tiers::FIVE_STAR_FORMATS)
}

fn default_four_star() -> HashSet<String> {
    tiers::to_set(tiers::FOUR_STAR_FORMATS)
}

fn default_three_star() -> HashSet<String> {
    tiers::to_set(tiers::THREE_STAR_FORMATS)
}

fn default_two_star() -> HashSet<String> {
    tiers::to_set(tiers::TWO_STAR_FORMATS)
}

fn lowercase_set<'de, D>(deserializer: D) -> std::result::Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<String> = Vec::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|s| s.to_lowercase()).collect())
}

impl Config {
    /// Formats listed in more than one tier, paired with every tier that lists
    /// them (highest first). The highest tier wins during scoring.
    pub fn overlapping_formats(&self) -> Vec<(String, Vec<Tier>)> {
        let mut all: Vec<&String> = Tier::DESCENDING
            .iter()
            .flat_map(|tier| self.formats.formats(*tier))
            .collect();
        all.sort();
        all.dedup();

        all.into_iter()
            .filter_map(|format| {
                let tiers: Vec<Tier> = Tier::DESCENDING
                    .iter()
                    .copied()
                    .filter(|tier| self.formats.formats(*tier).contains(format))
                    .collect();
                (tiers.len() > 1).then(|| (format.clone(), tiers))
            })
            .collect()
    }
}

/// Load the scoring configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.openness-stars/config.toml`
/// 3. `~/.config/openness-stars/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".openness-stars").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("openness-stars")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_registry() {
        let cfg = Config::default();
        assert!(cfg.licenses.is_open(Some("cc-by")));
        assert!(cfg.licenses.is_open(Some("CC0")));
        assert!(!cfg.licenses.is_open(Some("proprietary")));
        assert!(!cfg.licenses.is_open(None));
    }

    #[test]
    fn test_license_match_does_not_trim() {
        let cfg = Config::default();
        assert!(!cfg.licenses.is_open(Some(" cc-by ")));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[formats]
four_star = ["JSON-LD"]
"#,
        )
        .unwrap();
        assert!(cfg.formats.four_star.contains("json-ld"));
        assert!(cfg.formats.five_star.contains("rdf"));
        assert!(cfg.formats.two_star.contains("shp"));
        assert!(cfg.licenses.is_open(Some("psi")));
    }

    #[test]
    fn test_license_override_is_lowercased() {
        let cfg: Config = toml::from_str(
            r#"
[licenses]
open = ["OGL-UK-3.0"]
"#,
        )
        .unwrap();
        assert!(cfg.licenses.is_open(Some("ogl-uk-3.0")));
        assert!(!cfg.licenses.is_open(Some("cc-by")));
    }

    #[test]
    fn test_overlapping_formats() {
        let cfg: Config = toml::from_str(
            r#"
[formats]
five_star = ["rdf", "json"]
"#,
        )
        .unwrap();
        let overlaps = cfg.overlapping_formats();
        assert_eq!(
            overlaps,
            vec![("json".to_string(), vec![Tier::FiveStar, Tier::ThreeStar])]
        );
        assert!(Config::default().overlapping_formats().is_empty());
    }

    #[test]
    fn test_load_config_override() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[licenses]\nopen = [\"mit\"]\n").unwrap();
        let dir = TempDir::new().unwrap();
        let cfg = load_config(dir.path(), Some(f.path())).unwrap();
        assert!(cfg.licenses.is_open(Some("MIT")));
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".openness-stars");
        std::fs::create_dir(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[formats]\ntwo_star = [\"pdf\"]\n").unwrap();
        let cfg = load_config(dir.path(), None).unwrap();
        assert!(cfg.formats.two_star.contains("pdf"));
        assert!(!cfg.formats.two_star.contains("shp"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[licenses]\nopen = \"cc-by\"\n").unwrap();
        assert!(load_config(Path::new("."), Some(f.path())).is_err());
    }
}
