use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "openness-stars",
    about = "Score catalog datasets on the 5-star open data scale",
    version
)]
pub struct Cli {
    /// Dataset JSON file, or directory of JSON files, to score
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Fetch datasets from a CKAN catalog instead of reading PATH (e.g. https://data.example.org)
    #[arg(long, value_name = "URL")]
    pub catalog: Option<String>,

    /// Dataset name or id to fetch from the catalog (repeatable)
    #[arg(long = "dataset", value_name = "ID", requires = "catalog")]
    pub datasets: Vec<String>,

    /// Search query for the catalog, used when no --dataset is given
    #[arg(long, default_value = "*:*")]
    pub query: String,

    /// Maximum number of datasets to fetch with --query
    #[arg(long, default_value_t = 100)]
    pub rows: usize,

    /// Scoring config file [default: ./.openness-stars/config.toml, fallback ~/.config/openness-stars/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to openness-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "openness-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// HTML output path; use without value to default to openness-report.html
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "openness-report.html")]
    pub html: Option<PathBuf>,

    /// Exit with code 1 if any dataset scores below this many stars
    #[arg(long, value_name = "STARS", value_parser = clap::value_parser!(u8).range(0..=5))]
    pub fail_under: Option<u8>,

    /// Show all datasets (not just closed or non-machine-readable ones)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Colored summary and tables
    Terminal,
    /// Array of scored datasets
    Json,
    /// Package dicts with `qa` attached
    View,
    /// Search documents with `openness_score`, one per line
    Index,
    /// Standalone HTML page with badges
    Html,
    /// PDF report
    Pdf,
}

impl Cli {
    /// Effective report format: `--pdf` and `--html` imply their format.
    pub fn report_format(&self) -> ReportFormat {
        if self.pdf.is_some() {
            ReportFormat::Pdf
        } else if self.html.is_some() {
            ReportFormat::Html
        } else {
            self.report
        }
    }
}
