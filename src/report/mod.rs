//! Report renderers for openness scores.
//!
//! - [`terminal`] — colored summary box and dataset tables; respects `--verbose` / `--quiet`.
//! - [`html`] — standalone page with the openness facet and a badge per dataset and resource.
//! - [`pdf`] — cover page, star distribution page and a full dataset table.

pub mod html;
pub mod pdf;
pub mod terminal;

use crate::models::DatasetScore;

/// Number of datasets at each score, indexed 0..=5.
pub fn count_by_score(scores: &[DatasetScore]) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for s in scores {
        counts[usize::from(s.openness.score.min(5))] += 1;
    }
    counts
}

pub fn average_score(scores: &[DatasetScore]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: u32 = scores.iter().map(|s| u32::from(s.openness.score)).sum();
    sum as f32 / scores.len() as f32
}
