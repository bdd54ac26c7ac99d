//! Openness scoring on the 5-star open data scale.
//!
//! - [`tiers`] — the built-in License Registry and Format Tier Table used when
//!   no config file overrides them.
//! - [`classifier`] — the scoring function: license gate first, then the
//!   highest format tier shared with the dataset's resources.

pub mod classifier;
pub mod tiers;
