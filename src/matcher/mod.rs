//! Overlap arithmetic and the three aggregation passes.

pub mod density;
pub mod matrix;
pub mod overlap;

use anyhow::Result;

use crate::rules::RuleTable;
use crate::types::ClassKey;

pub use density::{genome_density, roi_density};
pub use matrix::{build_matrix, TeIndex};
pub use overlap::{overlap_length, total_overlap};

/// Rewrite `label` and split it into its class key.
pub fn classify(label: &str, rules: &RuleTable) -> Result<ClassKey> {
    ClassKey::from_label(&rules.rewrite(label)?)
}
