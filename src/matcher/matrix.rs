//! TE class x RoI overlap matrix.
//!
//! TE intervals are indexed by chromosome, class and subclass. Each RoI is
//! then compared against every TE interval on its chromosome; there is no
//! spatial index, so the cost is O(RoIs x TEs per chromosome).

use ahash::AHashMap;
use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use log::debug;

use crate::config::Config;
use crate::matcher::classify;
use crate::matcher::overlap::overlap_length;
use crate::rules::RuleTable;
use crate::types::{Interval, MatrixAggregate, RoiRecord, TeRecord};

/// class -> subclass -> TE intervals, for one chromosome.
pub type ClassIntervals = IndexMap<String, IndexMap<String, Vec<Interval>>>;

/// TE intervals grouped by chromosome, class and subclass.
#[derive(Debug, Default)]
pub struct TeIndex {
    by_chrom: AHashMap<String, ClassIntervals>,
    num_records: usize,
}

impl TeIndex {
    /// Build the index from TE records, rewriting labels with `rules`.
    pub fn build<I>(records: I, rules: &RuleTable, config: &Config) -> Result<Self>
    where
        I: IntoIterator<Item = Result<TeRecord>>,
    {
        let mut index = TeIndex::default();

        for record in records {
            let record = record?;
            if record.is_excluded(&config.excluded_chrom_marker) {
                continue;
            }
            let Some(chrom) = record.chrom else {
                continue;
            };

            let key = classify(&record.label, rules)?;
            index
                .by_chrom
                .entry(chrom)
                .or_default()
                .entry(key.class)
                .or_default()
                .entry(key.subclass)
                .or_default()
                .push(record.interval);
            index.num_records += 1;
        }

        Ok(index)
    }

    pub fn chromosome(&self, chrom: &str) -> Option<&ClassIntervals> {
        self.by_chrom.get(chrom)
    }

    pub fn num_chromosomes(&self) -> usize {
        self.by_chrom.len()
    }

    pub fn num_records(&self) -> usize {
        self.num_records
    }
}

/// Accumulate percent-of-RoI overlap per (class, subclass, RoI id).
///
/// RoI ids enter the matrix columns in the order they first overlap a TE.
/// Repeated TE records add to the same cell again.
pub fn build_matrix<I>(rois: I, index: &TeIndex) -> Result<MatrixAggregate>
where
    I: IntoIterator<Item = Result<RoiRecord>>,
{
    let mut matrix = MatrixAggregate::new();

    for roi in rois {
        let roi = roi?;
        let id = roi
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("RoI records need an id column in matrix mode"))?;

        let Some(classes) = index.chromosome(&roi.chrom) else {
            debug!("No TE records on chromosome {} (RoI {})", roi.chrom, id);
            continue;
        };

        let roi_length = roi.interval.length() as f64;
        for (class, subclasses) in classes {
            for (subclass, intervals) in subclasses {
                for te in intervals {
                    let overlap = overlap_length(*te, roi.interval);
                    if overlap > 0 {
                        matrix.add(class, subclass, id, 100.0 * overlap as f64 / roi_length);
                    }
                }
            }
        }
    }

    Ok(matrix)
}
