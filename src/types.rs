//! Core data structures for repcalc.
//!
//! Records read from TE annotation and RoI files, the classification key
//! derived from a TE label, and the aggregates the analyses build.

use ahash::AHashMap;
use anyhow::Result;
use indexmap::{IndexMap, IndexSet};

use crate::error::RepcalcError;

/// Subclass assigned to labels that carry no `/`.
pub const NO_SUBCLASS: &str = "No subclass";

/// A closed integer interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Interval { start, end }
    }

    /// Span in bp (`end - start`).
    pub fn length(&self) -> i64 {
        self.end - self.start
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// One row of a TE annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeRecord {
    /// Class/subclass label with any `?` suffix already dropped.
    pub label: String,
    /// Chromosome with the `chr` prefix stripped, if the mode reads one.
    pub chrom: Option<String>,
    pub interval: Interval,
}

impl TeRecord {
    pub fn new(label: String, chrom: Option<String>, start: i64, end: i64) -> Self {
        TeRecord {
            label,
            chrom,
            interval: Interval::new(start, end),
        }
    }

    /// True when the chromosome name contains `marker` (e.g. `_random`).
    pub fn is_excluded(&self, marker: &str) -> bool {
        self.chrom.as_deref().is_some_and(|c| c.contains(marker))
    }
}

/// One row of a RoI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiRecord {
    /// Region identifier; only read in matrix mode.
    pub id: Option<String>,
    pub chrom: String,
    pub interval: Interval,
}

impl RoiRecord {
    pub fn new(id: Option<String>, chrom: String, start: i64, end: i64) -> Self {
        RoiRecord {
            id,
            chrom,
            interval: Interval::new(start, end),
        }
    }
}

/// (class, subclass) pair derived from a rewritten label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassKey {
    pub class: String,
    pub subclass: String,
}

impl ClassKey {
    /// Split `class/subclass`; a label without `/` gets [`NO_SUBCLASS`].
    pub fn from_label(label: &str) -> Result<Self> {
        let mut parts = label.split('/');
        let class = parts.next().unwrap_or_default();
        let subclass = parts.next();
        if parts.next().is_some() {
            return Err(RepcalcError::ClassificationFormat {
                label: label.to_string(),
            }
            .into());
        }
        Ok(ClassKey {
            class: class.to_string(),
            subclass: subclass.unwrap_or(NO_SUBCLASS).to_string(),
        })
    }
}

/// Occurrence count and accumulated bp for one subclass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensityStats {
    pub count: u64,
    pub length: i64,
}

impl DensityStats {
    pub fn add(&mut self, length: i64) {
        self.count += 1;
        self.length += length;
    }

    pub fn merge(&mut self, other: &DensityStats) {
        self.count += other.count;
        self.length += other.length;
    }
}

/// class -> subclass -> stats, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DensityAggregate {
    classes: IndexMap<String, IndexMap<String, DensityStats>>,
}

impl DensityAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stats for `key`, inserting a zeroed entry if absent.
    pub fn entry(&mut self, key: &ClassKey) -> &mut DensityStats {
        self.classes
            .entry(key.class.clone())
            .or_default()
            .entry(key.subclass.clone())
            .or_default()
    }

    pub fn get(&self, class: &str) -> Option<&IndexMap<String, DensityStats>> {
        self.classes.get(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = (&String, &IndexMap<String, DensityStats>)> {
        self.classes.iter()
    }

    /// Sum over every subclass of `class`; zero when the class is absent.
    pub fn class_total(&self, class: &str) -> DensityStats {
        let mut total = DensityStats::default();
        if let Some(subclasses) = self.classes.get(class) {
            for stats in subclasses.values() {
                total.merge(stats);
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// class -> subclass -> RoI id -> cumulative percent of the RoI overlapped.
///
/// `roi_ids` keeps the RoI ids in the order they first received a value; the
/// matrix columns follow that order.
#[derive(Debug, Clone, Default)]
pub struct MatrixAggregate {
    cells: IndexMap<String, IndexMap<String, AHashMap<String, f64>>>,
    roi_ids: IndexSet<String>,
}

impl MatrixAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class: &str, subclass: &str, roi_id: &str, percent: f64) {
        if !self.roi_ids.contains(roi_id) {
            self.roi_ids.insert(roi_id.to_string());
        }
        *self
            .cells
            .entry(class.to_string())
            .or_default()
            .entry(subclass.to_string())
            .or_default()
            .entry(roi_id.to_string())
            .or_insert(0.0) += percent;
    }

    pub fn roi_ids(&self) -> impl Iterator<Item = &String> {
        self.roi_ids.iter()
    }

    pub fn num_rois(&self) -> usize {
        self.roi_ids.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }

    pub fn subclasses(&self, class: &str) -> impl Iterator<Item = &String> {
        self.cells.get(class).into_iter().flat_map(|s| s.keys())
    }

    pub fn num_subclasses(&self, class: &str) -> usize {
        self.cells.get(class).map_or(0, |s| s.len())
    }

    pub fn cell(&self, class: &str, subclass: &str, roi_id: &str) -> Option<f64> {
        self.cells.get(class)?.get(subclass)?.get(roi_id).copied()
    }

    /// Sum of `roi_id` over all subclasses of `class`, `None` if no subclass has it.
    pub fn class_cell(&self, class: &str, roi_id: &str) -> Option<f64> {
        let subclasses = self.cells.get(class)?;
        subclasses
            .values()
            .filter_map(|rois| rois.get(roi_id))
            .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
