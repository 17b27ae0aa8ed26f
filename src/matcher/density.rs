//! Class/subclass density aggregation.
//!
//! Genome density counts every TE record with its full length. RoI density
//! keeps only records that overlap RoIs on their chromosome and counts the
//! overlapped bp instead.

use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::matcher::classify;
use crate::matcher::overlap::total_overlap;
use crate::parser::RoiIntervals;
use crate::rules::RuleTable;
use crate::types::{DensityAggregate, TeRecord};

/// Aggregate TE counts and lengths over the whole sequence.
pub fn genome_density<I>(records: I, rules: &RuleTable, config: &Config) -> Result<DensityAggregate>
where
    I: IntoIterator<Item = Result<TeRecord>>,
{
    let mut aggregate = DensityAggregate::new();
    let mut excluded = 0usize;

    for record in records {
        let record = record?;
        if record.is_excluded(&config.excluded_chrom_marker) {
            excluded += 1;
            continue;
        }

        let key = classify(&record.label, rules)?;
        aggregate.entry(&key).add(record.interval.length());
    }

    if excluded > 0 {
        debug!(
            "Skipped {} records on {} chromosomes",
            excluded, config.excluded_chrom_marker
        );
    }
    Ok(aggregate)
}

/// Aggregate TE counts and overlapped bp, restricted to RoIs.
///
/// A record contributes the sum of its overlaps with every RoI on its
/// chromosome. Records with no overlap leave no entry at all.
pub fn roi_density<I>(
    records: I,
    rois: &RoiIntervals,
    rules: &RuleTable,
    config: &Config,
) -> Result<DensityAggregate>
where
    I: IntoIterator<Item = Result<TeRecord>>,
{
    let mut aggregate = DensityAggregate::new();
    let mut unmatched = 0usize;

    for record in records {
        let record = record?;
        if record.is_excluded(&config.excluded_chrom_marker) {
            continue;
        }

        let key = classify(&record.label, rules)?;

        let Some(intervals) = record.chrom.as_deref().and_then(|chrom| rois.get(chrom)) else {
            unmatched += 1;
            continue;
        };

        let overlap = total_overlap(record.interval, intervals);
        if overlap > 0 {
            aggregate.entry(&key).add(overlap);
        }
    }

    if unmatched > 0 {
        debug!("{} records on chromosomes without RoIs", unmatched);
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;
    use ahash::AHashMap;

    fn te(label: &str, chrom: &str, start: i64, end: i64) -> Result<TeRecord> {
        Ok(TeRecord::new(
            label.to_string(),
            Some(chrom.to_string()),
            start,
            end,
        ))
    }

    fn rois() -> RoiIntervals {
        let mut rois: RoiIntervals = AHashMap::new();
        rois.insert(
            "1".to_string(),
            vec![Interval::new(150, 250), Interval::new(300, 400)],
        );
        rois
    }

    #[test]
    fn test_genome_density_counts_lengths() {
        let records = vec![
            te("LINE/L1", "1", 100, 200),
            te("LINE/L1", "2", 0, 50),
            te("LINE/L2", "1", 0, 10),
            te("DNA", "1", 0, 100),
        ];
        let agg = genome_density(records, &RuleTable::new(), &Config::default()).unwrap();
        let line = agg.get("LINE").unwrap();
        assert_eq!(line["L1"].count, 2);
        assert_eq!(line["L1"].length, 150);
        assert_eq!(line["L2"].length, 10);
        assert_eq!(agg.get("DNA").unwrap()["No subclass"].length, 100);
    }

    #[test]
    fn test_genome_density_skips_random_chromosomes() {
        let records = vec![te("LINE/L1", "1", 0, 10), te("LINE/L1", "Un_random", 0, 90)];
        let agg = genome_density(records, &RuleTable::new(), &Config::default()).unwrap();
        assert_eq!(agg.class_total("LINE").length, 10);
    }

    #[test]
    fn test_genome_density_applies_rules() {
        let mut rules = RuleTable::new();
        rules
            .explicit
            .insert("DNA/hAT".to_string(), "Other/TEfam".to_string());
        let records = vec![te("DNA/hAT", "1", 0, 40)];
        let agg = genome_density(records, &rules, &Config::default()).unwrap();
        assert!(agg.get("DNA").is_none());
        assert_eq!(agg.get("Other").unwrap()["TEfam"].length, 40);
    }

    #[test]
    fn test_roi_density_sums_overlaps() {
        // Overlaps 150..250 by 50 and 300..400 by 20.
        let records = vec![te("LINE/L1", "1", 200, 320)];
        let agg = roi_density(records, &rois(), &RuleTable::new(), &Config::default()).unwrap();
        let stats = agg.get("LINE").unwrap()["L1"];
        assert_eq!(stats.count, 1);
        assert_eq!(stats.length, 50 + 20);
    }

    #[test]
    fn test_roi_density_excludes_non_overlapping() {
        let records = vec![
            te("LINE/L1", "1", 0, 100),
            te("SINE/Alu", "2", 150, 250),
            te("LTR/ERVK", "1", 100, 150),
        ];
        let agg = roi_density(records, &rois(), &RuleTable::new(), &Config::default()).unwrap();
        assert!(agg.is_empty());
    }

    #[test]
    fn test_classification_error_propagates() {
        let records = vec![te("a/b/c", "1", 0, 10)];
        assert!(genome_density(records, &RuleTable::new(), &Config::default()).is_err());
    }
}
