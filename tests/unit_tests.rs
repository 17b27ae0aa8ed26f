//! Library-level tests for repcalc.
//!
//! These exercise the public API across module boundaries: label rewriting
//! feeding classification, readers feeding aggregation, and the analysis
//! entry points writing their reports.

use std::fs;
use std::path::{Path, PathBuf};

use repcalc::analysis::{DensityAnalysis, GenomeAnalysis, MatrixAnalysis};
use repcalc::config::{Config, RoiColumns, TeColumns};
use repcalc::error::RepcalcError;
use repcalc::matcher::{build_matrix, classify, genome_density, overlap_length, roi_density, TeIndex};
use repcalc::parser::{collect_roi_intervals, RoiReader, TeReader};
use repcalc::rules::{parse_rules, RuleMatch, RuleTable};
use repcalc::types::{ClassKey, Interval, NO_SUBCLASS};
use tempfile::TempDir;

// -------------------------------------------------------------------------
// Helper functions
// -------------------------------------------------------------------------

fn rules(content: &str) -> RuleTable {
    parse_rules(content.as_bytes(), Path::new("rules.txt")).unwrap()
}

fn repcalc_error(err: &anyhow::Error) -> &RepcalcError {
    err.downcast_ref::<RepcalcError>()
        .unwrap_or_else(|| panic!("not a RepcalcError: {err:#}"))
}

const TE_FILE: &str = "\
repeat\tchrom\tstart\tend
LINE/L1\tchr1\t100\t200
LINE/L1\tchr1\t180\t260
DNA/hAT?x\tchr1\t320\t340
SINE/Alu\tchr2\t10\t60
LTR/ERV1\tchr1_random\t100\t200
";

const ROI_FILE: &str = "\
id\tchrom\tstart\tend
R1\tchr1\t150\t250
R2\tchr1\t300\t400
";

fn te_records(config: &Config) -> TeReader<&'static [u8]> {
    TeReader::new(TE_FILE.as_bytes(), TeColumns::located(), "te.out", config)
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let te = dir.join("te.out");
    let roi = dir.join("roi.txt");
    fs::write(&te, TE_FILE).unwrap();
    fs::write(&roi, ROI_FILE).unwrap();
    (te, roi)
}

// -------------------------------------------------------------------------
// 1. Overlap arithmetic
// -------------------------------------------------------------------------

mod test_overlap {
    use super::*;

    #[test]
    fn test_te_starts_before_roi() {
        assert_eq!(overlap_length(Interval::new(100, 200), Interval::new(150, 250)), 50);
    }

    #[test]
    fn test_te_inside_roi() {
        assert_eq!(overlap_length(Interval::new(160, 170), Interval::new(150, 250)), 10);
    }

    #[test]
    fn test_roi_inside_te() {
        assert_eq!(overlap_length(Interval::new(100, 300), Interval::new(150, 250)), 100);
    }

    #[test]
    fn test_te_ends_after_roi() {
        assert_eq!(overlap_length(Interval::new(200, 300), Interval::new(150, 250)), 50);
    }

    #[test]
    fn test_touching_and_disjoint() {
        assert_eq!(overlap_length(Interval::new(100, 150), Interval::new(150, 250)), 0);
        assert_eq!(overlap_length(Interval::new(0, 10), Interval::new(150, 250)), 0);
        assert_eq!(overlap_length(Interval::new(300, 400), Interval::new(150, 250)), 0);
    }
}

// -------------------------------------------------------------------------
// 2. Rule tiers and classification
// -------------------------------------------------------------------------

mod test_rules {
    use super::*;

    #[test]
    fn test_explicit_rule_rewrites_label() {
        let table = rules("DNA/hAT = Other/TEfam\n");
        let key = classify("DNA/hAT", &table).unwrap();
        assert_eq!(key, ClassKey::from_label("Other/TEfam").unwrap());
    }

    #[test]
    fn test_wildcard_tiers() {
        let table = rules("$/L1 = LINE1/$\nDNA/* : TIR/*\n");
        assert_eq!(table.rewrite("LINE/L1").unwrap(), "LINE1/LINE");
        assert_eq!(table.rewrite("DNA/hAT").unwrap(), "TIR/hAT");
        assert_eq!(table.rewrite("SINE/Alu").unwrap(), "SINE/Alu");
    }

    #[test]
    fn test_conflicting_wildcards_prefer_class_wildcard() {
        let table = rules("$/hAT = A/$\nDNA/* = B/*\n");
        assert!(matches!(
            table.resolve("DNA/hAT").unwrap(),
            RuleMatch::WildcardClass(_)
        ));
        assert_eq!(table.rewrite("DNA/hAT").unwrap(), "A/DNA");
    }

    #[test]
    fn test_label_without_subclass() {
        let key = classify("Simple_repeat", &RuleTable::new()).unwrap();
        assert_eq!(key.class, "Simple_repeat");
        assert_eq!(key.subclass, NO_SUBCLASS);
    }

    #[test]
    fn test_bad_label_is_classification_error() {
        let err = classify("a/b/c", &RuleTable::new()).unwrap_err();
        assert!(matches!(
            repcalc_error(&err),
            RepcalcError::ClassificationFormat { .. }
        ));
    }

    #[test]
    fn test_bad_rule_line_reports_line_number() {
        let err = parse_rules(
            "# header\nLINE = LINE2\nDNA = x : y\n".as_bytes(),
            Path::new("rules.txt"),
        )
        .unwrap_err();
        match repcalc_error(&err) {
            RepcalcError::ConfigFormat { line_no, .. } => assert_eq!(*line_no, 3),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(repcalc_error(&err).exit_code(), 5);
    }
}

// -------------------------------------------------------------------------
// 3. Aggregation from readers
// -------------------------------------------------------------------------

mod test_aggregation {
    use super::*;

    #[test]
    fn test_genome_density_excludes_random_chromosomes() {
        let config = Config::default();
        let agg = genome_density(te_records(&config), &RuleTable::new(), &config).unwrap();
        assert!(agg.get("LTR").is_none());
        let line = agg.class_total("LINE");
        assert_eq!(line.count, 2);
        assert_eq!(line.length, 180);
    }

    #[test]
    fn test_roi_density_sums_overlaps() {
        let config = Config::default();
        let rois = collect_roi_intervals(RoiReader::new(
            ROI_FILE.as_bytes(),
            RoiColumns::density(),
            "roi.txt",
            &config,
        ))
        .unwrap();
        let agg = roi_density(te_records(&config), &rois, &RuleTable::new(), &config).unwrap();

        // 100-200 and 180-260 overlap R1 by 50 and 70.
        let l1 = &agg.get("LINE").unwrap()["L1"];
        assert_eq!(l1.count, 2);
        assert_eq!(l1.length, 120);
        assert_eq!(agg.class_total("DNA").length, 20);
        assert!(agg.get("SINE").is_none());
    }

    #[test]
    fn test_matrix_accumulates_repeated_records() {
        let config = Config::default();
        let index = TeIndex::build(te_records(&config), &RuleTable::new(), &config).unwrap();
        assert_eq!(index.num_records(), 4);
        assert_eq!(index.num_chromosomes(), 2);

        let rois = RoiReader::new(ROI_FILE.as_bytes(), RoiColumns::matrix(), "roi.txt", &config);
        let matrix = build_matrix(rois, &index).unwrap();
        let r1 = matrix.cell("LINE", "L1", "R1").unwrap();
        assert!((r1 - 120.0).abs() < 1e-9);
        let r2 = matrix.cell("DNA", "hAT", "R2").unwrap();
        assert!((r2 - 20.0).abs() < 1e-9);
        assert_eq!(matrix.cell("LINE", "L1", "R2"), None);
    }
}

// -------------------------------------------------------------------------
// 4. Analysis entry points
// -------------------------------------------------------------------------

mod test_analysis {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        Config {
            output_dir: dir.join("output"),
            ..Config::default()
        }
    }

    #[test]
    fn test_genome_analysis_writes_under_output_dir() {
        let tmp = TempDir::new().unwrap();
        let (te, _) = write_inputs(tmp.path());
        let analysis = GenomeAnalysis {
            region_length: 1000,
            te_path: te,
            te_columns: TeColumns::genome(),
            rules_path: None,
            output: PathBuf::from("genome.tbl"),
        };

        let written = analysis.run(&config_in(tmp.path())).unwrap();
        assert_eq!(written, tmp.path().join("output").join("genome.tbl"));
        let content = fs::read_to_string(written).unwrap();
        assert!(content.contains("LINE:\t\t2\t180 bp\t18.0 %\n"));
        // No chromosome column in genome mode, so nothing is excluded.
        assert!(content.contains("LTR:\t\t1\t100 bp\t10.0 %\n"));
    }

    #[test]
    fn test_density_analysis_with_rules() {
        let tmp = TempDir::new().unwrap();
        let (te, roi) = write_inputs(tmp.path());
        let rules_path = tmp.path().join("rules.txt");
        fs::write(&rules_path, "LINE/L1 = Retro/L1\n").unwrap();

        let analysis = DensityAnalysis {
            region_length: 1000,
            te_path: te,
            te_columns: TeColumns::located(),
            roi_path: roi,
            roi_columns: RoiColumns::density(),
            rules_path: Some(rules_path),
            output: tmp.path().join("density.tbl"),
        };
        let written = analysis.run(&config_in(tmp.path())).unwrap();
        let content = fs::read_to_string(written).unwrap();
        assert!(!content.contains("LINE:"));
        assert!(content.contains("Retro:\t\t2\t120 bp\t12.0 %\n"));
    }

    #[test]
    fn test_matrix_analysis_transposed() {
        let tmp = TempDir::new().unwrap();
        let (te, roi) = write_inputs(tmp.path());
        let analysis = MatrixAnalysis {
            te_path: te,
            te_columns: TeColumns::located(),
            roi_path: roi,
            roi_columns: RoiColumns::matrix(),
            rules_path: None,
            output: tmp.path().join("matrix.tsv"),
            transpose: true,
        };
        let written = analysis.run(&config_in(tmp.path())).unwrap();
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "Class\t[LINE]\t[DNA]\nR1\t120.0\t0.0\nR2\t0.0\t20.0\n"
        );
    }

    #[test]
    fn test_failed_analysis_leaves_no_output() {
        let tmp = TempDir::new().unwrap();
        let (te, _) = write_inputs(tmp.path());
        let analysis = GenomeAnalysis {
            region_length: 1000,
            te_path: te,
            te_columns: TeColumns::parse_genome(&["0", "2", "9"]).unwrap(),
            rules_path: None,
            output: tmp.path().join("genome.tbl"),
        };
        let err = analysis.run(&config_in(tmp.path())).unwrap_err();
        assert_eq!(repcalc_error(&err).exit_code(), 2);
        assert!(!tmp.path().join("genome.tbl").exists());
    }
}
