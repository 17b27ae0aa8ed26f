//! The three analysis entry points.
//!
//! Each analysis reads and aggregates all of its input before the output file
//! is created, so a failed run never leaves a report behind.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::config::{Config, RoiColumns, TeColumns};
use crate::matcher::{build_matrix, genome_density, roi_density, TeIndex};
use crate::output::{transpose_file, write_atomically, write_density_table, write_matrix};
use crate::parser::{collect_roi_intervals, RoiReader, TeReader};
use crate::rules::{load_rules, RuleTable};

/// Load the rule file if one was given; otherwise no label is rewritten.
pub fn load_rule_table(path: Option<&Path>) -> Result<RuleTable> {
    match path {
        Some(path) => {
            info!("Loading rules from {}", path.display());
            load_rules(path)
        }
        None => Ok(RuleTable::new()),
    }
}

/// TE density across an entire sequence of `region_length` bp.
#[derive(Debug, Clone)]
pub struct GenomeAnalysis {
    pub region_length: u64,
    pub te_path: PathBuf,
    pub te_columns: TeColumns,
    pub rules_path: Option<PathBuf>,
    pub output: PathBuf,
}

impl GenomeAnalysis {
    /// Run the analysis and return the path of the written table.
    pub fn run(&self, config: &Config) -> Result<PathBuf> {
        let rules = load_rule_table(self.rules_path.as_deref())?;

        info!("Loading TE data from {}", self.te_path.display());
        let records = TeReader::from_path(&self.te_path, self.te_columns, config)?;
        let aggregate = genome_density(records, &rules, config)?;

        let output = config.resolve_output(&self.output);
        info!("Writing output to {}", output.display());
        write_atomically(&output, |writer| {
            write_density_table(
                writer,
                &self.te_path.display().to_string(),
                self.region_length,
                &aggregate,
                config.density_precision,
            )
        })?;
        Ok(output)
    }
}

/// TE density restricted to overlap with regions of interest.
#[derive(Debug, Clone)]
pub struct DensityAnalysis {
    pub region_length: u64,
    pub te_path: PathBuf,
    pub te_columns: TeColumns,
    pub roi_path: PathBuf,
    pub roi_columns: RoiColumns,
    pub rules_path: Option<PathBuf>,
    pub output: PathBuf,
}

impl DensityAnalysis {
    /// Run the analysis and return the path of the written table.
    pub fn run(&self, config: &Config) -> Result<PathBuf> {
        let rules = load_rule_table(self.rules_path.as_deref())?;

        info!("Loading region of interest data from {}", self.roi_path.display());
        let rois = collect_roi_intervals(RoiReader::from_path(
            &self.roi_path,
            self.roi_columns,
            config,
        )?)?;

        info!("Loading TE data from {}", self.te_path.display());
        let records = TeReader::from_path(&self.te_path, self.te_columns, config)?;
        let aggregate = roi_density(records, &rois, &rules, config)?;

        let output = config.resolve_output(&self.output);
        info!("Writing output to {}", output.display());
        write_atomically(&output, |writer| {
            write_density_table(
                writer,
                &self.te_path.display().to_string(),
                self.region_length,
                &aggregate,
                config.density_precision,
            )
        })?;
        Ok(output)
    }
}

/// TE class x RoI percent-overlap matrix.
#[derive(Debug, Clone)]
pub struct MatrixAnalysis {
    pub te_path: PathBuf,
    pub te_columns: TeColumns,
    pub roi_path: PathBuf,
    pub roi_columns: RoiColumns,
    pub rules_path: Option<PathBuf>,
    pub output: PathBuf,
    /// Write RoIs as rows and classes as columns.
    pub transpose: bool,
}

impl MatrixAnalysis {
    /// Run the analysis and return the path of the written matrix.
    pub fn run(&self, config: &Config) -> Result<PathBuf> {
        let rules = load_rule_table(self.rules_path.as_deref())?;

        info!("Loading TE data from {}", self.te_path.display());
        let records = TeReader::from_path(&self.te_path, self.te_columns, config)?;
        let index = TeIndex::build(records, &rules, config)?;
        info!(
            "Indexed {} TE records on {} chromosomes",
            index.num_records(),
            index.num_chromosomes()
        );

        info!("Loading region of interest data from {}", self.roi_path.display());
        let rois = RoiReader::from_path(&self.roi_path, self.roi_columns, config)?;
        let matrix = build_matrix(rois, &index)?;

        let output = config.resolve_output(&self.output);
        info!(
            "Writing {} x {} matrix to {}",
            matrix.classes().count(),
            matrix.num_rois(),
            output.display()
        );
        write_atomically(&output, |writer| {
            write_matrix(writer, &matrix, config.matrix_precision)
        })?;

        if self.transpose {
            transpose_file(&output)?;
        }
        Ok(output)
    }
}
