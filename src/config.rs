//! Configuration and defaults for repcalc.
//!
//! This module contains the engine configuration passed into every analysis
//! entry point and the column layouts used to read TE and RoI files.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::RepcalcError;

/// Directory that receives outputs given as a bare file name.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Chromosomes whose (stripped) name contains this marker are ignored.
pub const DEFAULT_EXCLUDED_CHROM_MARKER: &str = "_random";

/// Decimals shown for density percentages.
pub const DENSITY_PRECISION: usize = 3;

/// Decimals shown for matrix cells.
pub const MATRIX_PRECISION: usize = 5;

/// Configuration shared by the analysis entry points.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for outputs named without a directory component.
    pub output_dir: PathBuf,
    /// Prefix removed from chromosome names before comparison.
    pub chrom_prefix: String,
    /// Marker identifying chromosomes to skip.
    pub excluded_chrom_marker: String,
    pub density_precision: usize,
    pub matrix_precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chrom_prefix: "chr".to_string(),
            excluded_chrom_marker: DEFAULT_EXCLUDED_CHROM_MARKER.to_string(),
            density_precision: DENSITY_PRECISION,
            matrix_precision: MATRIX_PRECISION,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a bare file name under `output_dir`; keep any other path as given.
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        let bare = path
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty());
        if bare {
            self.output_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Strip the configured prefix from a chromosome name.
    pub fn normalize_chrom<'a>(&self, chrom: &'a str) -> &'a str {
        chrom.strip_prefix(self.chrom_prefix.as_str()).unwrap_or(chrom)
    }
}

/// Parse a region length; it must be a positive integer.
pub fn parse_length(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(length) if length > 0 => Ok(length),
        _ => Err(RepcalcError::Length {
            value: value.to_string(),
        }
        .into()),
    }
}

/// Parse column-index tokens into 0-based indices.
pub fn parse_column_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<usize>> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            token.trim().parse::<usize>().map_err(|_| {
                anyhow::Error::from(RepcalcError::ColumnIndex {
                    token: token.to_string(),
                })
            })
        })
        .collect()
}

/// Column layout of a TE annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeColumns {
    pub label: usize,
    pub chrom: Option<usize>,
    pub start: usize,
    pub end: usize,
}

impl TeColumns {
    /// Genome mode: label, start, end. No chromosome is read.
    pub fn genome() -> Self {
        TeColumns {
            label: 0,
            chrom: None,
            start: 2,
            end: 3,
        }
    }

    /// Density and matrix modes: label, chromosome, start, end.
    pub fn located() -> Self {
        TeColumns {
            label: 0,
            chrom: Some(1),
            start: 2,
            end: 3,
        }
    }

    /// Custom genome layout: `label,start,end` or `label,chrom,start,end`.
    pub fn parse_genome<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match parse_column_tokens(tokens)?.as_slice() {
            &[label, start, end] => Ok(TeColumns {
                label,
                chrom: None,
                start,
                end,
            }),
            &[label, chrom, start, end] => Ok(TeColumns {
                label,
                chrom: Some(chrom),
                start,
                end,
            }),
            other => Err(RepcalcError::ColumnCount {
                expected: "3 or 4",
                found: other.len(),
            }
            .into()),
        }
    }

    /// Custom located layout: `label,chrom,start,end`.
    pub fn parse_located<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match parse_column_tokens(tokens)?.as_slice() {
            &[label, chrom, start, end] => Ok(TeColumns {
                label,
                chrom: Some(chrom),
                start,
                end,
            }),
            other => Err(RepcalcError::ColumnCount {
                expected: "4",
                found: other.len(),
            }
            .into()),
        }
    }
}

/// Column layout of a RoI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiColumns {
    pub id: Option<usize>,
    pub chrom: usize,
    pub start: usize,
    pub end: usize,
}

impl RoiColumns {
    /// Density mode: chromosome, start, end.
    pub fn density() -> Self {
        RoiColumns {
            id: None,
            chrom: 1,
            start: 2,
            end: 3,
        }
    }

    /// Matrix mode: id, chromosome, start, end.
    pub fn matrix() -> Self {
        RoiColumns {
            id: Some(0),
            chrom: 1,
            start: 2,
            end: 3,
        }
    }

    /// Custom density layout: `chrom,start,end`.
    pub fn parse_density<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match parse_column_tokens(tokens)?.as_slice() {
            &[chrom, start, end] => Ok(RoiColumns {
                id: None,
                chrom,
                start,
                end,
            }),
            other => Err(RepcalcError::ColumnCount {
                expected: "3",
                found: other.len(),
            }
            .into()),
        }
    }

    /// Custom matrix layout: `id,chrom,start,end`.
    pub fn parse_matrix<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match parse_column_tokens(tokens)?.as_slice() {
            &[id, chrom, start, end] => Ok(RoiColumns {
                id: Some(id),
                chrom,
                start,
                end,
            }),
            other => Err(RepcalcError::ColumnCount {
                expected: "4",
                found: other.len(),
            }
            .into()),
        }
    }
}
