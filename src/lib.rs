//! repcalc - Transposable element density and overlap library.
//!
//! This library computes transposable element (TE) statistics from annotation
//! files, optionally against genomic regions of interest (RoIs).
//!
//! # Features
//!
//! - Rewrite TE class/subclass labels with explicit and wildcard rules
//! - TE density over a whole sequence (genome mode)
//! - TE density restricted to RoI overlap (density mode)
//! - TE class x RoI percent-overlap matrix (matrix mode), with optional transpose
//! - Read plain or gzip-compressed inputs
//!
//! # Example
//!
//! ```ignore
//! use repcalc::analysis::GenomeAnalysis;
//! use repcalc::config::{Config, TeColumns};
//! use std::path::PathBuf;
//!
//! let analysis = GenomeAnalysis {
//!     region_length: 3_000_000,
//!     te_path: PathBuf::from("genome.fa.out"),
//!     te_columns: TeColumns::genome(),
//!     rules_path: Some(PathBuf::from("rules.txt")),
//!     output: PathBuf::from("genome.tbl"),
//! };
//! let written = analysis.run(&Config::default())?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod rules;
pub mod types;

pub use analysis::{DensityAnalysis, GenomeAnalysis, MatrixAnalysis};
pub use config::{Config, RoiColumns, TeColumns};
pub use error::RepcalcError;
pub use rules::{RuleMatch, RuleTable};
pub use types::{ClassKey, DensityAggregate, Interval, MatrixAggregate, RoiRecord, TeRecord};
