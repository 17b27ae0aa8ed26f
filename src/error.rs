//! Error kinds reported by repcalc.
//!
//! Library functions return `anyhow::Result`; the variants below travel inside
//! the `anyhow::Error` so the CLI can recover them with `downcast_ref` and map
//! each kind to its own exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Typed failures of a repcalc run.
#[derive(Debug, Error)]
pub enum RepcalcError {
    /// A rule file line that is neither blank, a comment, nor a valid rule.
    #[error("bad rule line in {path}:{line_no}: {reason}\n\t{line}")]
    ConfigFormat {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: &'static str,
    },

    /// A TE class/subclass label with more than one `/`.
    #[error("label '{label}' does not meet the class/subclass format (at most one '/')")]
    ClassificationFormat { label: String },

    /// A column-index token that is not a non-negative integer.
    #[error("invalid column index '{token}'")]
    ColumnIndex { token: String },

    /// A column-index list of the wrong length for the analysis mode.
    #[error("expected {expected} column indices, got {found}")]
    ColumnCount { expected: &'static str, found: usize },

    /// A data row shorter than one of the requested column indices.
    #[error("{path}:{line_no}: no column {index} in row")]
    ColumnOutOfRange {
        path: String,
        line_no: usize,
        index: usize,
    },

    /// A coordinate column that does not parse as an integer.
    #[error("{path}:{line_no}: column {index} value '{value}' is not an integer")]
    ColumnValue {
        path: String,
        line_no: usize,
        index: usize,
        value: String,
    },

    /// An unusable region length.
    #[error("invalid region length '{value}'")]
    Length { value: String },

    /// A transpose input whose rows differ in length.
    #[error("{path}: row {row} has {found} fields, expected {expected}")]
    RaggedTable {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl RepcalcError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            RepcalcError::ColumnIndex { .. }
            | RepcalcError::ColumnCount { .. }
            | RepcalcError::ColumnOutOfRange { .. } => 2,
            RepcalcError::ColumnValue { .. } => 3,
            RepcalcError::Length { .. } => 4,
            RepcalcError::ConfigFormat { .. } => 5,
            RepcalcError::ClassificationFormat { .. } => 6,
            RepcalcError::RaggedTable { .. } => 7,
        }
    }

    /// One-line summary shown after the detailed error.
    pub fn summary(&self) -> &'static str {
        match self {
            RepcalcError::ColumnIndex { .. } | RepcalcError::ColumnCount { .. } => {
                "Column index error. Please provide non-negative integer column indices. No output written."
            }
            RepcalcError::ColumnOutOfRange { .. } => "Column indexing error. No output written.",
            RepcalcError::ColumnValue { .. } => "Column value error. No output written.",
            RepcalcError::Length { .. } => {
                "Length error. No output written. Please provide a valid length."
            }
            RepcalcError::ConfigFormat { .. } => "Rule file format error. No output written.",
            RepcalcError::ClassificationFormat { .. } => {
                "Classification format error. No output written."
            }
            RepcalcError::RaggedTable { .. } => "Table is not rectangular. File left unchanged.",
        }
    }
}
