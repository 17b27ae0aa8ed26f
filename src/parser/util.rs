//! Utility functions for file parsing.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::RepcalcError;

/// Creates a buffered reader that automatically handles gzip-compressed files.
///
/// This function checks if the file path ends with ".gz" and wraps the file
/// in a GzDecoder if so. Otherwise, it returns a plain buffered reader.
pub fn create_buffered_reader(file: File, path: &Path) -> Box<dyn BufRead + Send> {
    if path.to_string_lossy().ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

/// Open `path` for reading, decompressing `.gz` files.
pub fn open_input(path: &Path, kind: &str) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file {}", kind, path.display()))?;
    Ok(create_buffered_reader(file, path))
}

/// A whitespace-split data line with its position for error reporting.
pub struct Row<'a> {
    fields: Vec<&'a str>,
    source: &'a str,
    line_no: usize,
}

impl<'a> Row<'a> {
    pub fn split(line: &'a str, source: &'a str, line_no: usize) -> Self {
        Row {
            fields: line.split_whitespace().collect(),
            source,
            line_no,
        }
    }

    /// The field at `index`, or a column-indexing error if the row is shorter.
    pub fn field(&self, index: usize) -> Result<&'a str> {
        self.fields.get(index).copied().ok_or_else(|| {
            RepcalcError::ColumnOutOfRange {
                path: self.source.to_string(),
                line_no: self.line_no,
                index,
            }
            .into()
        })
    }

    /// The field at `index` parsed as an integer coordinate.
    pub fn coordinate(&self, index: usize) -> Result<i64> {
        let value = self.field(index)?;
        value.parse::<i64>().map_err(|_| {
            RepcalcError::ColumnValue {
                path: self.source.to_string(),
                line_no: self.line_no,
                index,
                value: value.to_string(),
            }
            .into()
        })
    }
}
