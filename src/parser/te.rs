//! TE annotation file reader.
//!
//! Whitespace-delimited rows, one header line skipped unconditionally. The
//! label, chromosome, start and end are taken from the configured columns.

use std::io::{BufRead, Lines};
use std::path::Path;

use anyhow::Result;

use crate::config::{Config, TeColumns};
use crate::parser::util::{open_input, Row};
use crate::types::TeRecord;

/// Streaming reader yielding one [`TeRecord`] per data line.
pub struct TeReader<R: BufRead> {
    lines: Lines<R>,
    columns: TeColumns,
    source: String,
    config: Config,
    line_no: usize,
}

impl TeReader<Box<dyn BufRead + Send>> {
    /// Open a TE annotation file (supports .gz).
    pub fn from_path(path: &Path, columns: TeColumns, config: &Config) -> Result<Self> {
        let reader = open_input(path, "TE annotation")?;
        Ok(TeReader::new(
            reader,
            columns,
            &path.display().to_string(),
            config,
        ))
    }
}

impl<R: BufRead> TeReader<R> {
    pub fn new(reader: R, columns: TeColumns, source: &str, config: &Config) -> Self {
        TeReader {
            lines: reader.lines(),
            columns,
            source: source.to_string(),
            config: config.clone(),
            line_no: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<TeRecord> {
        let row = Row::split(line, &self.source, self.line_no);

        let raw_label = row.field(self.columns.label)?;
        let label = raw_label.split('?').next().unwrap_or_default().to_string();

        let chrom = match self.columns.chrom {
            Some(index) => {
                let chrom = row.field(index)?;
                Some(self.config.normalize_chrom(chrom).to_string())
            }
            None => None,
        };

        let start = row.coordinate(self.columns.start)?;
        let end = row.coordinate(self.columns.end)?;

        Ok(TeRecord::new(label, chrom, start, end))
    }
}

impl<R: BufRead> Iterator for TeReader<R> {
    type Item = Result<TeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("Failed to read {}", self.source));
                    return Some(Err(err));
                }
            };
            self.line_no += 1;

            // Header
            if self.line_no == 1 {
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            return Some(self.parse_line(&line));
        }
    }
}
