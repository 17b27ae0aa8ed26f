//! Region-of-interest file reader.
//!
//! Same row format as TE files: whitespace-delimited, one header line
//! skipped. The id column is only read in matrix mode.

use std::io::{BufRead, Lines};
use std::path::Path;

use ahash::AHashMap;
use anyhow::Result;

use crate::config::{Config, RoiColumns};
use crate::parser::util::{open_input, Row};
use crate::types::{Interval, RoiRecord};

/// Streaming reader yielding one [`RoiRecord`] per data line.
pub struct RoiReader<R: BufRead> {
    lines: Lines<R>,
    columns: RoiColumns,
    source: String,
    config: Config,
    line_no: usize,
}

impl RoiReader<Box<dyn BufRead + Send>> {
    /// Open a RoI file (supports .gz).
    pub fn from_path(path: &Path, columns: RoiColumns, config: &Config) -> Result<Self> {
        let reader = open_input(path, "RoI")?;
        Ok(RoiReader::new(
            reader,
            columns,
            &path.display().to_string(),
            config,
        ))
    }
}

impl<R: BufRead> RoiReader<R> {
    pub fn new(reader: R, columns: RoiColumns, source: &str, config: &Config) -> Self {
        RoiReader {
            lines: reader.lines(),
            columns,
            source: source.to_string(),
            config: config.clone(),
            line_no: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<RoiRecord> {
        let row = Row::split(line, &self.source, self.line_no);

        let id = match self.columns.id {
            Some(index) => Some(row.field(index)?.to_string()),
            None => None,
        };
        let chrom = self
            .config
            .normalize_chrom(row.field(self.columns.chrom)?)
            .to_string();
        let start = row.coordinate(self.columns.start)?;
        let end = row.coordinate(self.columns.end)?;

        Ok(RoiRecord::new(id, chrom, start, end))
    }
}

impl<R: BufRead> Iterator for RoiReader<R> {
    type Item = Result<RoiRecord>;

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

            if self.line_no == 1 || line.trim().is_empty() {
                continue;
            }

            return Some(self.parse_line(&line));
        }
    }
}

/// RoI intervals grouped by chromosome, in file order within each chromosome.
pub type RoiIntervals = AHashMap<String, Vec<Interval>>;

/// Collect RoI records into per-chromosome interval lists.
pub fn collect_roi_intervals<I>(records: I) -> Result<RoiIntervals>
where
    I: IntoIterator<Item = Result<RoiRecord>>,
{
    let mut by_chrom: RoiIntervals = AHashMap::new();
    for record in records {
        let record = record?;
        by_chrom.entry(record.chrom).or_default().push(record.interval);
    }
    Ok(by_chrom)
}
