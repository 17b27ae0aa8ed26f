//! Output formatting for repcalc results.
//!
//! This module renders density aggregates as a fixed-layout table, matrix
//! aggregates as a tab-delimited table, and transposes tab-delimited files.
//! Files are written through a temporary file that replaces the target only
//! once writing has finished.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tempfile::Builder;

use crate::error::RepcalcError;
use crate::types::{DensityAggregate, DensityStats, MatrixAggregate, NO_SUBCLASS};

/// Classes reported first, in this order.
pub const MAIN_CLASSES: [&str; 4] = ["SINE", "LINE", "LTR", "DNA"];

/// Classes merged into the single `Unclassified` line.
pub const UNCLASSIFIED_CLASSES: [&str; 3] = ["Unknown", "Other", "Unclassified"];

const TABLE_WIDTH: usize = 50;

fn round_to(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round to `places` decimals and print the shortest form, keeping at least one decimal.
pub fn format_decimal(value: f64, places: usize) -> String {
    let text = round_to(value, places).to_string();
    if text.contains('.') || !text.chars().all(|c| c.is_ascii_digit() || c == '-') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Percentage of `region_length` covered by `length`.
///
/// Values that round to zero are shown as `< 0.0005` (for 3 decimals).
pub fn format_percent(length: i64, region_length: u64, precision: usize) -> String {
    let percent = 100.0 * length as f64 / region_length as f64;
    if round_to(percent, precision) == 0.0 {
        format!("< 0.{}5", "0".repeat(precision))
    } else {
        format_decimal(percent, precision)
    }
}

/// Write `class:` and its subclass lines. Returns the class length total.
fn write_class_block<W: Write>(
    writer: &mut W,
    class: &str,
    subclasses: &IndexMap<String, DensityStats>,
    region_length: u64,
    precision: usize,
) -> Result<i64> {
    let mut total = DensityStats::default();
    for stats in subclasses.values() {
        total.merge(stats);
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{}:\t\t{}\t{} bp\t{} %",
        class,
        total.count,
        total.length,
        format_percent(total.length, region_length, precision)
    )?;

    let named = subclasses.iter().filter(|(name, _)| name.as_str() != NO_SUBCLASS);
    let unnamed = subclasses.get_key_value(NO_SUBCLASS);
    for (subclass, stats) in named.chain(unnamed) {
        writeln!(
            writer,
            "      {}\t{}\t{} bp\t{} %",
            subclass,
            stats.count,
            stats.length,
            format_percent(stats.length, region_length, precision)
        )?;
    }

    Ok(total.length)
}

/// Write the density table.
///
/// Layout: header, the main classes that are present, the merged
/// `Unclassified` line (only when non-zero), the running total of
/// interspersed repeats, then every other class.
pub fn write_density_table<W: Write>(
    writer: &mut W,
    source_name: &str,
    region_length: u64,
    aggregate: &DensityAggregate,
    precision: usize,
) -> Result<()> {
    let rule = "=".repeat(TABLE_WIDTH);
    let source_name = source_name.split(".out").next().unwrap_or(source_name);

    writeln!(writer, "{rule}")?;
    writeln!(writer, "filename: {source_name}")?;
    writeln!(writer, "total length: {region_length}")?;
    writeln!(writer, "{rule}")?;
    writeln!(writer, "               number of      length   percentage")?;
    writeln!(writer, "               elements*    occupied  of sequence")?;
    writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;

    let mut interspersed = 0i64;
    for class in MAIN_CLASSES {
        if let Some(subclasses) = aggregate.get(class) {
            interspersed += write_class_block(writer, class, subclasses, region_length, precision)?;
        }
    }

    let mut unclassified = DensityStats::default();
    for class in UNCLASSIFIED_CLASSES {
        unclassified.merge(&aggregate.class_total(class));
    }
    interspersed += unclassified.length;
    if unclassified.length != 0 {
        writeln!(writer)?;
        writeln!(
            writer,
            "Unclassified:\t\t{}\t{}bp\t{}%",
            unclassified.count,
            unclassified.length,
            format_percent(unclassified.length, region_length, precision)
        )?;
    }

    writeln!(
        writer,
        "Total interspersed repeats:\t{}bp\t{}%",
        interspersed,
        format_percent(interspersed, region_length, precision)
    )?;
    writeln!(writer)?;
    writeln!(writer)?;

    for (class, subclasses) in aggregate.classes() {
        let class = class.as_str();
        if MAIN_CLASSES.contains(&class) || UNCLASSIFIED_CLASSES.contains(&class) {
            continue;
        }
        write_class_block(writer, class, subclasses, region_length, precision)?;
    }

    writeln!(writer, "{rule}")?;
    Ok(())
}

/// Write the TE x RoI matrix.
///
/// One bracketed row per class with its subclasses summed; classes with more
/// than one subclass also get one `class/subclass` row each. Missing cells
/// are written as `0.0`.
pub fn write_matrix<W: Write>(
    writer: &mut W,
    matrix: &MatrixAggregate,
    precision: usize,
) -> Result<()> {
    let mut header = String::from("Class");
    for id in matrix.roi_ids() {
        header.push('\t');
        header.push_str(id);
    }
    writeln!(writer, "{header}")?;

    let format_cell = |value: Option<f64>| match value {
        Some(v) => format_decimal(v, precision),
        None => "0.0".to_string(),
    };

    for class in matrix.classes() {
        let mut line = format!("[{class}]");
        for id in matrix.roi_ids() {
            line.push('\t');
            line.push_str(&format_cell(matrix.class_cell(class, id)));
        }
        writeln!(writer, "{line}")?;

        if matrix.num_subclasses(class) <= 1 {
            continue;
        }
        for subclass in matrix.subclasses(class) {
            let mut line = format!("{class}/{subclass}");
            for id in matrix.roi_ids() {
                line.push('\t');
                line.push_str(&format_cell(matrix.cell(class, subclass, id)));
            }
            writeln!(writer, "{line}")?;
        }
    }

    Ok(())
}

/// Transpose whitespace-delimited text into tab-delimited text.
///
/// Blank lines are ignored. Every row must have as many fields as the first.
pub fn transpose_table(content: &str, source: &Path) -> Result<String> {
    let rows: Vec<Vec<&str>> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().collect())
        .collect();

    let Some(width) = rows.first().map(Vec::len) else {
        return Ok(String::new());
    };
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(RepcalcError::RaggedTable {
                path: source.to_path_buf(),
                row: i + 1,
                found: row.len(),
                expected: width,
            }
            .into());
        }
    }

    let mut out = String::with_capacity(content.len());
    for col in 0..width {
        let fields: Vec<&str> = rows.iter().map(|row| row[col]).collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    Ok(out)
}

/// Rewrite `path` with its transpose.
pub fn transpose_file(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let transposed = transpose_table(&content, path)?;
    write_atomically(path, |writer| {
        writer.write_all(transposed.as_bytes())?;
        Ok(())
    })
}

/// Write `path` through a temporary file in the same directory.
///
/// The target is only replaced after `write` succeeds and the data is
/// flushed; on error the temporary file is removed and the target untouched.
/// An existing target keeps its permissions. A new file gets the usual
/// umask-filtered mode rather than the private temp-file mode.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = Builder::new();
    builder.prefix(".repcalc");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    Ok(())
}
