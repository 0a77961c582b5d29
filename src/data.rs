//! Ragged CSV files where every row is one time series.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::{fmt::Display, fs, path::Path};

/// Trailing zero padding is looked for among this many final values.
const PAD_WINDOW: usize = 10;

/// Read a CSV file whose rows are time series of different lengths.
///
/// Every line is one row, so a blank line yields an empty series and row `i`
/// of the result always matches line `i` of the file. Empty fields are
/// skipped. A row ending in zero is cut at the first zero among its last ten
/// values, which strips the padding some recorders add.
pub fn read_ragged_csv<P: AsRef<Path>>(file: P) -> Result<Vec<Vec<f64>>> {
    let file = file.as_ref();
    let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

    let mut series_vec = Vec::new();
    for (i_row, line) in contents.lines().enumerate() {
        let series = parse_row(line, i_row)?;
        series_vec.push(series);
    }

    Ok(series_vec)
}

fn parse_row(line: &str, i_row: usize) -> Result<Vec<f64>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader
        .read_record(&mut record)
        .with_context(|| format!("failed to read row {i_row}"))?;

    let mut series = Vec::with_capacity(record.len());
    for (i_col, field) in record.iter().enumerate() {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let val = field
            .parse::<f64>()
            .with_context(|| format!("invalid value {field:?} at row {i_row}, column {i_col}"))?;
        series.push(val);
    }

    strip_zero_padding(&mut series);
    Ok(series)
}

/// Write rows of possibly different lengths, one per line.
pub fn write_ragged_csv<P, T>(file: P, rows: &[Vec<T>]) -> Result<()>
where
    P: AsRef<Path>,
    T: Display,
{
    let file = file.as_ref();
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(file)
        .with_context(|| format!("failed to create {file:?}"))?;

    for (i_row, row) in rows.iter().enumerate() {
        // An empty record would be skipped, keep the row count intact.
        let res = if row.is_empty() {
            writer.write_record([""])
        } else {
            writer.write_record(row.iter().map(|val| val.to_string()))
        };
        res.with_context(|| format!("failed to write row {i_row}"))?;
    }

    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

fn strip_zero_padding(series: &mut Vec<f64>) {
    if series.last() != Some(&0.0) {
        return;
    }
    let start = series.len().saturating_sub(PAD_WINDOW);
    if let Some(offset) = series[start..].iter().position(|&val| val == 0.0) {
        series.truncate(start + offset);
    }
}
