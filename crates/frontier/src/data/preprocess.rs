//! Flatten a two-level header download into a clean price table.
//!
//! Market-data downloads for several tickers carry one header row of tickers
//! and one of price fields, in either order, usually followed by a lone
//! `Date` label row:
//!
//! ```text
//! Ticker,AAPL,AAPL,MSFT,MSFT
//! Price,Close,Volume,Close,Volume
//! Date,,,,
//! 2020-01-02,75.09,135480400,160.62,22622100
//! ```
//!
//! Only the columns of one field (default `Close`) are kept, labelled by ticker.

use std::io::Read;
use std::path::Path;

use frontier_core::{PriceRow, PriceTable};

use super::price_csv::{parse_date, write_price_table};
use super::{FileError, record_line};
use crate::util::io::atomic_write_bytes;

pub const DEFAULT_FIELD: &str = "Close";

/// What flattening kept and dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    pub rows_kept: usize,
    /// Rows with a missing or non-numeric value in a kept column
    pub rows_dropped: usize,
    /// Non-date rows with no values, e.g. the `Date` label row
    pub label_rows: usize,
}

fn count_field(row: &csv::StringRecord, field: &str) -> usize {
    row.iter().skip(1).filter(|c| c.eq_ignore_ascii_case(field)).count()
}

/// Pick `(column, ticker)` pairs for `field` from the two header rows
fn select_columns(
    first: &csv::StringRecord,
    second: &csv::StringRecord,
    field: &str,
) -> Result<Vec<(usize, String)>, FileError> {
    let (fields, tickers) = if count_field(second, field) > 0 {
        (second, first)
    } else if count_field(first, field) > 0 {
        (first, second)
    } else {
        return Err(FileError::Header(format!(
            "no {field:?} columns in the first two header rows"
        )));
    };

    let mut columns: Vec<(usize, String)> = Vec::new();
    for (idx, cell) in fields.iter().enumerate().skip(1) {
        if !cell.eq_ignore_ascii_case(field) {
            continue;
        }
        let ticker = tickers.get(idx).unwrap_or_default();
        if ticker.is_empty() {
            return Err(FileError::Header(format!("column {idx} has no ticker")));
        }
        if columns.iter().any(|(_, t)| t == ticker) {
            return Err(FileError::Header(format!(
                "ticker {ticker} has more than one {field:?} column"
            )));
        }
        columns.push((idx, ticker.to_string()));
    }
    Ok(columns)
}

/// Flatten a two-level header CSV into a price table
pub fn flatten_multi_index<R: Read>(
    reader: R,
    field: &str,
) -> Result<(PriceTable, PreprocessReport), FileError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = csv.records();

    let (Some(first), Some(second)) = (records.next(), records.next()) else {
        return Err(FileError::Header(
            "expected two header rows (ticker and price field)".to_string(),
        ));
    };
    let columns = select_columns(&first?, &second?, field)?;

    let mut report = PreprocessReport::default();
    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let line = record_line(&record);
        let cells: Vec<&str> = columns
            .iter()
            .map(|(idx, _)| record.get(*idx).unwrap_or_default())
            .collect();
        let date_cell = record.get(0).unwrap_or_default();

        let Some(date) = parse_date(date_cell) else {
            if cells.iter().all(|c| c.is_empty()) {
                report.label_rows += 1;
                continue;
            }
            return Err(FileError::Date {
                line,
                value: date_cell.to_string(),
            });
        };

        let prices: Option<Vec<f64>> = cells.iter().map(|c| c.parse().ok()).collect();
        match prices {
            Some(prices) => {
                rows.push(PriceRow::new(date, prices));
                report.rows_kept += 1;
            }
            None => {
                tracing::debug!(line, %date, "Dropping row with missing {field} values");
                report.rows_dropped += 1;
            }
        }
    }

    rows.sort_by_key(|row| row.date);
    let symbols = columns.into_iter().map(|(_, ticker)| ticker).collect();
    Ok((PriceTable::new(symbols, rows)?, report))
}

/// Read `input`, flatten it and atomically write the clean table to `output`
pub fn preprocess_file(
    input: &Path,
    output: &Path,
    field: &str,
) -> Result<PreprocessReport, FileError> {
    let file = std::fs::File::open(input)
        .map_err(|e| FileError::Io(format!("Failed to open {}: {e}", input.display())))?;
    let (table, report) = flatten_multi_index(std::io::BufReader::new(file), field)?;

    let mut buffer = Vec::new();
    write_price_table(&table, &mut buffer)?;
    atomic_write_bytes(output, &buffer)
        .map_err(|e| FileError::Io(format!("Failed to write {}: {e}", output.display())))?;

    if report.rows_dropped > 0 {
        tracing::warn!(
            dropped = report.rows_dropped,
            "Dropped rows with missing {field} values"
        );
    }
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        tickers = table.num_assets(),
        rows = report.rows_kept,
        "Preprocessed price download"
    );
    Ok(report)
}
