//! Clean price table CSV
//!
//! ```text
//! Date,AAPL,MSFT,GOOG
//! 2020-01-02,75.09,160.62,68.43
//! 2020-01-03 00:00:00+00:00,74.36,158.62,68.08
//! ```
//!
//! Only the first ten characters of a date cell are read, so timestamps with a
//! time or offset suffix load as calendar dates.

use std::io::{Read, Write};
use std::path::Path;

use frontier_core::{PriceRow, PriceTable};
use jiff::civil::Date;

use super::{FileError, record_line};

pub(crate) fn parse_date(cell: &str) -> Option<Date> {
    let cell = cell.trim();
    cell.get(..10).unwrap_or(cell).parse().ok()
}

/// Parse a clean table from any reader
pub fn parse_price_table<R: Read>(reader: R) -> Result<PriceTable, FileError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.len() < 2 {
        return Err(FileError::Header(format!(
            "expected a date column and at least one symbol, found {} column(s)",
            headers.len()
        )));
    }
    let symbols: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record_line(&record);
        let date_cell = record.get(0).unwrap_or_default();
        let date = parse_date(date_cell).ok_or_else(|| FileError::Date {
            line,
            value: date_cell.to_string(),
        })?;

        let prices = symbols
            .iter()
            .zip(record.iter().skip(1))
            .map(|(symbol, cell)| {
                cell.parse::<f64>().map_err(|_| FileError::Price {
                    line,
                    symbol: symbol.clone(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, FileError>>()?;
        rows.push(PriceRow::new(date, prices));
    }

    // Some downloads are newest-first
    rows.sort_by_key(|row| row.date);

    Ok(PriceTable::new(symbols, rows)?)
}

/// Read a clean table from disk
pub fn read_price_table(path: &Path) -> Result<PriceTable, FileError> {
    let file = std::fs::File::open(path)
        .map_err(|e| FileError::Io(format!("Failed to open {}: {e}", path.display())))?;
    let table = parse_price_table(std::io::BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        assets = table.num_assets(),
        "Loaded price table"
    );
    Ok(table)
}

/// Write a table in the same clean layout [`parse_price_table`] reads
pub fn write_price_table<W: Write>(table: &PriceTable, writer: W) -> Result<(), FileError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(std::iter::once("Date").chain(table.symbols().iter().map(String::as_str)))?;
    for row in table.rows() {
        let mut record = Vec::with_capacity(row.prices.len() + 1);
        record.push(row.date.to_string());
        record.extend(row.prices.iter().map(f64::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()
        .map_err(|e| FileError::Io(format!("Failed to flush price table: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::DataError;
    use jiff::civil::date;

    #[test]
    fn test_parse_clean_table() {
        let csv = "\
Date,AAPL,MSFT
2020-01-02,75.09,160.62
2020-01-03 00:00:00+00:00,74.36,158.62
2020-01-06,74.95,159.03
";
        let table = parse_price_table(csv.as_bytes()).unwrap();

        assert_eq!(table.symbols(), &["AAPL", "MSFT"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.first_date(), Some(date(2020, 1, 2)));
        assert_eq!(table.rows()[1].date, date(2020, 1, 3));
        assert_eq!(table.column("MSFT").unwrap(), vec![160.62, 158.62, 159.03]);
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let csv = "Date,A\n2021-03-02,2.0\n2021-03-01,1.0\n";
        let table = parse_price_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column("A").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_bad_cells_reported_with_line() {
        let csv = "Date,A,B\n2021-03-01,1.0,2.0\n2021-03-02,1.1,\n";
        match parse_price_table(csv.as_bytes()).unwrap_err() {
            FileError::Price { line, symbol, .. } => {
                assert_eq!(line, 3);
                assert_eq!(symbol, "B");
            }
            other => panic!("expected price error, got {other:?}"),
        }

        let csv = "Date,A\nyesterday,1.0\n";
        assert!(matches!(
            parse_price_table(csv.as_bytes()).unwrap_err(),
            FileError::Date { line: 2, .. }
        ));
    }

    #[test]
    fn test_table_errors_propagate() {
        let csv = "Date,A,A\n2021-03-01,1.0,2.0\n";
        assert!(matches!(
            parse_price_table(csv.as_bytes()).unwrap_err(),
            FileError::Table(DataError::DuplicateSymbol(_))
        ));

        let csv = "Date,A\n2021-03-01,1.0\n2021-03-01,1.5\n";
        assert!(matches!(
            parse_price_table(csv.as_bytes()).unwrap_err(),
            FileError::Table(DataError::UnorderedDates { .. })
        ));
    }

    #[test]
    fn test_header_requires_symbol() {
        let csv = "Date\n2021-03-01\n";
        assert!(matches!(
            parse_price_table(csv.as_bytes()).unwrap_err(),
            FileError::Header(_)
        ));
    }

    #[test]
    fn test_written_table_reads_back() {
        let csv = "Date,A,B\n2021-03-01,1.25,20\n2021-03-02,1.5,19.75\n";
        let table = parse_price_table(csv.as_bytes()).unwrap();

        let mut out = Vec::new();
        write_price_table(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), csv);
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        std::fs::write(&path, "Date,X\n2022-01-03,10\n2022-01-04,11\n").unwrap();

        let table = read_price_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(matches!(
            read_price_table(&dir.path().join("missing.csv")),
            Err(FileError::Io(_))
        ));
    }
}
