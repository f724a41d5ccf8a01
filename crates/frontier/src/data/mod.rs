//! Price-table files
//!
//! - `price_csv` - clean table (date column + one column per symbol) to [`PriceTable`]
//! - `preprocess` - flatten a two-level (ticker, field) header download into a clean table
//!
//! [`PriceTable`]: frontier_core::PriceTable

pub mod preprocess;
pub mod price_csv;

use frontier_core::DataError;

/// Error types for reading and writing price files
#[derive(Debug)]
pub enum FileError {
    Io(String),
    Csv(String),
    /// Header rows missing or not shaped as expected
    Header(String),
    /// Date cell that does not start with `YYYY-MM-DD`
    Date { line: u64, value: String },
    /// Price cell that is empty or not a number
    Price {
        line: u64,
        symbol: String,
        value: String,
    },
    /// Parsed rows do not form a valid price table
    Table(DataError),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(msg) => write!(f, "IO error: {msg}"),
            FileError::Csv(msg) => write!(f, "CSV error: {msg}"),
            FileError::Header(msg) => write!(f, "Header error: {msg}"),
            FileError::Date { line, value } => {
                write!(f, "line {line}: cannot parse date from {value:?}")
            }
            FileError::Price {
                line,
                symbol,
                value,
            } => write!(f, "line {line}: invalid price {value:?} for {symbol}"),
            FileError::Table(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for FileError {
    fn from(err: csv::Error) -> Self {
        FileError::Csv(err.to_string())
    }
}

impl From<DataError> for FileError {
    fn from(err: DataError) -> Self {
        FileError::Table(err)
    }
}

/// 1-based line of a record, for messages
pub(crate) fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}
