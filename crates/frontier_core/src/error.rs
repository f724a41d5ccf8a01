use std::fmt;

use jiff::civil::Date;

/// Errors that make an input unusable for a whole sampling run
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// Fewer than two price rows, so not even one period return exists
    InsufficientData { rows: usize },
    /// A price that is zero, negative, NaN or infinite
    InvalidPrice {
        symbol: String,
        date: Date,
        price: f64,
    },
    NoAssets,
    DuplicateSymbol(String),
    RowWidthMismatch {
        date: Date,
        expected: usize,
        found: usize,
    },
    /// Dates must be strictly increasing
    UnorderedDates { previous: Date, current: Date },
    /// Mean vector / covariance matrix dimensions do not match the asset count
    DimensionMismatch { expected: usize, found: usize },
    NonFiniteStatistic,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::InsufficientData { rows } => {
                write!(f, "insufficient data: {rows} price row(s), at least 2 required")
            }
            DataError::InvalidPrice {
                symbol,
                date,
                price,
            } => write!(f, "invalid price {price} for {symbol} on {date}"),
            DataError::NoAssets => write!(f, "price table has no asset columns"),
            DataError::DuplicateSymbol(symbol) => write!(f, "duplicate asset symbol {symbol}"),
            DataError::RowWidthMismatch {
                date,
                expected,
                found,
            } => write!(
                f,
                "row {date} has {found} price(s), expected one per asset ({expected})"
            ),
            DataError::UnorderedDates { previous, current } => {
                write!(f, "dates not strictly increasing: {current} follows {previous}")
            }
            DataError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            DataError::NonFiniteStatistic => {
                write!(f, "return statistics contain non-finite values")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Anomalies raised while drawing or evaluating a single trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialError {
    /// Every uniform draw was exactly zero
    DegenerateWeights,
    /// wᵗΣw fell below zero by more than the rounding tolerance
    NumericalInstability { variance: f64 },
    /// Expected volatility is exactly zero
    DivisionByZero,
}

impl fmt::Display for TrialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialError::DegenerateWeights => {
                write!(f, "degenerate weight draw: all random values were zero")
            }
            TrialError::NumericalInstability { variance } => write!(
                f,
                "numerical instability: portfolio variance {variance} is negative (malformed covariance matrix)"
            ),
            TrialError::DivisionByZero => {
                write!(f, "division by zero: portfolio volatility is zero")
            }
        }
    }
}

impl std::error::Error for TrialError {}

/// Top-level error returned by a sampling run
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    Data(DataError),
    Trial(TrialError),
    Config(String),
    /// Run was cancelled through its progress handle
    Cancelled,
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::Data(e) => write!(f, "{e}"),
            SamplingError::Trial(e) => write!(f, "{e}"),
            SamplingError::Config(msg) => write!(f, "configuration error: {msg}"),
            SamplingError::Cancelled => write!(f, "sampling cancelled"),
        }
    }
}

impl std::error::Error for SamplingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplingError::Data(e) => Some(e),
            SamplingError::Trial(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataError> for SamplingError {
    fn from(err: DataError) -> Self {
        SamplingError::Data(err)
    }
}

impl From<TrialError> for SamplingError {
    fn from(err: TrialError) -> Self {
        SamplingError::Trial(err)
    }
}

pub type Result<T> = std::result::Result<T, SamplingError>;
