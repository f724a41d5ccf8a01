//! Date-indexed closing price table and its period log returns

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

use super::statistics::ReturnMatrix;

/// One trading day of closing prices, one value per asset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: Date,
    pub prices: Vec<f64>,
}

impl PriceRow {
    #[must_use]
    pub fn new(date: Date, prices: Vec<f64>) -> Self {
        Self { date, prices }
    }
}

/// Clean price matrix: rows are trading days, columns are assets.
///
/// Construction checks the shape (fixed width, unique symbols, strictly
/// increasing dates). Price values themselves are checked when returns are
/// derived, so a table holding a bad price can still be built and inspected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPriceTable")]
pub struct PriceTable {
    symbols: Vec<String>,
    rows: Vec<PriceRow>,
    #[serde(skip)]
    columns: FxHashMap<String, usize>,
}

/// Serialized form; deserialization goes through [`PriceTable::new`]
#[derive(Deserialize)]
struct RawPriceTable {
    symbols: Vec<String>,
    rows: Vec<PriceRow>,
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = DataError;

    fn try_from(raw: RawPriceTable) -> Result<Self, Self::Error> {
        Self::new(raw.symbols, raw.rows)
    }
}

impl PriceTable {
    pub fn new(symbols: Vec<String>, rows: Vec<PriceRow>) -> Result<Self, DataError> {
        if symbols.is_empty() {
            return Err(DataError::NoAssets);
        }

        let mut columns = FxHashMap::default();
        for (idx, symbol) in symbols.iter().enumerate() {
            if columns.insert(symbol.clone(), idx).is_some() {
                return Err(DataError::DuplicateSymbol(symbol.clone()));
            }
        }

        for row in &rows {
            if row.prices.len() != symbols.len() {
                return Err(DataError::RowWidthMismatch {
                    date: row.date,
                    expected: symbols.len(),
                    found: row.prices.len(),
                });
            }
        }

        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::UnorderedDates {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self {
            symbols,
            rows,
            columns,
        })
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[must_use]
    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.rows.first().map(|r| r.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.rows.last().map(|r| r.date)
    }

    /// Column index of an asset symbol
    #[must_use]
    pub fn column_index(&self, symbol: &str) -> Option<usize> {
        self.columns.get(symbol).copied()
    }

    /// All closing prices of one asset, in date order
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(symbol)?;
        Some(self.rows.iter().map(|r| r.prices[idx]).collect())
    }

    /// Derive per-period log returns `ln(p[t]) - ln(p[t-1])`.
    ///
    /// The result has one row fewer than the table. Fails on tables with
    /// fewer than two rows, or on the first non-positive / non-finite price.
    pub fn log_returns(&self) -> Result<ReturnMatrix, DataError> {
        if self.rows.len() < 2 {
            return Err(DataError::InsufficientData {
                rows: self.rows.len(),
            });
        }
        self.check_prices()?;

        let returns = self
            .rows
            .windows(2)
            .map(|pair| {
                pair[1]
                    .prices
                    .iter()
                    .zip(&pair[0].prices)
                    .map(|(curr, prev)| curr.ln() - prev.ln())
                    .collect()
            })
            .collect();

        ReturnMatrix::new(self.symbols.clone(), returns)
    }

    fn check_prices(&self) -> Result<(), DataError> {
        for row in &self.rows {
            for (symbol, &price) in self.symbols.iter().zip(&row.prices) {
                if !price.is_finite() || price <= 0.0 {
                    return Err(DataError::InvalidPrice {
                        symbol: symbol.clone(),
                        date: row.date,
                        price,
                    });
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for PriceTable {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols && self.rows == other.rows
    }
}
