//! Period return matrix and annualized return statistics
//!
//! Statistics are computed once per run and shared read-only by every trial.
//! Means use denominator `n`; covariances use the sample denominator `n - 1`,
//! where `n` is the number of period returns (one fewer than price rows).

use serde::{Deserialize, Serialize};

use crate::error::DataError;

use super::prices::PriceTable;

/// Trading periods per year used to annualize daily statistics
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Per-period log returns, `rows[t][asset]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMatrix {
    symbols: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    pub fn new(symbols: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, DataError> {
        if symbols.is_empty() {
            return Err(DataError::NoAssets);
        }
        if rows.is_empty() {
            return Err(DataError::InsufficientData { rows: 1 });
        }
        for row in &rows {
            if row.len() != symbols.len() {
                return Err(DataError::DimensionMismatch {
                    expected: symbols.len(),
                    found: row.len(),
                });
            }
            if row.iter().any(|r| !r.is_finite()) {
                return Err(DataError::NonFiniteStatistic);
            }
        }
        Ok(Self { symbols, rows })
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
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

    /// Per-asset arithmetic mean of the period returns
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        let n = self.rows.len() as f64;
        let mut sums = vec![0.0; self.num_assets()];
        for row in &self.rows {
            for (sum, r) in sums.iter_mut().zip(row) {
                *sum += r;
            }
        }
        sums.into_iter().map(|s| s / n).collect()
    }

    /// Sample covariance of the period returns (denominator `n - 1`).
    ///
    /// With a single observation the sample covariance is undefined and an
    /// all-zero matrix is returned.
    #[must_use]
    pub fn covariance(&self) -> CovarianceMatrix {
        let dim = self.num_assets();
        let mut cov = CovarianceMatrix::zeros(dim);
        if self.rows.len() < 2 {
            return cov;
        }

        let means = self.means();
        let denom = (self.rows.len() - 1) as f64;

        for row in &self.rows {
            for i in 0..dim {
                let di = row[i] - means[i];
                for j in i..dim {
                    cov.values[i * dim + j] += di * (row[j] - means[j]);
                }
            }
        }

        for i in 0..dim {
            for j in i..dim {
                let v = cov.values[i * dim + j] / denom;
                cov.values[i * dim + j] = v;
                cov.values[j * dim + i] = v;
            }
        }
        cov
    }
}

/// Dense square covariance matrix stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    /// Build from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(DataError::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DataError::NonFiniteStatistic);
        }
        Ok(Self { dim, values })
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Diagonal entries (per-asset variances)
    #[must_use]
    pub fn variances(&self) -> Vec<f64> {
        (0..self.dim).map(|i| self.get(i, i)).collect()
    }

    /// `wᵗ · Σ · w`
    #[must_use]
    pub fn quadratic_form(&self, weights: &[f64]) -> f64 {
        debug_assert_eq!(weights.len(), self.dim);
        let mut total = 0.0;
        for (i, wi) in weights.iter().enumerate() {
            let row = self.row(i);
            let inner: f64 = row.iter().zip(weights).map(|(c, wj)| c * wj).sum();
            total += wi * inner;
        }
        total
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            dim: self.dim,
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }
}

/// Annualized per-asset mean returns and covariance matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    symbols: Vec<String>,
    mean: Vec<f64>,
    covariance: CovarianceMatrix,
    /// Number of period returns the statistics were estimated from
    observations: usize,
}

impl ReturnStatistics {
    /// Derive log returns from a price table and annualize their moments
    pub fn from_prices(prices: &PriceTable, periods_per_year: f64) -> Result<Self, DataError> {
        let returns = prices.log_returns()?;
        Self::from_returns(&returns, periods_per_year)
    }

    pub fn from_returns(returns: &ReturnMatrix, periods_per_year: f64) -> Result<Self, DataError> {
        let mean: Vec<f64> = returns
            .means()
            .into_iter()
            .map(|m| m * periods_per_year)
            .collect();
        let covariance = returns.covariance().scaled(periods_per_year);

        if mean.iter().any(|m| !m.is_finite()) || covariance.values.iter().any(|v| !v.is_finite())
        {
            return Err(DataError::NonFiniteStatistic);
        }

        Ok(Self {
            symbols: returns.symbols().to_vec(),
            mean,
            covariance,
            observations: returns.len(),
        })
    }

    /// Assemble statistics estimated elsewhere (already annualized).
    ///
    /// Positive semi-definiteness is not checked here; a malformed matrix
    /// surfaces as a numerical instability when trials are evaluated.
    pub fn from_parts(
        symbols: Vec<String>,
        mean: Vec<f64>,
        covariance: CovarianceMatrix,
    ) -> Result<Self, DataError> {
        if symbols.is_empty() {
            return Err(DataError::NoAssets);
        }
        if mean.len() != symbols.len() {
            return Err(DataError::DimensionMismatch {
                expected: symbols.len(),
                found: mean.len(),
            });
        }
        if covariance.dim() != symbols.len() {
            return Err(DataError::DimensionMismatch {
                expected: symbols.len(),
                found: covariance.dim(),
            });
        }
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(DataError::NonFiniteStatistic);
        }
        Ok(Self {
            symbols,
            mean,
            covariance,
            observations: 0,
        })
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[must_use]
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    #[must_use]
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Annualized volatility of each asset on its own
    #[must_use]
    pub fn asset_volatilities(&self) -> Vec<f64> {
        self.covariance
            .variances()
            .into_iter()
            .map(|v| v.max(0.0).sqrt())
            .collect()
    }
}
