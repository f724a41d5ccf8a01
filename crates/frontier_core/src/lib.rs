//! Monte Carlo portfolio sampling library
//!
//! Approximates the efficient frontier of a fixed set of assets by drawing
//! many random long-only weight vectors and scoring each by annualized
//! expected return, volatility and Sharpe ratio. It supports:
//! - Log-return statistics (mean vector, sample covariance) annualized once per run
//! - Seeded, per-trial random streams: identical results sequentially or in parallel
//! - Explicit handling of degenerate draws and zero-volatility portfolios
//! - Max-Sharpe / min-volatility summaries and the sampled non-dominated set
//!
//! ```ignore
//! use frontier_core::{SamplingConfig, simulate};
//!
//! let config = SamplingConfig::default().with_trials(10_000).with_seed(42);
//! let results = simulate(&prices, &config)?;
//! let best = results.max_sharpe();
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod config;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod pareto;
pub mod simulation;
pub mod synthetic;
pub mod weights;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SamplingConfig;
pub use error::{DataError, SamplingError, TrialError};
pub use metrics::SamplingMetrics;
pub use model::{
    CovarianceMatrix, PriceRow, PriceTable, ReturnMatrix, ReturnStatistics, SamplingProgress,
    SamplingWarning, SimulationResultSet, SimulationSummary, TRADING_DAYS_PER_YEAR, TrialResult,
};
pub use simulation::{simulate, simulate_statistics, simulate_with_progress, trials};
