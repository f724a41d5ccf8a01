//! Trial evaluation: expected return, volatility and Sharpe ratio of one
//! weight vector against precomputed annualized statistics.

use crate::error::TrialError;
use crate::model::ReturnStatistics;

/// Relative slack allowed for a negative portfolio variance caused by rounding
pub const NEGATIVE_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Metrics of a single weight vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    /// A slightly negative variance was rounded up to zero
    pub variance_clamped: bool,
}

impl TrialMetrics {
    /// `(return - risk_free_rate) / volatility`
    pub fn sharpe_ratio(&self, risk_free_rate: f64) -> Result<f64, TrialError> {
        if self.volatility == 0.0 {
            return Err(TrialError::DivisionByZero);
        }
        Ok((self.expected_return - risk_free_rate) / self.volatility)
    }
}

/// Annualized expected return `w · μ`
#[must_use]
pub fn expected_return(weights: &[f64], stats: &ReturnStatistics) -> f64 {
    weights.iter().zip(stats.mean()).map(|(w, m)| w * m).sum()
}

/// Annualized volatility `sqrt(wᵗΣw)`.
///
/// Returns the volatility and whether a tiny negative variance was clamped.
pub fn volatility(weights: &[f64], stats: &ReturnStatistics) -> Result<(f64, bool), TrialError> {
    let cov = stats.covariance();
    let variance = cov.quadratic_form(weights);
    if variance >= 0.0 {
        return Ok((variance.sqrt(), false));
    }

    let scale = cov.variances().into_iter().fold(1.0_f64, f64::max);
    if variance >= -NEGATIVE_VARIANCE_TOLERANCE * scale {
        Ok((0.0, true))
    } else {
        Err(TrialError::NumericalInstability { variance })
    }
}

/// Return and volatility of one weight vector.
///
/// The Sharpe ratio is left to [`TrialMetrics::sharpe_ratio`] so the caller
/// decides what to do with a zero-volatility portfolio.
pub fn evaluate_trial(
    weights: &[f64],
    stats: &ReturnStatistics,
) -> Result<TrialMetrics, TrialError> {
    debug_assert_eq!(weights.len(), stats.num_assets());
    let expected_return = expected_return(weights, stats);
    let (volatility, variance_clamped) = volatility(weights, stats)?;
    Ok(TrialMetrics {
        expected_return,
        volatility,
        variance_clamped,
    })
}
