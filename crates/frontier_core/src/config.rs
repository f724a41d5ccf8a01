//! Sampling run configuration
//!
//! Everything a run depends on is passed in through `SamplingConfig`; the
//! engine keeps no process-wide defaults of its own.

use serde::{Deserialize, Serialize};

use crate::error::SamplingError;
use crate::model::TRADING_DAYS_PER_YEAR;

fn default_trial_count() -> usize {
    10_000
}

fn default_risk_free_rate() -> f64 {
    0.01
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

fn default_true() -> bool {
    true
}

/// Parameters of one Monte Carlo sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Number of random portfolios to draw
    #[serde(default = "default_trial_count")]
    pub trial_count: usize,

    /// Annualized rate subtracted from expected return in the Sharpe ratio.
    /// May be negative.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Base seed for the per-trial random streams. `None` draws one from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Scale factor from per-period to yearly statistics
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Store each trial's weight vector in the result set
    #[serde(default = "default_true")]
    pub keep_weights: bool,

    /// Spread trials over the rayon pool (ignored without the `parallel` feature)
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            trial_count: default_trial_count(),
            risk_free_rate: default_risk_free_rate(),
            seed: None,
            periods_per_year: default_periods_per_year(),
            keep_weights: true,
            parallel: true,
        }
    }
}

impl SamplingConfig {
    #[must_use]
    pub fn with_trials(mut self, trial_count: usize) -> Self {
        self.trial_count = trial_count;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn validate(&self) -> Result<(), SamplingError> {
        if self.trial_count == 0 {
            return Err(SamplingError::Config(
                "trial_count must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(SamplingError::Config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            return Err(SamplingError::Config(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SamplingConfig::default();
        assert_eq!(config.trial_count, 10_000);
        assert_eq!(config.risk_free_rate, 0.01);
        assert_eq!(config.periods_per_year, 252.0);
        assert!(config.seed.is_none());
        assert!(config.keep_weights);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: SamplingConfig =
            serde_json::from_str(r#"{"trial_count": 500, "seed": 9}"#).unwrap();
        assert_eq!(config.trial_count, 500);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.risk_free_rate, 0.01);
        assert!(config.parallel);
    }

    #[test]
    fn test_validation() {
        assert!(SamplingConfig::default().with_trials(0).validate().is_err());
        assert!(
            SamplingConfig::default()
                .with_risk_free_rate(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            SamplingConfig::default()
                .with_risk_free_rate(-0.005)
                .validate()
                .is_ok()
        );

        let config = SamplingConfig {
            periods_per_year: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SamplingError::Config(_))));
    }
}
