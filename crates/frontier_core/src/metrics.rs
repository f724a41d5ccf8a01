//! Sampling run counters
//!
//! Tracks how often the per-trial anomaly policies kicked in, so a caller can
//! tell a clean run from one that needed redraws or produced zero-volatility
//! portfolios.

use serde::{Deserialize, Serialize};

/// Counters collected while running trials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingMetrics {
    /// Trials evaluated
    pub trials: u64,
    /// Weight vectors thrown away because every draw was zero
    pub weight_redraws: u64,
    /// Trials with zero volatility (recorded without a Sharpe ratio)
    pub zero_volatility_trials: u64,
    /// Slightly negative variances rounded up to zero
    pub clamped_variances: u64,
}

impl SamplingMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trial(&mut self) {
        self.trials += 1;
    }

    pub fn record_redraws(&mut self, redraws: u32) {
        self.weight_redraws += u64::from(redraws);
    }

    pub fn record_zero_volatility(&mut self) {
        self.zero_volatility_trials += 1;
    }

    pub fn record_clamped_variance(&mut self) {
        self.clamped_variances += 1;
    }

    /// Fold another batch's counters into this one
    pub fn merge(&mut self, other: &SamplingMetrics) {
        self.trials += other.trials;
        self.weight_redraws += other.weight_redraws;
        self.zero_volatility_trials += other.zero_volatility_trials;
        self.clamped_variances += other.clamped_variances;
    }

    /// Share of trials that produced a usable Sharpe ratio
    #[must_use]
    pub fn sharpe_coverage(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            (self.trials - self.zero_volatility_trials) as f64 / self.trials as f64
        }
    }
}
