//! Sampling results, summaries and run progress
//!
//! A `SimulationResultSet` is produced once per run and handed to the caller
//! as an immutable value; trials are stored in trial-index order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::metrics::SamplingMetrics;
use crate::pareto;

/// Metrics of one random portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Position of the trial in the run (also its seed stream index)
    pub index: usize,
    /// Annualized expected return, `w · μ`
    pub expected_return: f64,
    /// Annualized expected volatility, `sqrt(wᵗΣw)`
    pub volatility: f64,
    /// `None` when the portfolio has zero volatility
    pub sharpe_ratio: Option<f64>,
    /// Portfolio weights, kept only when the run asks for them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

/// Non-fatal conditions worth surfacing alongside a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplingWarning {
    /// Only one period return was available; covariance is all zeros
    SingleReturnObservation,
    /// Trials whose volatility was zero and which carry no Sharpe ratio
    ZeroVolatilityTrials { count: u64 },
}

impl SamplingWarning {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::SingleReturnObservation => {
                "only one period return available; covariance estimated as zero".to_string()
            }
            Self::ZeroVolatilityTrials { count } => {
                format!("{count} trial(s) had zero volatility and no Sharpe ratio")
            }
        }
    }
}

/// The two portfolios usually highlighted on an efficient-frontier plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub max_sharpe: Option<TrialResult>,
    pub min_volatility: Option<TrialResult>,
}

/// Complete output of one sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResultSet {
    pub symbols: Vec<String>,
    pub trials: Vec<TrialResult>,
    /// Base seed the per-trial streams were derived from
    pub seed: u64,
    pub risk_free_rate: f64,
    pub metrics: SamplingMetrics,
    #[serde(default)]
    pub warnings: Vec<SamplingWarning>,
}

impl SimulationResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// First `n` trials in trial order
    #[must_use]
    pub fn head(&self, n: usize) -> &[TrialResult] {
        &self.trials[..n.min(self.trials.len())]
    }

    /// Trial with the highest Sharpe ratio, lowest index on ties.
    ///
    /// Trials without a Sharpe ratio are ignored.
    #[must_use]
    pub fn max_sharpe(&self) -> Option<&TrialResult> {
        let mut best: Option<(&TrialResult, f64)> = None;
        for trial in &self.trials {
            let Some(sharpe) = trial.sharpe_ratio else {
                continue;
            };
            match best {
                Some((_, best_sharpe)) if sharpe <= best_sharpe => {}
                _ => best = Some((trial, sharpe)),
            }
        }
        best.map(|(trial, _)| trial)
    }

    /// Trial with the lowest volatility, lowest index on ties
    #[must_use]
    pub fn min_volatility(&self) -> Option<&TrialResult> {
        let mut best: Option<&TrialResult> = None;
        for trial in &self.trials {
            match best {
                Some(b) if trial.volatility >= b.volatility => {}
                _ => best = Some(trial),
            }
        }
        best
    }

    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            max_sharpe: self.max_sharpe().cloned(),
            min_volatility: self.min_volatility().cloned(),
        }
    }

    /// Non-dominated trials ordered by increasing volatility
    #[must_use]
    pub fn efficient_frontier(&self) -> Vec<&TrialResult> {
        pareto::efficient_frontier(&self.trials)
    }
}

/// Shared progress and cancellation handle for a sampling run
#[derive(Debug, Clone)]
pub struct SamplingProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl SamplingProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create from existing atomics, e.g. ones owned by a UI thread
    pub fn from_atomics(completed: Arc<AtomicUsize>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            completed,
            cancelled,
        }
    }

    /// Number of trials finished so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn add_completed(&self, n: usize) {
        self.completed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SamplingProgress {
    fn default() -> Self {
        Self::new()
    }
}
