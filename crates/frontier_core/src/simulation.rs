//! Monte Carlo sampling orchestrator
//!
//! Statistics are derived once, then `trial_count` independent trials each
//! draw a weight vector and evaluate it. Trial `i` owns a random stream seeded
//! from `(base_seed, i)`, so a seeded run gives the same result set whether it
//! runs sequentially or across any number of threads.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::SamplingConfig;
use crate::error::{Result, SamplingError, TrialError};
use crate::evaluate::evaluate_trial;
use crate::metrics::SamplingMetrics;
use crate::model::{
    PriceTable, ReturnStatistics, SamplingProgress, SamplingWarning, SimulationResultSet,
    TrialResult,
};
use crate::weights::draw_weights;

/// Trials per unit of parallel work; cancellation is checked between batches
const MAX_BATCH_SIZE: usize = 100;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive the seed of trial `index` from the run's base seed.
///
/// The base is mixed before the index is folded in, so runs whose base seeds
/// differ by a multiple of the SplitMix64 increment do not share streams.
#[must_use]
pub fn split_seed(base_seed: u64, index: usize) -> u64 {
    let base = mix64(base_seed.wrapping_add(GOLDEN_GAMMA));
    let stream = (index as u64).wrapping_add(1).wrapping_mul(GOLDEN_GAMMA);
    mix64(base.wrapping_add(stream))
}

/// Run a single trial on its own random stream.
///
/// Zero volatility is not an error here: the trial is kept with no Sharpe
/// ratio. Degenerate draws are redrawn; only an exhausted redraw budget or a
/// malformed covariance matrix fails.
pub fn run_trial(
    stats: &ReturnStatistics,
    risk_free_rate: f64,
    base_seed: u64,
    index: usize,
    keep_weights: bool,
    metrics: &mut SamplingMetrics,
) -> std::result::Result<TrialResult, TrialError> {
    let mut rng = SmallRng::seed_from_u64(split_seed(base_seed, index));

    let draw = draw_weights(&mut rng, stats.num_assets())?;
    metrics.record_redraws(draw.redraws);

    let trial = evaluate_trial(&draw.weights, stats)?;
    if trial.variance_clamped {
        metrics.record_clamped_variance();
    }

    let sharpe_ratio = match trial.sharpe_ratio(risk_free_rate) {
        Ok(sharpe) => Some(sharpe),
        Err(TrialError::DivisionByZero) => {
            metrics.record_zero_volatility();
            None
        }
        Err(e) => return Err(e),
    };
    metrics.record_trial();

    Ok(TrialResult {
        index,
        expected_return: trial.expected_return,
        volatility: trial.volatility,
        sharpe_ratio,
        weights: keep_weights.then_some(draw.weights),
    })
}

/// Lazy, in-order trial stream.
///
/// Dropping it early stops the run without further work; `trial_count` is
/// only an upper bound.
#[derive(Debug)]
pub struct Trials<'a> {
    stats: &'a ReturnStatistics,
    risk_free_rate: f64,
    keep_weights: bool,
    base_seed: u64,
    next: usize,
    end: usize,
    metrics: SamplingMetrics,
}

impl Trials<'_> {
    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Counters for the trials produced so far
    #[must_use]
    pub fn metrics(&self) -> &SamplingMetrics {
        &self.metrics
    }
}

impl Iterator for Trials<'_> {
    type Item = Result<TrialResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(
            run_trial(
                self.stats,
                self.risk_free_rate,
                self.base_seed,
                index,
                self.keep_weights,
                &mut self.metrics,
            )
            .map_err(SamplingError::from),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

/// Trial stream for already computed statistics.
///
/// The configuration is validated up front, same as a full run.
pub fn trials<'a>(
    stats: &'a ReturnStatistics,
    config: &SamplingConfig,
    base_seed: u64,
) -> Result<Trials<'a>> {
    config.validate()?;
    Ok(Trials {
        stats,
        risk_free_rate: config.risk_free_rate,
        keep_weights: config.keep_weights,
        base_seed,
        next: 0,
        end: config.trial_count,
        metrics: SamplingMetrics::new(),
    })
}

/// Base seed of a run: the configured one, or a fresh one from the OS-seeded generator
#[must_use]
pub fn resolve_seed(config: &SamplingConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().next_u64())
}

/// Full run from a price table
pub fn simulate(prices: &PriceTable, config: &SamplingConfig) -> Result<SimulationResultSet> {
    config.validate()?;
    let stats = ReturnStatistics::from_prices(prices, config.periods_per_year)?;
    simulate_statistics(&stats, config)
}

/// Full run from precomputed statistics
pub fn simulate_statistics(
    stats: &ReturnStatistics,
    config: &SamplingConfig,
) -> Result<SimulationResultSet> {
    simulate_with_progress(stats, config, &SamplingProgress::new())
}

type Batch = (Vec<TrialResult>, SamplingMetrics);

/// Full run that reports progress and honours cancellation
pub fn simulate_with_progress(
    stats: &ReturnStatistics,
    config: &SamplingConfig,
    progress: &SamplingProgress,
) -> Result<SimulationResultSet> {
    config.validate()?;

    let base_seed = resolve_seed(config);
    let num_trials = config.trial_count;
    let num_batches = num_trials.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |batch: usize| -> Result<Batch> {
        if progress.is_cancelled() {
            return Err(SamplingError::Cancelled);
        }

        let start = batch * MAX_BATCH_SIZE;
        let end = (start + MAX_BATCH_SIZE).min(num_trials);
        let mut metrics = SamplingMetrics::new();
        let mut results = Vec::with_capacity(end - start);

        for index in start..end {
            results.push(run_trial(
                stats,
                config.risk_free_rate,
                base_seed,
                index,
                config.keep_weights,
                &mut metrics,
            )?);
        }

        progress.add_completed(results.len());
        Ok((results, metrics))
    };

    let batches = run_batches(num_batches, config.parallel, run_batch)?;

    let mut trials = Vec::with_capacity(num_trials);
    let mut metrics = SamplingMetrics::new();
    for (results, batch_metrics) in batches {
        trials.extend(results);
        metrics.merge(&batch_metrics);
    }

    let mut warnings = Vec::new();
    if stats.observations() == 1 {
        warnings.push(SamplingWarning::SingleReturnObservation);
    }
    if metrics.zero_volatility_trials > 0 {
        warnings.push(SamplingWarning::ZeroVolatilityTrials {
            count: metrics.zero_volatility_trials,
        });
    }

    Ok(SimulationResultSet {
        symbols: stats.symbols().to_vec(),
        trials,
        seed: base_seed,
        risk_free_rate: config.risk_free_rate,
        metrics,
        warnings,
    })
}

#[cfg(feature = "parallel")]
fn run_batches<F>(num_batches: usize, parallel: bool, run_batch: F) -> Result<Vec<Batch>>
where
    F: Fn(usize) -> Result<Batch> + Sync + Send,
{
    if parallel {
        (0..num_batches).into_par_iter().map(run_batch).collect()
    } else {
        (0..num_batches).map(run_batch).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_batches<F>(num_batches: usize, _parallel: bool, run_batch: F) -> Result<Vec<Batch>>
where
    F: Fn(usize) -> Result<Batch>,
{
    (0..num_batches).map(run_batch).collect()
}
