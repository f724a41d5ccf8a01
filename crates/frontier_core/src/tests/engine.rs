//! Tests for the sampling orchestrator
//!
//! These tests verify that:
//! - A run yields exactly the requested number of trials, in index order
//! - Every weight vector is long-only and sums to one
//! - Seeded runs are bit-for-bit reproducible, and parallel matches sequential
//! - The lazy trial stream supports early abort
//! - Cancellation through the progress handle stops the run

use super::three_asset_year;
use crate::config::SamplingConfig;
use crate::error::SamplingError;
use crate::model::{ReturnStatistics, SamplingProgress, TRADING_DAYS_PER_YEAR};
use crate::simulation::{simulate, simulate_with_progress, trials};

#[test]
fn test_trial_count_and_order() {
    let prices = three_asset_year(1);
    // Not a multiple of the batch size
    let config = SamplingConfig::default().with_trials(1_234).with_seed(3);

    let results = simulate(&prices, &config).unwrap();

    assert_eq!(results.len(), 1_234);
    assert_eq!(results.metrics.trials, 1_234);
    assert!(
        results
            .trials
            .iter()
            .enumerate()
            .all(|(i, t)| t.index == i)
    );
    assert_eq!(results.symbols, vec!["A", "B", "C"]);
}

#[test]
fn test_weights_are_long_only_and_fully_invested() {
    let prices = three_asset_year(2);
    let config = SamplingConfig::default().with_trials(2_000).with_seed(11);

    let results = simulate(&prices, &config).unwrap();

    for trial in &results.trials {
        let weights = trial.weights.as_ref().expect("weights kept by default");
        assert_eq!(weights.len(), 3);
        assert!(weights.iter().all(|w| *w >= 0.0));
        let sum: f64 = weights.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "trial {} weights sum to {sum}",
            trial.index
        );
    }
}

#[test]
fn test_weights_can_be_dropped() {
    let prices = three_asset_year(2);
    let config = SamplingConfig {
        keep_weights: false,
        ..SamplingConfig::default().with_trials(50).with_seed(1)
    };

    let results = simulate(&prices, &config).unwrap();
    assert!(results.trials.iter().all(|t| t.weights.is_none()));
}

#[test]
fn test_seeded_runs_are_identical() {
    let prices = three_asset_year(4);
    let config = SamplingConfig::default()
        .with_trials(3_000)
        .with_seed(42)
        .sequential();

    let first = simulate(&prices, &config).unwrap();
    let second = simulate(&prices, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.seed, 42);
}

#[test]
fn test_parallel_matches_sequential() {
    let prices = three_asset_year(5);
    let base = SamplingConfig::default().with_trials(2_550).with_seed(7);

    let sequential = simulate(&prices, &base.clone().sequential()).unwrap();
    let parallel = simulate(&prices, &base).unwrap();

    assert_eq!(sequential.trials, parallel.trials);
    assert_eq!(sequential.metrics, parallel.metrics);
}

#[test]
fn test_different_seeds_differ() {
    let prices = three_asset_year(5);
    let a = simulate(&prices, &SamplingConfig::default().with_trials(10).with_seed(1)).unwrap();
    let b = simulate(&prices, &SamplingConfig::default().with_trials(10).with_seed(2)).unwrap();
    assert_ne!(a.trials, b.trials);
}

#[test]
fn test_unseeded_run_reports_its_seed() {
    let prices = three_asset_year(6);
    let config = SamplingConfig::default().with_trials(200);

    let first = simulate(&prices, &config).unwrap();
    let replay = simulate(&prices, &config.clone().with_seed(first.seed)).unwrap();

    assert_eq!(first.trials, replay.trials);
}

#[test]
fn test_trial_stream_early_abort() {
    let prices = three_asset_year(8);
    let config = SamplingConfig::default().with_trials(10_000).with_seed(99);
    let stats = ReturnStatistics::from_prices(&prices, TRADING_DAYS_PER_YEAR).unwrap();

    let mut stream = trials(&stats, &config, 99).unwrap();
    assert_eq!(stream.size_hint(), (10_000, Some(10_000)));

    let head: Vec<_> = stream.by_ref().take(5).map(Result::unwrap).collect();
    assert_eq!(stream.metrics().trials, 5);
    assert_eq!(stream.size_hint(), (9_995, Some(9_995)));

    let full = simulate(&prices, &config.with_trials(5)).unwrap();
    assert_eq!(head, full.trials);
}

#[test]
fn test_cancelled_run_returns_error() {
    let prices = three_asset_year(9);
    let stats = ReturnStatistics::from_prices(&prices, TRADING_DAYS_PER_YEAR).unwrap();
    let config = SamplingConfig::default().with_trials(500).with_seed(1);

    let progress = SamplingProgress::new();
    progress.cancel();

    let result = simulate_with_progress(&stats, &config, &progress);
    assert_eq!(result.unwrap_err(), SamplingError::Cancelled);
}

#[test]
fn test_progress_counts_all_trials() {
    let prices = three_asset_year(10);
    let stats = ReturnStatistics::from_prices(&prices, TRADING_DAYS_PER_YEAR).unwrap();
    let config = SamplingConfig::default().with_trials(750).with_seed(1);

    let progress = SamplingProgress::new();
    simulate_with_progress(&stats, &config, &progress).unwrap();

    assert_eq!(progress.completed(), 750);
}
