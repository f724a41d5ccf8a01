//! Efficient-frontier approximation from a cloud of sampled portfolios.
//!
//! A trial is on the sampled frontier when no other trial offers at least the
//! same return for at most the same volatility with one of the two strictly
//! better.

use crate::model::TrialResult;

/// Non-dominated trials, ordered by increasing volatility.
///
/// Of several trials with identical (volatility, return) only the lowest
/// index is kept.
#[must_use]
pub fn efficient_frontier(trials: &[TrialResult]) -> Vec<&TrialResult> {
    let mut order: Vec<&TrialResult> = trials.iter().collect();
    order.sort_by(|a, b| {
        a.volatility
            .total_cmp(&b.volatility)
            .then(b.expected_return.total_cmp(&a.expected_return))
            .then(a.index.cmp(&b.index))
    });

    let mut frontier = Vec::new();
    let mut best_return = f64::NEG_INFINITY;
    for trial in order {
        if trial.expected_return > best_return {
            best_return = trial.expected_return;
            frontier.push(trial);
        }
    }
    frontier
}
