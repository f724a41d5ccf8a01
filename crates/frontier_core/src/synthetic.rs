//! Seeded synthetic price paths (geometric Brownian motion).
//!
//! Used to exercise the engine without market data: each asset follows
//! `p[t] = p[t-1] * exp((μ - σ²/2)·dt + σ·√dt·Z)` with `dt = 1 / 252` and
//! one row per weekday.

use jiff::ToSpan;
use jiff::civil::{Date, Weekday};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::SamplingError;
use crate::model::{PriceRow, PriceTable, TRADING_DAYS_PER_YEAR};

/// Parameters of one simulated asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub initial_price: f64,
    /// Annualized drift μ
    pub drift: f64,
    /// Annualized volatility σ
    pub volatility: f64,
}

impl PathSpec {
    #[must_use]
    pub fn new(initial_price: f64, drift: f64, volatility: f64) -> Self {
        Self {
            initial_price,
            drift,
            volatility,
        }
    }
}

fn next_weekday(date: Date) -> Date {
    let mut next = date.saturating_add(1.days());
    while matches!(next.weekday(), Weekday::Saturday | Weekday::Sunday) {
        next = next.saturating_add(1.days());
    }
    next
}

/// Build a `rows`-long price table with one independent path per symbol
pub fn geometric_brownian_paths(
    symbols: &[&str],
    specs: &[PathSpec],
    rows: usize,
    start: Date,
    seed: u64,
) -> Result<PriceTable, SamplingError> {
    if symbols.len() != specs.len() {
        return Err(SamplingError::Config(format!(
            "{} symbols but {} path specs",
            symbols.len(),
            specs.len()
        )));
    }

    let dt = 1.0 / TRADING_DAYS_PER_YEAR;
    let mut steps = Vec::with_capacity(specs.len());
    for (symbol, spec) in symbols.iter().zip(specs) {
        if !spec.initial_price.is_finite() || spec.initial_price <= 0.0 {
            return Err(SamplingError::Config(format!(
                "initial price for {symbol} must be positive, got {}",
                spec.initial_price
            )));
        }
        if !spec.volatility.is_finite() || spec.volatility < 0.0 {
            return Err(SamplingError::Config(format!(
                "volatility for {symbol} must be finite and non-negative, got {}",
                spec.volatility
            )));
        }
        let mean = (spec.drift - 0.5 * spec.volatility * spec.volatility) * dt;
        let std_dev = spec.volatility * dt.sqrt();
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            SamplingError::Config(format!(
                "invalid path parameters for {symbol} (drift={}, volatility={}): {e}",
                spec.drift, spec.volatility
            ))
        })?;
        steps.push(normal);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut prices: Vec<f64> = specs.iter().map(|s| s.initial_price).collect();
    let mut date = start;
    let mut table_rows = Vec::with_capacity(rows);

    for t in 0..rows {
        if t > 0 {
            date = next_weekday(date);
            for (price, step) in prices.iter_mut().zip(&steps) {
                *price *= step.sample(&mut rng).exp();
            }
        }
        table_rows.push(PriceRow::new(date, prices.clone()));
    }

    let symbols = symbols.iter().map(|s| (*s).to_string()).collect();
    Ok(PriceTable::new(symbols, table_rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_paths_are_reproducible() {
        let specs = [PathSpec::new(100.0, 0.08, 0.2), PathSpec::new(50.0, 0.03, 0.1)];
        let a = geometric_brownian_paths(&["A", "B"], &specs, 30, date(2024, 1, 1), 5).unwrap();
        let b = geometric_brownian_paths(&["A", "B"], &specs, 30, date(2024, 1, 1), 5).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
        assert_eq!(a.rows()[0].prices, vec![100.0, 50.0]);
        assert!(a.rows().iter().flat_map(|r| &r.prices).all(|p| *p > 0.0));
    }

    #[test]
    fn test_weekends_skipped() {
        let specs = [PathSpec::new(10.0, 0.0, 0.1)];
        // 2024-01-05 is a Friday
        let table = geometric_brownian_paths(&["A"], &specs, 3, date(2024, 1, 5), 1).unwrap();
        let dates: Vec<Date> = table.rows().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 8), date(2024, 1, 9)]);
    }

    #[test]
    fn test_zero_volatility_path_is_deterministic_drift() {
        let specs = [PathSpec::new(10.0, 0.0, 0.0)];
        let table = geometric_brownian_paths(&["FLAT"], &specs, 5, date(2024, 1, 1), 9).unwrap();
        assert!(table.rows().iter().all(|r| r.prices[0] == 10.0));
    }

    #[test]
    fn test_rejects_bad_specs() {
        let start = date(2024, 1, 1);
        assert!(
            geometric_brownian_paths(&["A"], &[PathSpec::new(0.0, 0.0, 0.1)], 3, start, 1)
                .is_err()
        );
        assert!(
            geometric_brownian_paths(&["A"], &[PathSpec::new(1.0, 0.0, -0.1)], 3, start, 1)
                .is_err()
        );
        assert!(
            geometric_brownian_paths(&["A"], &[PathSpec::new(1.0, 0.0, f64::NAN)], 3, start, 1)
                .is_err()
        );
        assert!(geometric_brownian_paths(&["A", "B"], &[], 3, start, 1).is_err());
    }
}
