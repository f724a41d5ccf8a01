//! Engine-level tests for the sampling library
//!
//! Tests are organized by topic:
//! - `engine` - Orchestrator mechanics (counts, seeding, early abort, cancellation)
//! - `scenarios` - End-to-end runs on synthetic and degenerate price tables
//! - `errors` - Run-level failures and their propagation

mod engine;

use jiff::civil::date;

use crate::model::PriceTable;
use crate::synthetic::{PathSpec, geometric_brownian_paths};

/// Three uncorrelated log-normal assets, one trading year of rows
pub(crate) fn three_asset_year(seed: u64) -> PriceTable {
    geometric_brownian_paths(
        &["A", "B", "C"],
        &[
            PathSpec::new(100.0, 0.12, 0.30),
            PathSpec::new(40.0, 0.06, 0.15),
            PathSpec::new(250.0, 0.02, 0.05),
        ],
        252,
        date(2023, 1, 2),
        seed,
    )
    .unwrap()
}
