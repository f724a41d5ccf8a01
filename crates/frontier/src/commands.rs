//! Subcommand bodies, kept out of `main` so they can be tested

use std::path::Path;

use color_eyre::eyre::WrapErr;
use frontier_core::{SimulationResultSet, simulate};

use crate::config::RunConfig;
use crate::data::preprocess::{PreprocessReport, preprocess_file};
use crate::data::price_csv::read_price_table;
use crate::output::{format_preview, format_summary, save_results};

/// Load prices, run the sampler and save the results CSV when configured
pub fn run_simulation(config: &RunConfig) -> color_eyre::Result<SimulationResultSet> {
    config.validate()?;
    let prices_path = config.prices_path()?;

    let prices = read_price_table(prices_path)
        .wrap_err_with(|| format!("Failed to load prices from {}", prices_path.display()))?;
    tracing::info!(
        assets = prices.num_assets(),
        rows = prices.len(),
        first = ?prices.first_date(),
        last = ?prices.last_date(),
        trials = config.sampling.trial_count,
        "Starting simulation"
    );

    let results = simulate(&prices, &config.sampling).wrap_err("Simulation failed")?;

    for warning in &results.warnings {
        tracing::warn!("{}", warning.message());
    }
    tracing::info!(
        seed = results.seed,
        trials = results.len(),
        redraws = results.metrics.weight_redraws,
        clamped = results.metrics.clamped_variances,
        "Simulation finished"
    );

    if let Some(output) = &config.output {
        save_results(&results, output)
            .wrap_err_with(|| format!("Failed to save results to {}", output.display()))?;
    }
    Ok(results)
}

/// Preview table and summary printed after a run
#[must_use]
pub fn render_report(results: &SimulationResultSet, preview_rows: usize) -> String {
    let mut report = String::new();
    if preview_rows > 0 {
        report.push_str(&format_preview(results, preview_rows));
        report.push('\n');
    }
    report.push_str(&format_summary(results));
    report
}

pub fn run_preprocess(
    input: &Path,
    output: &Path,
    field: &str,
) -> color_eyre::Result<PreprocessReport> {
    preprocess_file(input, output, field)
        .wrap_err_with(|| format!("Failed to preprocess {}", input.display()))
}
