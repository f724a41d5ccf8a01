//! Results CSV and terminal report

use std::fmt::Write as _;
use std::path::Path;

use frontier_core::{SimulationResultSet, TrialResult};

use crate::data::FileError;
use crate::util::io::atomic_write_bytes;

/// Header row: `Returns, Volatility, Sharpe Ratio` then `<SYMBOL> Weight` per asset
#[must_use]
pub fn results_header(results: &SimulationResultSet, with_weights: bool) -> Vec<String> {
    let mut header = vec![
        "Returns".to_string(),
        "Volatility".to_string(),
        "Sharpe Ratio".to_string(),
    ];
    if with_weights {
        header.extend(results.symbols.iter().map(|s| format!("{s} Weight")));
    }
    header
}

fn trial_record(trial: &TrialResult, with_weights: bool) -> Vec<String> {
    let mut record = vec![
        trial.expected_return.to_string(),
        trial.volatility.to_string(),
        // Empty cell when volatility is zero
        trial.sharpe_ratio.map(|s| s.to_string()).unwrap_or_default(),
    ];
    match &trial.weights {
        Some(weights) if with_weights => record.extend(weights.iter().map(f64::to_string)),
        _ => {}
    }
    record
}

/// Serialize the result set, one row per trial in trial order.
///
/// Weight columns are written only when every trial kept its weights.
pub fn write_results<W: std::io::Write>(
    results: &SimulationResultSet,
    writer: W,
) -> Result<(), FileError> {
    let with_weights = results.trials.iter().all(|t| t.weights.is_some());
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(results_header(results, with_weights))?;
    for trial in &results.trials {
        csv.write_record(trial_record(trial, with_weights))?;
    }
    csv.flush()
        .map_err(|e| FileError::Io(format!("Failed to flush results: {e}")))
}

/// Write the results CSV to `path` atomically
pub fn save_results(results: &SimulationResultSet, path: &Path) -> Result<(), FileError> {
    let mut buffer = Vec::new();
    write_results(results, &mut buffer)?;
    atomic_write_bytes(path, &buffer)
        .map_err(|e| FileError::Io(format!("Failed to write {}: {e}", path.display())))?;
    tracing::info!(
        path = %path.display(),
        trials = results.len(),
        "Saved simulation results"
    );
    Ok(())
}

fn format_sharpe(sharpe: Option<f64>) -> String {
    sharpe.map_or_else(|| "n/a".to_string(), |s| format!("{s:.4}"))
}

/// First `rows` trials as an aligned table
#[must_use]
pub fn format_preview(results: &SimulationResultSet, rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:>10}  {:>10}  {:>12}",
        "#", "Returns", "Volatility", "Sharpe Ratio"
    );
    for trial in results.head(rows) {
        let _ = writeln!(
            out,
            "{:>6}  {:>10.4}  {:>10.4}  {:>12}",
            trial.index,
            trial.expected_return,
            trial.volatility,
            format_sharpe(trial.sharpe_ratio)
        );
    }
    out
}

fn format_portfolio(out: &mut String, title: &str, trial: &TrialResult, symbols: &[String]) {
    let _ = writeln!(out, "{title} (trial {})", trial.index);
    let _ = writeln!(out, "  Returns       {:.4}", trial.expected_return);
    let _ = writeln!(out, "  Volatility    {:.4}", trial.volatility);
    let _ = writeln!(out, "  Sharpe Ratio  {}", format_sharpe(trial.sharpe_ratio));
    if let Some(weights) = &trial.weights {
        for (symbol, weight) in symbols.iter().zip(weights) {
            let _ = writeln!(out, "  {symbol:<12}  {:>6.2}%", weight * 100.0);
        }
    }
}

/// Max-Sharpe and min-volatility portfolios, frontier size and run counters
#[must_use]
pub fn format_summary(results: &SimulationResultSet) -> String {
    let mut out = String::new();
    match results.max_sharpe() {
        Some(trial) => format_portfolio(&mut out, "Max Sharpe ratio", trial, &results.symbols),
        None => {
            let _ = writeln!(out, "Max Sharpe ratio: none (every trial has zero volatility)");
        }
    }
    if let Some(trial) = results.min_volatility() {
        format_portfolio(&mut out, "Min volatility", trial, &results.symbols);
    }

    let metrics = &results.metrics;
    let _ = writeln!(
        out,
        "Efficient frontier: {} of {} trials",
        results.efficient_frontier().len(),
        results.len()
    );
    let _ = writeln!(
        out,
        "Seed {} | risk-free rate {} | redraws {} | zero-volatility {} | clamped {}",
        results.seed,
        results.risk_free_rate,
        metrics.weight_redraws,
        metrics.zero_volatility_trials,
        metrics.clamped_variances
    );
    for warning in &results.warnings {
        let _ = writeln!(out, "Warning: {}", warning.message());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::synthetic::{PathSpec, geometric_brownian_paths};
    use frontier_core::{SamplingConfig, SamplingMetrics, SamplingWarning, simulate};
    use jiff::civil::date;

    fn trial(index: usize, sharpe: Option<f64>, weights: Option<Vec<f64>>) -> TrialResult {
        TrialResult {
            index,
            expected_return: 0.05 + index as f64 * 0.01,
            volatility: if sharpe.is_some() { 0.1 } else { 0.0 },
            sharpe_ratio: sharpe,
            weights,
        }
    }

    fn result_set(trials: Vec<TrialResult>) -> SimulationResultSet {
        SimulationResultSet {
            symbols: vec!["AAA".to_string(), "BBB".to_string()],
            trials,
            seed: 7,
            risk_free_rate: 0.01,
            metrics: SamplingMetrics::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_results_csv_layout() {
        let results = result_set(vec![
            trial(0, Some(0.4), Some(vec![0.25, 0.75])),
            trial(1, None, Some(vec![1.0, 0.0])),
        ]);

        let mut out = Vec::new();
        write_results(&results, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Returns,Volatility,Sharpe Ratio,AAA Weight,BBB Weight"
        );
        assert_eq!(lines[1], "0.05,0.1,0.4,0.25,0.75");
        assert!(lines[2].ends_with(",0,,1,0"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_results_csv_without_weights() {
        let results = result_set(vec![trial(0, Some(0.4), None)]);
        let mut out = Vec::new();
        write_results(&results, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Returns,Volatility,Sharpe Ratio\n0.05,0.1,0.4\n"
        );
    }

    #[test]
    fn test_save_results_round_trip_row_count() {
        let prices = geometric_brownian_paths(
            &["X", "Y"],
            &[PathSpec::new(10.0, 0.05, 0.2), PathSpec::new(20.0, 0.03, 0.1)],
            60,
            date(2024, 1, 1),
            3,
        )
        .unwrap();
        let results =
            simulate(&prices, &SamplingConfig::default().with_trials(40).with_seed(3)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation_results.csv");
        save_results(&results, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 5);
        assert_eq!(reader.records().count(), 40);
    }

    #[test]
    fn test_preview_and_summary() {
        let mut results = result_set(vec![
            trial(0, Some(0.4), Some(vec![0.25, 0.75])),
            trial(1, Some(0.5), Some(vec![0.5, 0.5])),
            trial(2, Some(0.1), Some(vec![0.9, 0.1])),
        ]);
        results.warnings.push(SamplingWarning::ZeroVolatilityTrials { count: 0 });

        let preview = format_preview(&results, 2);
        assert_eq!(preview.lines().count(), 3);
        assert!(preview.contains("0.5000"));

        let summary = format_summary(&results);
        assert!(summary.contains("Max Sharpe ratio (trial 1)"));
        assert!(summary.contains("Min volatility (trial 0)"));
        assert!(summary.contains("AAA"));
        assert!(summary.contains("50.00%"));
        assert!(summary.contains("Seed 7"));
        assert!(summary.contains("Warning:"));
    }

    #[test]
    fn test_summary_without_sharpe() {
        let results = result_set(vec![trial(0, None, None)]);
        let summary = format_summary(&results);
        assert!(summary.contains("Max Sharpe ratio: none"));
        assert!(summary.contains("Min volatility (trial 0)"));
        assert!(format_preview(&results, 5).contains("n/a"));
    }
}
