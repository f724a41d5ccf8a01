use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frontier::data::preprocess::DEFAULT_FIELD;
use frontier::{Overrides, RunConfig, init_logging, render_report, run_preprocess, run_simulation};

#[derive(Parser, Debug)]
#[command(name = "frontier")]
#[command(about = "Monte Carlo portfolio sampling over historical prices")]
struct Args {
    /// Path to the data directory (default: ~/.frontier/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample random long-only portfolios and summarize them
    Simulate {
        /// Clean price table CSV (date column + one column per symbol)
        #[arg(short, long)]
        prices: Option<PathBuf>,

        /// Run configuration YAML
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Results CSV destination
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of random portfolios
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Annualized risk-free rate for the Sharpe ratio
        #[arg(long, allow_negative_numbers = true)]
        risk_free_rate: Option<f64>,

        /// Base seed; a run without one prints the seed it used
        #[arg(long)]
        seed: Option<u64>,

        /// Run on the calling thread only
        #[arg(long)]
        sequential: bool,

        /// Leave weight columns out of the results
        #[arg(long)]
        no_weights: bool,

        /// Number of result rows to print
        #[arg(long)]
        preview: Option<usize>,
    },
    /// Flatten a two-level (ticker, field) header download into a clean price table
    Preprocess {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Price field kept for each ticker
        #[arg(short, long, default_value = DEFAULT_FIELD)]
        field: String,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".frontier")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    match args.command {
        Command::Simulate {
            prices,
            config,
            output,
            trials,
            risk_free_rate,
            seed,
            sequential,
            no_weights,
            preview,
        } => {
            let overrides = Overrides {
                prices,
                output,
                preview_rows: preview,
                trial_count: trials,
                risk_free_rate,
                seed,
                sequential,
                no_weights,
            };
            let run = RunConfig::load_or_default(config.as_deref())?.with_overrides(&overrides);
            let results = run_simulation(&run)?;

            print!("{}", render_report(&results, run.preview_rows));
            if let Some(output) = &run.output {
                println!("Results written to {}", output.display());
            }
        }
        Command::Preprocess {
            input,
            output,
            field,
        } => {
            let report = run_preprocess(&input, &output, &field)?;
            println!(
                "Wrote {} rows to {} ({} dropped for missing values)",
                report.rows_kept,
                output.display(),
                report.rows_dropped
            );
        }
    }

    tracing::info!("Frontier finished");
    Ok(())
}
