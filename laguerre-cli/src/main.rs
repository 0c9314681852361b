//! Laguerre CLI: compute the ATR-adaptive Laguerre RSI from CSV bars.
//!
//! Commands:
//! - `compute`: run the indicator (and optionally feature expansion) over one or more CSV files
//! - `synthetic`: write deterministic synthetic OHLCV bars
//! - `info`: print the resolved configuration and its warmup length

mod io;

use std::fs::{self, File};
use std::io::{stdout, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use laguerre_core::config::FileConfig;
use laguerre_core::domain::Bar;
use laguerre_core::engine::{run_batch, AtrAdaptiveLaguerreRsi, LaguerreOutput};
use laguerre_core::features::FeatureExpander;
use laguerre_core::synthetic::synthetic_bars;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "laguerre",
    about = "Laguerre CLI: ATR-adaptive Laguerre RSI and features"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the indicator over CSV bar files.
    Compute {
        /// Input CSV files (columns: open, high, low, close[, volume][, timestamp]).
        #[arg(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// TOML config with [indicator] and [features] tables.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the feature columns instead of the raw intermediates.
        #[arg(long, default_value_t = false)]
        features: bool,

        /// Output directory. Without it, a single input is written to stdout.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write synthetic OHLCV bars as CSV.
    Synthetic {
        /// Number of bars.
        #[arg(long, default_value_t = 600)]
        bars: usize,

        /// Generator seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved configuration as JSON.
    Info {
        /// TOML config with [indicator] and [features] tables.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute {
            inputs,
            config,
            features,
            output_dir,
        } => run_compute(&inputs, config.as_deref(), features, output_dir.as_deref()),
        Commands::Synthetic { bars, seed, output } => run_synthetic(bars, seed, output.as_deref()),
        Commands::Info { config } => run_info(config.as_deref()),
    }
}

/// Logs go to stderr so CSV on stdout stays clean.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    FileConfig::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn run_compute(
    inputs: &[PathBuf],
    config_path: Option<&Path>,
    features: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    if output_dir.is_none() && inputs.len() > 1 {
        bail!("--output-dir is required with more than one --input");
    }

    let config = load_config(config_path)?;
    let indicator = AtrAdaptiveLaguerreRsi::new(config.indicator)?;
    let expander = if features {
        Some(FeatureExpander::new(config.features)?)
    } else {
        None
    };

    let series = inputs
        .iter()
        .map(|path| io::read_bars(path))
        .collect::<Result<Vec<_>>>()?;
    info!(
        inputs = inputs.len(),
        bars = series.iter().map(Vec::len).sum::<usize>(),
        min_lookback = indicator.min_lookback(),
        "loaded bars"
    );

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let results = run_batch(&indicator, &series);

    let mut failed = 0;
    for ((path, bars), result) in inputs.iter().zip(&series).zip(results) {
        let written = result
            .map_err(anyhow::Error::from)
            .and_then(|out| write_output(path, bars, &out, expander.as_ref(), output_dir));
        if let Err(e) = written {
            error!(input = %path.display(), "{e:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} input(s) failed", inputs.len());
    }
    Ok(())
}

fn write_output(
    input: &Path,
    bars: &[Bar],
    out: &LaguerreOutput,
    expander: Option<&FeatureExpander>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let writer: Box<dyn std::io::Write> = match output_dir {
        Some(dir) => {
            let path = io::output_path(dir, input);
            info!(input = %input.display(), output = %path.display(), "writing");
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(stdout().lock()),
    };

    match expander {
        Some(expander) => {
            let frame = expander.expand(&out.rsi, Some(&out.intermediates))?;
            io::write_features(writer, bars, &frame)
        }
        None => io::write_indicator(writer, bars, out),
    }
}

fn run_synthetic(n: usize, seed: u64, output: Option<&Path>) -> Result<()> {
    let bars = synthetic_bars(n, seed);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            io::write_bars(BufWriter::new(file), &bars)?;
            info!(bars = n, seed, output = %path.display(), "synthetic bars written");
        }
        None => io::write_bars(stdout().lock(), &bars)?,
    }
    Ok(())
}

fn run_info(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let indicator = AtrAdaptiveLaguerreRsi::new(config.indicator.clone())?;
    let report = serde_json::json!({
        "indicator": config.indicator,
        "features": config.features,
        "adaptive_lookback": config.indicator.adaptive_lookback(),
        "min_lookback": indicator.min_lookback(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
