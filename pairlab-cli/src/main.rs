//! PairLab CLI — scan a symbol universe for tradeable pairs.
//!
//! Commands:
//! - `scan` — read symbols, fetch prices, run every screen, write `a,b` lines
//! - `config` — print the default pipeline configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pairlab_core::data::{
    CircuitBreaker, CsvProvider, DataProvider, LogProgress, SyntheticProvider, YahooProvider,
};
use pairlab_runner::{run_scan, PipelineConfig, ScanRequest};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pairlab",
    about = "PairLab CLI — statistical-arbitrage pair screening"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen every pair of a symbol list and write the survivors.
    Scan {
        /// Symbol list: one ticker per line, `#` starts a comment.
        #[arg(long)]
        symbols: PathBuf,

        /// Output file, one `a,b` line per surviving pair. Overwritten each run.
        #[arg(long, default_value = "pairs.txt")]
        output: PathBuf,

        /// Optional JSON report with per-stage counts and pair statistics.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Path to a TOML pipeline config. Defaults apply to anything omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read `<SYMBOL>.csv` files from this directory instead of Yahoo Finance.
        #[arg(long, conflicts_with = "synthetic")]
        csv_dir: Option<PathBuf>,

        /// Use deterministic synthetic prices (offline demo).
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Number of symbols fetched concurrently (overrides the config).
        #[arg(long)]
        concurrency: Option<usize>,

        /// Screen pairs on a single thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Last date of the price window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Scan {
            symbols,
            output,
            report,
            config,
            csv_dir,
            synthetic,
            concurrency,
            sequential,
            as_of,
        } => run_scan_cmd(ScanArgs {
            symbols,
            output,
            report,
            config,
            csv_dir,
            synthetic,
            concurrency,
            sequential,
            as_of,
        }),
        Commands::Config => {
            print!("{}", PipelineConfig::default().to_toml()?);
            Ok(())
        }
    }
}

struct ScanArgs {
    symbols: PathBuf,
    output: PathBuf,
    report: Option<PathBuf>,
    config: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    synthetic: bool,
    concurrency: Option<usize>,
    sequential: bool,
    as_of: Option<String>,
}

fn run_scan_cmd(args: ScanArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(concurrency) = args.concurrency {
        config.data.concurrency = concurrency;
    }
    if args.sequential {
        config.run.parallel = false;
    }

    let as_of = args
        .as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--as-of must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let provider = build_provider(&args, &config)?;
    info!(provider = provider.name(), "using data provider");

    let request = ScanRequest {
        symbols_path: args.symbols,
        output_path: args.output,
        report_path: args.report,
        as_of,
    };

    let summary = run_scan(&request, &config, provider.as_ref(), &LogProgress)?;

    println!(
        "{} pair(s) from {} symbol(s) written to {}",
        summary.pair_count(),
        summary.universe.store.len(),
        request.output_path.display()
    );
    if !summary.universe.excluded.is_empty() {
        println!("{} symbol(s) excluded:", summary.universe.excluded.len());
        for excluded in &summary.universe.excluded {
            println!("  {}: {}", excluded.symbol, excluded.reason);
        }
    }
    Ok(())
}

fn build_provider(args: &ScanArgs, config: &PipelineConfig) -> Result<Box<dyn DataProvider>> {
    if args.synthetic {
        return Ok(Box::new(SyntheticProvider::default()));
    }
    if let Some(dir) = &args.csv_dir {
        let provider = CsvProvider::new(dir);
        if !provider.is_available() {
            bail!("CSV directory does not exist: {}", dir.display());
        }
        return Ok(Box::new(provider));
    }

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(
        circuit_breaker,
        Duration::from_secs(config.data.request_timeout_secs),
        config.data.max_retries,
    )?;
    Ok(Box::new(provider))
}
