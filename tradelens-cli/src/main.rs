//! TradeLens CLI: trade analytics, position tracking and indicator commands.
//!
//! Commands:
//! - `analytics`: chart-ready analytics bundle for a trade CSV
//! - `positions`: position groups per `(ticker, cycle)`, optionally marked to quotes
//! - `indicators`: SMA / RSI / MACD series and chart patterns for a candle CSV
//! - `report`: bundle, summary and positions in one document
//!
//! Results go to stdout (or `--output`); logs go to stderr.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradelens_runner::{
    export_bundle_csv, export_json, export_positions_csv, generate_report, load_candles,
    load_trades, run_report_from_file, write_output, AnalysisConfig, AnalysisRunner,
    AnalyticsRequest, IndicatorRequest, PositionsRequest,
};

#[derive(Parser)]
#[command(
    name = "tradelens",
    about = "TradeLens CLI: trading analytics and position lifecycle tracking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the eight analytics blocks for a trade CSV.
    Analytics {
        /// Trade CSV file.
        #[arg(long)]
        trades: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (json or csv).
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Track position groups for a trade CSV.
    Positions {
        /// Trade CSV file.
        #[arg(long)]
        trades: PathBuf,

        /// Latest price for a ticker, as TICKER=PRICE. Repeatable.
        #[arg(long = "quote")]
        quotes: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (json or csv).
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compute indicators and detect chart patterns for a candle CSV.
    Indicators {
        /// Candle CSV file.
        #[arg(long)]
        candles: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Full report: analytics bundle, summary metrics and positions.
    Report {
        /// Trade CSV file.
        #[arg(long)]
        trades: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (json or markdown).
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tradelens=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analytics {
            trades,
            config,
            format,
            output,
        } => run_analytics(&trades, config.as_deref(), format, output.as_deref()),
        Commands::Positions {
            trades,
            quotes,
            config,
            format,
            output,
        } => run_positions(&trades, &quotes, config.as_deref(), format, output.as_deref()),
        Commands::Indicators {
            candles,
            config,
            output,
        } => run_indicators(&candles, config.as_deref(), output.as_deref()),
        Commands::Report {
            trades,
            config,
            format,
            output,
        } => run_report(&trades, config.as_deref(), format, output.as_deref()),
    }
}

fn build_runner(config_path: Option<&Path>) -> Result<AnalysisRunner> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    Ok(AnalysisRunner::new(config)?)
}

fn emit(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_output(path, contents)?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn run_analytics(
    trades_path: &Path,
    config_path: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let runner = build_runner(config_path)?;
    let loaded = load_trades(trades_path)?;
    let bundle = runner
        .analytics(&AnalyticsRequest {
            trades: loaded.trades,
        })
        .value;

    let rendered = match format {
        Format::Json => export_json(&bundle)?,
        Format::Csv => export_bundle_csv(&bundle)?,
        Format::Markdown => bail!("--format markdown is only supported by `report`"),
    };
    emit(&rendered, output)
}

fn run_positions(
    trades_path: &Path,
    quote_args: &[String],
    config_path: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let quotes = parse_quotes(quote_args)?;
    let runner = build_runner(config_path)?;
    let loaded = load_trades(trades_path)?;
    let report = runner
        .positions(&PositionsRequest {
            trades: loaded.trades,
            quotes,
        })
        .value;

    if !report.orphans.is_empty() {
        info!(orphans = report.orphans.len(), "some trades had no open position");
    }

    let rendered = match format {
        Format::Json => export_json(&report)?,
        Format::Csv => export_positions_csv(&report.groups)?,
        Format::Markdown => bail!("--format markdown is only supported by `report`"),
    };
    emit(&rendered, output)
}

fn run_indicators(
    candles_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let runner = build_runner(config_path)?;
    let loaded = load_candles(candles_path)?;
    let request = IndicatorRequest {
        candles: loaded.candles,
        options: runner.config().indicators.clone(),
    };
    let report = runner.indicators(&request).value;
    emit(&export_json(&report)?, output)
}

fn run_report(
    trades_path: &Path,
    config_path: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    if format == Format::Csv {
        bail!("--format csv is not supported by `report`; use `analytics` or `positions`");
    }
    let report = run_report_from_file(trades_path, config_path)?;

    let rendered = match format {
        Format::Markdown => generate_report(&report),
        _ => export_json(&report)?,
    };
    emit(&rendered, output)
}

/// Parse repeated `TICKER=PRICE` arguments.
fn parse_quotes(args: &[String]) -> Result<HashMap<String, f64>> {
    let mut quotes = HashMap::with_capacity(args.len());
    for arg in args {
        let Some((ticker, price)) = arg.split_once('=') else {
            bail!("invalid --quote '{arg}': expected TICKER=PRICE");
        };
        let ticker = ticker.trim();
        if ticker.is_empty() {
            bail!("invalid --quote '{arg}': empty ticker");
        }
        let price: f64 = price
            .trim()
            .parse()
            .with_context(|| format!("invalid --quote '{arg}': price is not a number"))?;
        if !price.is_finite() || price < 0.0 {
            bail!("invalid --quote '{arg}': price must be a non-negative number");
        }
        quotes.insert(ticker.to_string(), price);
    }
    Ok(quotes)
}
