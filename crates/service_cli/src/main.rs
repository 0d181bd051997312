//! volctl - Command Line Operations for Volatility Estimation
//!
//! Operational entry point for the volatility engine.
//!
//! # Commands
//!
//! - `volctl quality --prices <csv>` - Data-quality report for a price history
//! - `volctl estimate --prices <csv> --method <name|all>` - Realized volatility
//! - `volctl blend --prices <csv> [--chain <json> | --iv <vol>]` - Blended volatility
//! - `volctl term-structure --chain <json> --spot <price>` - ATM IV term structure
//!
//! Results go to stdout; logs go to stderr.
//!
//! # Architecture
//!
//! Service layer: loads files through `adapter_loader`, computes through
//! `vol_estimators`, and renders the results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vol_estimators::implied::DEFAULT_TERM_STRUCTURE_EXPIRATIONS;

mod commands;
mod config;
mod error;

use commands::OutputFormat;
use config::{build_config, CliArgs, LogLevel};
pub use error::{CliError, Result};

/// Volatility estimation and blending CLI
#[derive(Parser)]
#[command(name = "volctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overrides --log-level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "VOLCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Short look-back window in bars
    #[arg(long, global = true)]
    short_window: Option<usize>,

    /// Long look-back window in bars
    #[arg(long, global = true)]
    long_window: Option<usize>,

    /// Periods per year used to annualize
    #[arg(long, global = true)]
    annualization_factor: Option<f64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report data-quality issues and warnings for a price history
    Quality {
        /// Price history CSV
        #[arg(short, long)]
        prices: PathBuf,
    },

    /// Estimate realized volatility
    Estimate {
        /// Price history CSV
        #[arg(short, long)]
        prices: PathBuf,

        /// Estimator (close_to_close, parkinson, garman_klass, yang_zhang) or `all`
        #[arg(short, long, default_value = "all")]
        method: String,

        /// Look-back window in bars (defaults to the short window)
        #[arg(short, long)]
        window: Option<usize>,

        /// Report per-period volatility instead of annualized
        #[arg(long)]
        daily: bool,
    },

    /// Blend realized volatility with implied volatility
    Blend {
        /// Price history CSV
        #[arg(short, long)]
        prices: PathBuf,

        /// Options chain snapshot (JSON)
        #[arg(long, conflicts_with = "iv")]
        chain: Option<PathBuf>,

        /// Implied volatility as a decimal fraction
        #[arg(long)]
        iv: Option<f64>,

        /// Underlying price for ATM selection (defaults to the last close)
        #[arg(long)]
        spot: Option<f64>,
    },

    /// ATM implied-volatility term structure from an options chain
    TermStructure {
        /// Options chain snapshot (JSON)
        #[arg(long)]
        chain: PathBuf,

        /// Underlying price for ATM selection
        #[arg(long)]
        spot: f64,

        /// Number of expirations
        #[arg(short = 'n', long, default_value_t = DEFAULT_TERM_STRUCTURE_EXPIRATIONS)]
        expirations: usize,
    },
}

impl From<&Cli> for CliArgs {
    fn from(cli: &Cli) -> Self {
        CliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            short_window: cli.short_window,
            long_window: cli.long_window,
            annualization_factor: cli.annualization_factor,
        }
    }
}

fn init_tracing(log_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliArgs::from(&cli))?;

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    init_tracing(log_level);
    debug!(?config, "configuration resolved");

    let engine = config.engine();
    let output = match &cli.command {
        Commands::Quality { prices } => commands::quality::run(&engine, prices, cli.format),
        Commands::Estimate {
            prices,
            method,
            window,
            daily,
        } => commands::estimate::run(&engine, prices, method, *window, *daily, cli.format),
        Commands::Blend {
            prices,
            chain,
            iv,
            spot,
        } => commands::blend::run(
            &engine,
            prices,
            chain.as_deref(),
            *iv,
            *spot,
            cli.format,
        ),
        Commands::TermStructure {
            chain,
            spot,
            expirations,
        } => commands::term_structure::run(chain, *spot, *expirations, cli.format),
    }?;

    println!("{}", output);
    Ok(())
}
