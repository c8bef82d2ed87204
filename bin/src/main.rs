//! candela CLI - replay exchange feed streams into OHLC bars.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Replay exchange feed streams into OHLC bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress log output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a feed stream through the aggregator
    Replay {
        /// Symbol identifier (e.g., BTC-USD)
        #[arg(short, long, default_value = "BTC-USD")]
        symbol: String,

        /// Aggregation interval (m1, m5, m15, m30, h1, h2, h6, d1)
        #[arg(short, long, default_value = "m1")]
        interval: String,

        /// Historical candle file (exchange-format JSON array) to seed from
        #[arg(short, long)]
        candles: Option<PathBuf>,

        /// Feed message file, one JSON frame per line. Defaults to stdin.
        #[arg(short, long)]
        ticks: Option<PathBuf>,

        /// Stream each finalized bar as it occurs instead of printing the
        /// final snapshot at end of input
        #[arg(short, long)]
        follow: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// List supported aggregation intervals
    Intervals,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Replay {
            symbol,
            interval,
            candles,
            ticks,
            follow,
            format,
        } => commands::replay::run(symbol, &interval, candles, ticks, follow, format),
        Commands::Intervals => {
            commands::intervals::run();
            Ok(())
        }
    }
}

/// Installs the log subscriber, honoring `RUST_LOG` when set.
fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
