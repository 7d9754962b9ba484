use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "stockhawk")]
#[command(about = "Daily stock series with derived metrics, served over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the data directory and start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Directory with the source JSON files
        #[arg(long, env = "DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Directory with the static dashboard
        #[arg(long, env = "PUBLIC_DIR")]
        public_dir: Option<PathBuf>,
    },
    /// Sync asset metadata and daily bars from Alpaca into the data directory
    Sync {
        /// Comma-separated symbols to sync (default: every tradable asset)
        #[arg(long)]
        symbols: Option<String>,

        /// Stop after this many symbols
        #[arg(long)]
        max_symbols: Option<usize>,

        /// Pause between symbols in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Days of history to request
        #[arg(long)]
        lookback_days: Option<i64>,

        /// Directory the files are written to
        #[arg(long, env = "DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
    /// Show loaded datasets and their latest metrics
    Status {
        /// Directory with the source JSON files
        #[arg(long, env = "DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data_dir, public_dir } => {
            commands::serve::run(port, data_dir, public_dir).await;
        }
        Commands::Sync { symbols, max_symbols, delay_ms, lookback_days, data_dir } => {
            let overrides = commands::sync::SyncOverrides {
                symbols,
                max_symbols,
                delay_ms,
                lookback_days,
                data_dir,
            };
            commands::sync::run(overrides).await;
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir);
        }
    }
}
