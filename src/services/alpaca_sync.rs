//! One-shot Alpaca sync job
//!
//! Pulls the tradable asset list and each symbol's daily bars, writing them into the
//! data directory in the same chart format the catalog loads. Symbols are processed
//! one at a time with a fixed pause between them; a failing symbol is counted and
//! skipped. The running server's catalog is not touched.

use crate::constants::{ALPACA_ASSETS_FILE, ALPACA_SERIES_SUFFIX, DEFAULT_CURRENCY};
use crate::error::{Error, Result};
use crate::models::{AlpacaSyncConfig, ChartDocument, ChartMeta, SyncSummary};
use crate::services::alpaca::{AlpacaAsset, AlpacaBar, AlpacaClient};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct AlpacaSync {
    config: AlpacaSyncConfig,
    client: AlpacaClient,
}

impl AlpacaSync {
    pub fn new(config: AlpacaSyncConfig) -> Result<Self> {
        let client = AlpacaClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Run the sync to completion
    ///
    /// Only a failure to fetch the asset list aborts the run.
    pub async fn run(&self) -> Result<SyncSummary> {
        let started = Instant::now();

        let assets = self.client.list_assets().await?;
        let selected = select_assets(assets, &self.config);
        let data_dir = &self.config.data_dir;

        info!(
            symbols = selected.len(),
            data_dir = ?data_dir,
            delay_ms = self.config.delay_ms,
            "Starting Alpaca sync"
        );

        if let Err(e) = tokio::fs::create_dir_all(data_dir).await {
            warn!(data_dir = ?data_dir, error = %e, "Failed to create data dir");
        }
        if let Err(e) = write_json(&data_dir.join(ALPACA_ASSETS_FILE), &selected).await {
            warn!(error = %e, "Failed to write asset metadata");
        }

        let start = self.config.start_date();
        let mut summary = SyncSummary {
            total: selected.len(),
            delay_ms: self.config.delay_ms,
            ..SyncSummary::default()
        };

        for (i, asset) in selected.iter().enumerate() {
            match self.sync_symbol(asset, start).await {
                Ok(points) => {
                    info!(symbol = %asset.symbol, points, "Synced");
                    summary.fetched += 1;
                }
                Err(e) => {
                    error!(symbol = %asset.symbol, error = %e, "Sync failed");
                    summary.failed += 1;
                }
            }

            if i + 1 < selected.len() && self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
        }

        info!(
            total = summary.total,
            fetched = summary.fetched,
            failed = summary.failed,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Alpaca sync finished"
        );
        Ok(summary)
    }

    async fn sync_symbol(&self, asset: &AlpacaAsset, start: NaiveDate) -> Result<usize> {
        let bars = self.client.daily_bars(&asset.symbol, start).await?;
        let points = bars.len();
        let doc = bars_to_document(asset, &bars)
            .ok_or_else(|| Error::Other(format!("No bars returned for {}", asset.symbol)))?;

        write_json(&series_path(&self.config.data_dir, &asset.symbol), &doc).await?;
        Ok(points)
    }
}

/// Tradable assets, restricted to the configured symbols and capped at `max_symbols`
pub fn select_assets(assets: Vec<AlpacaAsset>, config: &AlpacaSyncConfig) -> Vec<AlpacaAsset> {
    let mut selected: Vec<AlpacaAsset> = assets
        .into_iter()
        .filter(|a| a.tradable)
        .filter(|a| config.symbols.is_empty() || config.symbols.contains(&a.symbol.to_uppercase()))
        .collect();

    for wanted in &config.symbols {
        if !selected.iter().any(|a| a.symbol.eq_ignore_ascii_case(wanted)) {
            warn!(symbol = %wanted, "Requested symbol is not an active tradable asset");
        }
    }

    if let Some(max) = config.max_symbols {
        selected.truncate(max);
    }
    selected
}

/// Chart document for one asset's bars; None when there are no bars
pub fn bars_to_document(asset: &AlpacaAsset, bars: &[AlpacaBar]) -> Option<ChartDocument> {
    if bars.is_empty() {
        return None;
    }

    let timestamps: Vec<i64> = bars.iter().map(|b| b.time.timestamp()).collect();
    let closes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.close)).collect();

    let meta = ChartMeta {
        symbol: Some(asset.symbol.to_uppercase()),
        long_name: Some(asset.name.clone()).filter(|n| !n.trim().is_empty()),
        short_name: None,
        exchange_name: Some(asset.exchange.clone()).filter(|e| !e.trim().is_empty()),
        currency: Some(DEFAULT_CURRENCY.to_string()),
        first_trade_date: None,
    };

    Some(ChartDocument::from_series(meta, timestamps, closes.clone(), closes))
}

/// `{SYMBOL}_alpaca.json` inside the data dir
pub fn series_path(data_dir: &Path, symbol: &str) -> PathBuf {
    let file_symbol = symbol.to_uppercase().replace('/', "-");
    data_dir.join(format!("{}{}", file_symbol, ALPACA_SERIES_SUFFIX))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
