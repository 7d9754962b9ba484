use crate::constants::{INSIGHT_LEADERS, METADATA_FILE_PREFIX};
use crate::error::{Error, Result};
use crate::models::{
    AssetSummary, ChartDocument, Insights, LeaderboardMetric, Leaders, NormalizedAsset, SortDirection,
};
use crate::services::leaderboard::leaders;
use crate::services::normalizer::{normalize_asset, symbol_from_filename};
use crate::utils::format_iso_millis;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// In-memory symbol -> asset mapping, built once at startup and then only read
///
/// Keys are uppercase symbols. Share it as `Arc<AssetCatalog>`.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    assets: BTreeMap<String, NormalizedAsset>,
}

impl AssetCatalog {
    /// Load every `*.json` chart file in `dir`
    ///
    /// Files starting with `symbol` are sync metadata and are skipped. Files that fail
    /// to read or parse are logged and skipped; only an unreadable directory is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let files = list_source_files(dir)?;
        let mut catalog = Self::default();
        let mut rejected = 0;
        let mut failed = 0;

        for path in &files {
            match read_document(path) {
                Ok(doc) => {
                    if !catalog.insert_document(doc, &symbol_from_filename(path)) {
                        debug!(file = ?path, "Rejected payload (no result or fewer than 2 points)");
                        rejected += 1;
                    }
                }
                Err(e) => {
                    warn!(file = ?path, error = %e, "Skipping unreadable source file");
                    failed += 1;
                }
            }
        }

        info!(
            dir = ?dir,
            files = files.len(),
            assets = catalog.len(),
            rejected,
            failed,
            "Asset catalog loaded"
        );
        Ok(catalog)
    }

    /// Normalize and insert one document; false when the payload is rejected
    fn insert_document(&mut self, doc: ChartDocument, fallback_symbol: &str) -> bool {
        match doc.into_payload().and_then(|p| normalize_asset(p, fallback_symbol)) {
            Some(asset) => {
                self.insert(asset);
                true
            }
            None => false,
        }
    }

    /// Insert an asset; an existing entry is replaced only by a strictly newer series
    pub fn insert(&mut self, asset: NormalizedAsset) {
        let key = asset.symbol.to_uppercase();

        if let Some(existing) = self.assets.get(&key) {
            if asset.last_timestamp() <= existing.last_timestamp() {
                debug!(symbol = %key, "Discarding duplicate with equal or older data");
                return;
            }
            debug!(symbol = %key, "Replacing duplicate with newer data");
        }

        self.assets.insert(key, asset);
    }

    /// Look up by symbol (case-insensitive)
    pub fn get(&self, symbol: &str) -> Option<&NormalizedAsset> {
        self.assets.get(&symbol.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// All symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    pub fn assets(&self) -> impl Iterator<Item = &NormalizedAsset> {
        self.assets.values()
    }

    /// Summaries sorted by symbol
    pub fn summaries(&self) -> Vec<AssetSummary> {
        self.assets.values().map(NormalizedAsset::summary).collect()
    }

    /// Newest last-point timestamp across all assets, ISO formatted
    pub fn last_updated(&self) -> Option<String> {
        self.assets
            .values()
            .filter_map(NormalizedAsset::last_timestamp)
            .max()
            .and_then(format_iso_millis)
    }

    /// Dashboard leaderboards
    pub fn insights(&self) -> Insights {
        let summaries = self.summaries();
        let top = |metric, direction| leaders(&summaries, metric, INSIGHT_LEADERS, direction);

        Insights {
            datasets: self.len(),
            last_updated: self.last_updated(),
            leaders: Leaders {
                momentum: top(LeaderboardMetric::Momentum90d, SortDirection::Desc),
                growth: top(LeaderboardMetric::Cagr, SortDirection::Desc),
                stability: top(LeaderboardMetric::MaxDrawdown, SortDirection::Asc),
                intraday: top(LeaderboardMetric::ChangePct, SortDirection::Desc),
            },
        }
    }
}

/// `*.json` files in `dir` that are not metadata files, sorted by name
fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::Io(format!("Failed to read data dir {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Io(format!("Failed to read entry: {}", e)))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(".json") && !name.starts_with(METADATA_FILE_PREFIX) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn read_document(path: &Path) -> Result<ChartDocument> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
