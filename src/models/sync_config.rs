use crate::constants::{
    DEFAULT_ALPACA_DATA_URL, DEFAULT_ALPACA_DELAY_MS, DEFAULT_ALPACA_FEED, DEFAULT_ALPACA_LOOKBACK_DAYS,
    DEFAULT_ALPACA_TRADING_URL,
};
use crate::error::{Error, Result};
use crate::utils::parse_symbol_list;
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for the Alpaca sync job
#[derive(Debug, Clone)]
pub struct AlpacaSyncConfig {
    /// API key id (APCA-API-KEY-ID)
    pub api_key_id: String,

    /// API secret (APCA-API-SECRET-KEY)
    pub api_secret_key: String,

    /// Base URL for the trading API (asset list)
    pub trading_url: String,

    /// Base URL for the market data API (bars)
    pub data_url: String,

    /// Market data feed (iex or sip)
    pub feed: String,

    /// Only sync these symbols; empty means every tradable asset
    pub symbols: Vec<String>,

    /// Stop after this many symbols
    pub max_symbols: Option<usize>,

    /// Pause between per-symbol requests
    pub delay_ms: u64,

    /// How far back to request daily bars
    pub lookback_days: i64,

    /// Directory the synced files are written to
    pub data_dir: PathBuf,
}

impl AlpacaSyncConfig {
    /// Create a config with default endpoints and pacing
    pub fn new(api_key_id: String, api_secret_key: String, data_dir: PathBuf) -> Self {
        Self {
            api_key_id,
            api_secret_key,
            trading_url: DEFAULT_ALPACA_TRADING_URL.to_string(),
            data_url: DEFAULT_ALPACA_DATA_URL.to_string(),
            feed: DEFAULT_ALPACA_FEED.to_string(),
            symbols: Vec::new(),
            max_symbols: None,
            delay_ms: DEFAULT_ALPACA_DELAY_MS,
            lookback_days: DEFAULT_ALPACA_LOOKBACK_DAYS,
            data_dir,
        }
    }

    /// Read the config from `ALPACA_*` environment variables
    ///
    /// Returns `Ok(None)` when the credentials are not set (sync disabled) and
    /// `Err(Error::Config)` when a numeric variable cannot be parsed.
    pub fn from_env(data_dir: PathBuf) -> Result<Option<Self>> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(data_dir: PathBuf, lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (Some(key_id), Some(secret)) = (non_empty("ALPACA_API_KEY_ID"), non_empty("ALPACA_API_SECRET_KEY")) else {
            return Ok(None);
        };

        let mut config = Self::new(key_id, secret, data_dir);

        if let Some(url) = non_empty("ALPACA_TRADING_URL") {
            config.trading_url = url;
        }
        if let Some(url) = non_empty("ALPACA_DATA_URL") {
            config.data_url = url;
        }
        if let Some(feed) = non_empty("ALPACA_FEED") {
            config.feed = feed;
        }
        if let Some(symbols) = non_empty("ALPACA_SYMBOLS") {
            config.symbols = parse_symbol_list(&symbols);
        }
        if let Some(max) = non_empty("ALPACA_MAX_SYMBOLS") {
            config.max_symbols = Some(parse_number("ALPACA_MAX_SYMBOLS", &max)?);
        }
        if let Some(delay) = non_empty("ALPACA_DELAY_MS") {
            config.delay_ms = parse_number("ALPACA_DELAY_MS", &delay)?;
        }
        if let Some(days) = non_empty("ALPACA_LOOKBACK_DAYS") {
            config.lookback_days = parse_number("ALPACA_LOOKBACK_DAYS", &days)?;
        }

        Ok(Some(config))
    }

    /// First date requested from the bars endpoint
    pub fn start_date(&self) -> NaiveDate {
        (Utc::now() - Duration::days(self.lookback_days.max(1))).date_naive()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, value)))
}

/// Outcome of one sync run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    /// Symbols attempted
    pub total: usize,
    /// Symbols whose file was written
    pub fetched: usize,
    /// Symbols that failed (network, auth, empty bars, write errors)
    pub failed: usize,
    pub delay_ms: u64,
}
