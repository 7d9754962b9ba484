//! Alpaca REST client
//!
//! Two endpoints are used: the trading API asset list and the market data daily
//! bars. Both authenticate with the `APCA-API-KEY-ID` / `APCA-API-SECRET-KEY` headers.

use crate::constants::ALPACA_BARS_PAGE_LIMIT;
use crate::error::{Error, Result};
use crate::models::AlpacaSyncConfig;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const KEY_ID_HEADER: &str = "APCA-API-KEY-ID";
const SECRET_KEY_HEADER: &str = "APCA-API-SECRET-KEY";

/// One entry of `GET /v2/assets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlpacaAsset {
    pub symbol: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub exchange: String,

    #[serde(default, rename = "class")]
    pub asset_class: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub tradable: bool,
}

/// One daily bar from `GET /v2/stocks/{symbol}/bars`
///
/// Only the bar time and close are stored; the other OHLCV fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub time: DateTime<Utc>,

    #[serde(rename = "c")]
    pub close: f64,
}

#[derive(Debug, Deserialize)]
struct BarsPage {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,

    #[serde(default)]
    next_page_token: Option<String>,
}

/// Authenticated client for the Alpaca trading and market data APIs
pub struct AlpacaClient {
    trading_url: String,
    data_url: String,
    feed: String,
    api_key_id: String,
    api_secret_key: String,
    client: reqwest::Client,
}

impl AlpacaClient {
    pub fn new(config: &AlpacaSyncConfig) -> Result<Self> {
        let trading_url = normalize_base_url(&config.trading_url)?;
        let data_url = normalize_base_url(&config.data_url)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!(trading_url = %trading_url, data_url = %data_url, feed = %config.feed, "Created Alpaca client");

        Ok(Self {
            trading_url,
            data_url,
            feed: config.feed.clone(),
            api_key_id: config.api_key_id.clone(),
            api_secret_key: config.api_secret_key.clone(),
            client,
        })
    }

    /// Active US equities
    pub async fn list_assets(&self) -> Result<Vec<AlpacaAsset>> {
        let url = format!("{}/v2/assets", self.trading_url);
        let assets: Vec<AlpacaAsset> = self
            .get_json(&url, &[("status", "active"), ("asset_class", "us_equity")])
            .await?;

        debug!(count = assets.len(), "Fetched Alpaca asset list");
        Ok(assets)
    }

    /// All daily bars since `start`, following pagination
    pub async fn daily_bars(&self, symbol: &str, start: NaiveDate) -> Result<Vec<AlpacaBar>> {
        let url = format!("{}/v2/stocks/{}/bars", self.data_url, symbol);
        let start = start.format("%Y-%m-%d").to_string();
        let limit = ALPACA_BARS_PAGE_LIMIT.to_string();

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("timeframe", "1Day"),
                ("start", &start),
                ("adjustment", "all"),
                ("limit", &limit),
                ("feed", &self.feed),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("page_token", token));
            }

            let page: BarsPage = self.get_json(&url, &query).await?;
            bars.extend(page.bars.unwrap_or_default());

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(symbol = %symbol, bars = bars.len(), "Fetched daily bars");
        Ok(bars)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(KEY_ID_HEADER, &self.api_key_id)
            .header(SECRET_KEY_HEADER, &self.api_secret_key)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Failed to parse response from {}: {}", url, e)))
    }
}

/// Map a non-2xx status to the crate error
fn status_error(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimit,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("Alpaca returned {}: {}", status, body))
        }
        _ => Error::Network(format!("Alpaca returned error status {}: {}", status, body)),
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let base_url = raw.trim().trim_end_matches('/').to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::Config(format!(
            "Invalid Alpaca URL: must start with http:// or https://, got: '{}'",
            base_url
        )));
    }
    Ok(base_url)
}
