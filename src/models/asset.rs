use chrono::NaiveDate;
use serde::Serialize;

use super::{Metrics, PricePoint};

/// A symbol's price series together with its metadata and derived metrics
///
/// Built only by the normalizer, so `series` always holds at least two points
/// sorted ascending by timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAsset {
    /// Uppercase ticker symbol
    pub symbol: String,

    /// Display name (long name, short name or the symbol itself)
    pub name: String,

    pub exchange: String,

    /// ISO 4217-like currency code
    pub currency: String,

    pub first_trade_date: Option<NaiveDate>,

    /// Date of the last price point
    pub last_updated: NaiveDate,

    pub metrics: Metrics,

    pub series: Vec<PricePoint>,
}

impl NormalizedAsset {
    /// Timestamp (ms) of the newest price point
    pub fn last_timestamp(&self) -> Option<i64> {
        self.series.last().map(|p| p.timestamp)
    }

    /// The trailing `limit` points; `limit <= 0` returns the full series
    pub fn trailing_series(&self, limit: i64) -> &[PricePoint] {
        if limit <= 0 {
            return &self.series;
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let start = self.series.len().saturating_sub(limit);
        &self.series[start..]
    }

    /// Detail view with the series truncated to the trailing `limit` points
    pub fn detail(&self, limit: i64) -> AssetDetail<'_> {
        AssetDetail {
            symbol: &self.symbol,
            name: &self.name,
            exchange: &self.exchange,
            currency: &self.currency,
            first_trade_date: self.first_trade_date,
            last_updated: self.last_updated,
            metrics: &self.metrics,
            series: self.trailing_series(limit),
        }
    }

    /// Projection without the series, with metrics flattened alongside the metadata
    pub fn summary(&self) -> AssetSummary {
        AssetSummary {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            exchange: self.exchange.clone(),
            currency: self.currency.clone(),
            last_updated: self.last_updated,
            metrics: self.metrics.clone(),
        }
    }
}

/// Borrowed asset view returned by the detail endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail<'a> {
    pub symbol: &'a str,
    pub name: &'a str,
    pub exchange: &'a str,
    pub currency: &'a str,
    pub first_trade_date: Option<NaiveDate>,
    pub last_updated: NaiveDate,
    pub metrics: &'a Metrics,
    pub series: &'a [PricePoint],
}

/// List entry returned by `/api/assets`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub currency: String,
    pub last_updated: NaiveDate,
    #[serde(flatten)]
    pub metrics: Metrics,
}
