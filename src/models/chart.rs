//! Provider chart document
//!
//! Each source file holds one symbol in the chart envelope
//! `chart.result[0] { meta, timestamp, indicators.quote[0].close, indicators.adjclose[0].adjclose }`.
//! Every level is optional so a structurally incomplete document deserializes and is
//! then rejected by the normalizer instead of failing the whole load. The parallel
//! arrays are read element by element: a malformed entry becomes `None` and only that
//! index is dropped later.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartDocument {
    #[serde(default)]
    pub chart: Option<Chart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,

    /// Epoch seconds
    #[serde(default, deserialize_with = "lenient_timestamps")]
    pub timestamp: Option<Vec<Option<i64>>>,

    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Epoch seconds of the first trade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_trade_date: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Option<Vec<QuoteIndicator>>,

    #[serde(default)]
    pub adjclose: Option<Vec<AdjCloseIndicator>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default, deserialize_with = "lenient_prices")]
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjCloseIndicator {
    #[serde(default, deserialize_with = "lenient_prices")]
    pub adjclose: Option<Vec<Option<f64>>>,
}

/// Parallel arrays pulled out of a chart document, the normalizer's input
#[derive(Debug, Clone, Default)]
pub struct RawPayload {
    pub meta: Option<ChartMeta>,
    /// Epoch seconds; None where the entry was not an integral number
    pub timestamps: Vec<Option<i64>>,
    pub closes: Vec<Option<f64>>,
    pub adjusted_closes: Vec<Option<f64>>,
}

impl ChartDocument {
    /// Build a single-result document (used by the sync job when writing files)
    pub fn from_series(
        meta: ChartMeta,
        timestamps: Vec<i64>,
        closes: Vec<Option<f64>>,
        adjusted_closes: Vec<Option<f64>>,
    ) -> Self {
        Self {
            chart: Some(Chart {
                result: Some(vec![ChartResult {
                    meta: Some(meta),
                    timestamp: Some(timestamps.into_iter().map(Some).collect()),
                    indicators: Some(Indicators {
                        quote: Some(vec![QuoteIndicator { close: Some(closes) }]),
                        adjclose: Some(vec![AdjCloseIndicator {
                            adjclose: Some(adjusted_closes),
                        }]),
                    }),
                }]),
            }),
        }
    }

    /// Extract `chart.result[0]`; None when the envelope has no result
    pub fn into_payload(self) -> Option<RawPayload> {
        let result = self.chart?.result?.into_iter().next()?;
        let indicators = result.indicators.unwrap_or_default();

        let closes = indicators
            .quote
            .and_then(|q| q.into_iter().next())
            .and_then(|q| q.close)
            .unwrap_or_default();
        let adjusted_closes = indicators
            .adjclose
            .and_then(|a| a.into_iter().next())
            .and_then(|a| a.adjclose)
            .unwrap_or_default();

        Some(RawPayload {
            meta: result.meta,
            timestamps: result.timestamp.unwrap_or_default(),
            closes,
            adjusted_closes,
        })
    }
}

fn lenient_timestamps<'de, D>(deserializer: D) -> Result<Option<Vec<Option<i64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_array(deserializer, epoch_secs)
}

fn lenient_prices<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_array(deserializer, Value::as_f64)
}

/// Non-array values read as absent; each element goes through `element`
fn lenient_array<'de, D, T>(deserializer: D, element: fn(&Value) -> Option<T>) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.iter().map(element).collect()),
        _ => None,
    })
}

/// Integer epoch seconds; integral floats such as `1704153600.0` are accepted
fn epoch_secs(value: &Value) -> Option<i64> {
    if let Some(secs) = value.as_i64() {
        return Some(secs);
    }
    let secs = value.as_f64()?;
    (secs.is_finite() && secs.fract() == 0.0 && secs.abs() < i64::MAX as f64).then_some(secs as i64)
}
