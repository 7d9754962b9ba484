//! Series normalization
//!
//! Turns a provider payload into a [`NormalizedAsset`]: drops unusable closes,
//! converts timestamps to milliseconds, sorts, and fills in metadata defaults.
//! Payloads with fewer than two usable points are rejected (`None`).

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_EXCHANGE, MIN_SERIES_POINTS};
use crate::models::{ChartMeta, NormalizedAsset, PricePoint, RawPayload};
use crate::services::metrics::calculate_metrics;
use crate::utils::{date_from_millis, date_from_secs};
use std::path::Path;

/// Normalize a payload, falling back to `fallback_symbol` when the payload declares none
pub fn normalize_asset(payload: RawPayload, fallback_symbol: &str) -> Option<NormalizedAsset> {
    let series = to_series(&payload);
    if series.len() < MIN_SERIES_POINTS {
        return None;
    }

    let meta = payload.meta.unwrap_or_default();
    let symbol = resolve_symbol(&meta, fallback_symbol)?;
    let name = first_present(&[meta.long_name.as_deref(), meta.short_name.as_deref()])
        .unwrap_or_else(|| symbol.clone());
    let exchange = first_present(&[meta.exchange_name.as_deref()])
        .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string());
    let currency = first_present(&[meta.currency.as_deref()])
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let first_trade_date = meta.first_trade_date.and_then(date_from_secs);

    let metrics = calculate_metrics(&series);
    let last_updated = series.last()?.date;

    Some(NormalizedAsset {
        symbol,
        name,
        exchange,
        currency,
        first_trade_date,
        last_updated,
        metrics,
        series,
    })
}

/// Pair valid timestamps with finite closes and sort ascending by time
pub fn to_series(payload: &RawPayload) -> Vec<PricePoint> {
    let mut series: Vec<PricePoint> = payload
        .timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts_secs)| {
            let ts_secs = ts_secs?;
            let close = payload.closes.get(i).copied().flatten().filter(|c| c.is_finite())?;
            let timestamp = ts_secs.checked_mul(1000)?;
            let date = date_from_millis(timestamp)?;
            let adjusted_close = payload
                .adjusted_closes
                .get(i)
                .copied()
                .flatten()
                .filter(|c| c.is_finite())
                .unwrap_or(close);

            Some(PricePoint::new(timestamp, date, close, adjusted_close))
        })
        .collect();

    // stable: equal timestamps keep payload order
    series.sort_by_key(|p| p.timestamp);
    series
}

/// Symbol derived from a file name: the stem without extension
pub fn symbol_from_filename(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn resolve_symbol(meta: &ChartMeta, fallback_symbol: &str) -> Option<String> {
    first_present(&[meta.symbol.as_deref(), Some(fallback_symbol)]).map(|s| s.to_uppercase())
}

/// First value that is non-empty after trimming, trimmed
fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
