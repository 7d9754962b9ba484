use serde::{Deserialize, Serialize};

/// Summary statistics derived from a normalized series
///
/// All percentages are expressed in percent (e.g. `12.5` means 12.5%).
/// Computed once when an asset is loaded; never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Last close in the series
    pub latest_close: f64,

    /// Second-to-last close in the series
    pub previous_close: f64,

    /// Last-day change: ((latest - previous) / previous) * 100, 0 when previous is 0
    pub change_pct: f64,

    /// Highest close over the whole supplied series (not a rolling 52-week window)
    pub year_high: f64,

    /// Lowest close over the whole supplied series (not a rolling 52-week window)
    pub year_low: f64,

    /// Deepest decline from a running peak, always <= 0
    pub max_drawdown: f64,

    /// Annualized standard deviation of daily log returns
    pub volatility: f64,

    /// Compound annual growth rate between the first and last close
    pub cagr: f64,

    /// Change over the trailing 90 calendar days, None with fewer than 2 points in range
    pub momentum_90d: Option<f64>,

    /// Change over the trailing 365 calendar days, None with fewer than 2 points in range
    pub momentum_365d: Option<f64>,

    /// Number of price points in the series
    pub sample_count: usize,
}
