use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation of a normalized series
///
/// # Invariants
/// - `close` is always finite (non-finite closes never become points)
/// - `adjusted_close` equals `close` when the provider has no adjusted value
///
/// Serialized with the compact wire names the dashboard reads: `ts`, `date`,
/// `close`, `adjClose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: i64,

    /// UTC calendar date of `timestamp`
    pub date: NaiveDate,

    /// Closing price
    pub close: f64,

    /// Split/dividend adjusted closing price
    #[serde(rename = "adjClose")]
    pub adjusted_close: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, date: NaiveDate, close: f64, adjusted_close: f64) -> Self {
        Self {
            timestamp,
            date,
            close,
            adjusted_close,
        }
    }
}
