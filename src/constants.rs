//! Shared constants
//!
//! Numbers that define the metric formulas and the API defaults live here so the
//! normalizer, the metrics engine and the handlers agree on them.

/// Milliseconds in one calendar day
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Milliseconds in a 365-day year (CAGR span unit)
pub const MS_PER_YEAR: f64 = (MS_PER_DAY * 365) as f64;

/// Trading days per year used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Trailing windows (calendar days) for the momentum metrics
pub const MOMENTUM_SHORT_DAYS: i64 = 90;
pub const MOMENTUM_LONG_DAYS: i64 = 365;

/// Minimum number of usable price points for an asset to enter the catalog
pub const MIN_SERIES_POINTS: usize = 2;

/// Trailing points returned by the detail and series endpoints when no limit is given
pub const DEFAULT_SERIES_LIMIT: i64 = 240;

/// Entries per leaderboard in the insights response
pub const INSIGHT_LEADERS: usize = 3;

/// Default and maximum size of an ad-hoc leaderboard (`/api/leaders`)
pub const DEFAULT_LEADERS_LIMIT: usize = 10;
pub const MAX_LEADERS_LIMIT: usize = 100;

/// Metadata defaults when the provider omits them
pub const DEFAULT_EXCHANGE: &str = "Unknown exchange";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Source files starting with this prefix hold sync metadata, not price series
pub const METADATA_FILE_PREFIX: &str = "symbol";

/// Asset metadata file written by the Alpaca sync
pub const ALPACA_ASSETS_FILE: &str = "symbols_alpaca.json";

/// Suffix of per-symbol files written by the Alpaca sync ({SYMBOL}_alpaca.json)
pub const ALPACA_SERIES_SUFFIX: &str = "_alpaca.json";

/// Alpaca defaults
pub const DEFAULT_ALPACA_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_ALPACA_DATA_URL: &str = "https://data.alpaca.markets";
pub const DEFAULT_ALPACA_FEED: &str = "iex";
pub const DEFAULT_ALPACA_DELAY_MS: u64 = 350;
pub const DEFAULT_ALPACA_LOOKBACK_DAYS: i64 = 1825;

/// Page size requested from the Alpaca bars endpoint (API maximum)
pub const ALPACA_BARS_PAGE_LIMIT: usize = 10_000;
