use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::path::PathBuf;

/// Get source data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Get static dashboard directory from environment variable or use default
pub fn get_public_dir() -> PathBuf {
    std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"))
}

/// Initialize the global tracing subscriber (RUST_LOG overrides the `info` default)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// UTC calendar date of a millisecond epoch timestamp
pub fn date_from_millis(ts_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).map(|dt| dt.date_naive())
}

/// UTC calendar date of a second epoch timestamp
pub fn date_from_secs(ts_secs: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts_secs, 0).map(|dt| dt.date_naive())
}

/// ISO-8601 timestamp with millisecond precision (e.g. 2024-03-01T00:00:00.000Z)
pub fn format_iso_millis(ts_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Split a comma-separated list into trimmed, uppercased, non-empty symbols
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
