mod asset;
mod leaderboard;
mod metrics;
mod price_point;
pub mod chart;
pub mod sync_config;

pub use asset::{AssetDetail, AssetSummary, NormalizedAsset};
pub use chart::{ChartDocument, ChartMeta, RawPayload};
pub use leaderboard::{Insights, LeaderEntry, LeaderboardMetric, Leaders, SortDirection};
pub use metrics::Metrics;
pub use price_point::PricePoint;
pub use sync_config::{AlpacaSyncConfig, SyncSummary};
