pub mod alpaca;
pub mod alpaca_sync;
pub mod catalog;
pub mod leaderboard;
pub mod metrics;
pub mod normalizer;

pub use alpaca::{AlpacaAsset, AlpacaBar, AlpacaClient};
pub use alpaca_sync::AlpacaSync;
pub use catalog::AssetCatalog;
pub use metrics::calculate_metrics;
pub use normalizer::normalize_asset;
