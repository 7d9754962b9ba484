use crate::models::AlpacaSyncConfig;
use crate::server::{self, AppState};
use crate::services::AssetCatalog;
use crate::utils::{get_data_dir, get_public_dir};
use std::path::PathBuf;
use std::time::Instant;

pub async fn run(port: u16, data_dir: Option<PathBuf>, public_dir: Option<PathBuf>) {
    println!("🚀 Starting stockhawk server on port {}", port);

    let data_dir = data_dir.unwrap_or_else(get_data_dir);
    let public_dir = public_dir.unwrap_or_else(get_public_dir);
    println!("📁 Data directory:   {}", data_dir.display());
    println!("📁 Public directory: {}", public_dir.display());

    let start = Instant::now();
    let catalog = match AssetCatalog::load(&data_dir) {
        Ok(catalog) => {
            println!(
                "✅ Loaded {} datasets in {:.2}ms",
                catalog.len(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            if let Some(last_updated) = catalog.last_updated() {
                println!("   📅 Latest data point: {}", last_updated);
            }
            catalog
        }
        Err(e) => {
            eprintln!("⚠️  Warning: Failed to load data directory: {}", e);
            eprintln!("   Server will start with an empty catalog.");
            AssetCatalog::default()
        }
    };

    let sync_config = match AlpacaSyncConfig::from_env(data_dir.clone()) {
        Ok(Some(config)) => {
            println!("🔑 Alpaca sync enabled (feed: {})", config.feed);
            Some(config)
        }
        Ok(None) => {
            println!("ℹ️  Alpaca sync disabled (ALPACA_API_KEY_ID / ALPACA_API_SECRET_KEY not set)");
            None
        }
        Err(e) => {
            eprintln!("⚠️  Warning: Alpaca sync disabled: {}", e);
            None
        }
    };

    let state = AppState::new(catalog, sync_config);

    if let Err(e) = server::serve(state, &public_dir, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
