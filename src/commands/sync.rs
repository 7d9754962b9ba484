use crate::models::AlpacaSyncConfig;
use crate::services::AlpacaSync;
use crate::utils::{get_data_dir, parse_symbol_list};
use std::path::PathBuf;
use std::time::Instant;

/// Command line values that take precedence over the `ALPACA_*` environment
#[derive(Debug, Default)]
pub struct SyncOverrides {
    pub symbols: Option<String>,
    pub max_symbols: Option<usize>,
    pub delay_ms: Option<u64>,
    pub lookback_days: Option<i64>,
    pub data_dir: Option<PathBuf>,
}

pub async fn run(overrides: SyncOverrides) {
    let data_dir = overrides.data_dir.clone().unwrap_or_else(get_data_dir);

    let config = match AlpacaSyncConfig::from_env(data_dir) {
        Ok(Some(config)) => apply_overrides(config, overrides),
        Ok(None) => {
            eprintln!("❌ Alpaca credentials missing");
            eprintln!("   Set ALPACA_API_KEY_ID and ALPACA_API_SECRET_KEY (or add them to .env)");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Invalid Alpaca configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("🔄 Syncing from Alpaca");
    println!("   📁 Data directory: {}", config.data_dir.display());
    println!("   📡 Feed: {}", config.feed);
    println!("   📅 Since: {}", config.start_date());
    if !config.symbols.is_empty() {
        println!("   🎯 Symbols: {}", config.symbols.join(", "));
    }
    if let Some(max) = config.max_symbols {
        println!("   🔢 Max symbols: {}", max);
    }
    println!("   ⏱️  Delay: {}ms between symbols", config.delay_ms);

    let start = Instant::now();
    let sync = match AlpacaSync::new(config) {
        Ok(sync) => sync,
        Err(e) => {
            eprintln!("❌ Failed to create Alpaca client: {}", e);
            std::process::exit(1);
        }
    };

    match sync.run().await {
        Ok(summary) => {
            println!("\n✅ Sync finished in {:.1}s", start.elapsed().as_secs_f64());
            println!("   Total:   {}", summary.total);
            println!("   Fetched: {}", summary.fetched);
            println!("   Failed:  {}", summary.failed);
            println!("\n💡 Restart the server to pick up the new files");
        }
        Err(e) => {
            eprintln!("❌ Sync failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn apply_overrides(mut config: AlpacaSyncConfig, overrides: SyncOverrides) -> AlpacaSyncConfig {
    if let Some(symbols) = overrides.symbols {
        config.symbols = parse_symbol_list(&symbols);
    }
    if let Some(max) = overrides.max_symbols {
        config.max_symbols = Some(max);
    }
    if let Some(delay_ms) = overrides.delay_ms {
        config.delay_ms = delay_ms;
    }
    if let Some(days) = overrides.lookback_days {
        config.lookback_days = days;
    }
    config
}
