use crate::models::NormalizedAsset;
use crate::services::AssetCatalog;
use crate::utils::get_data_dir;
use std::path::PathBuf;

pub fn run(data_dir: Option<PathBuf>) {
    println!("📊 Dataset Status\n");

    let data_dir = data_dir.unwrap_or_else(get_data_dir);
    let catalog = match AssetCatalog::load(&data_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if catalog.is_empty() {
        println!("⚠️  No datasets found in {}. Run 'sync' or add chart JSON files.", data_dir.display());
        return;
    }

    println!("📈 Datasets: {}", catalog.len());
    if let Some(last_updated) = catalog.last_updated() {
        println!("📅 Latest data point: {}", last_updated);
    }
    println!("\n═══════════════════════════════════════════════════════════\n");

    println!(
        "{:<10} {:>12} {:>9} {:>10} {:>10} {:>8}  {}",
        "Symbol", "Close", "Change", "Mom 90d", "Drawdown", "Points", "Last"
    );
    for asset in catalog.assets() {
        println!("{}", format_row(asset));
    }
}

fn format_row(asset: &NormalizedAsset) -> String {
    let m = &asset.metrics;
    format!(
        "{:<10} {:>12} {:>9} {:>10} {:>10} {:>8}  {}",
        asset.symbol,
        format_price(m.latest_close, &asset.currency),
        format_percent(Some(m.change_pct)),
        format_percent(m.momentum_90d),
        format_percent(Some(m.max_drawdown)),
        m.sample_count,
        asset.last_updated
    )
}

fn format_price(price: f64, currency: &str) -> String {
    if currency == "USD" {
        format!("${:.2}", price)
    } else {
        format!("{:.2} {}", price, currency)
    }
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "-".to_string(),
    }
}
