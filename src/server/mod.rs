pub mod api;

use crate::error::Result;
use crate::models::AlpacaSyncConfig;
use crate::services::AssetCatalog;
use axum::{
    extract::FromRef,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub type SharedCatalog = Arc<AssetCatalog>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    /// None when Alpaca credentials are not configured
    pub sync_config: Option<Arc<AlpacaSyncConfig>>,
    /// Held for the duration of a sync run
    pub sync_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(catalog: AssetCatalog, sync_config: Option<AlpacaSyncConfig>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sync_config: sync_config.map(Arc::new),
            sync_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl FromRef<AppState> for SharedCatalog {
    fn from_ref(app_state: &AppState) -> SharedCatalog {
        app_state.catalog.clone()
    }
}

/// API routes plus the static dashboard; anything else, including a known path
/// with the wrong method, is a JSON 404
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    let static_files = ServeDir::new(public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(api::route_not_found.into_service());

    Router::new()
        .route("/api/health", get(api::health_handler))
        .route("/api/assets", get(api::list_assets_handler))
        .route("/api/assets/{symbol}", get(api::get_asset_handler))
        .route("/api/assets/{symbol}/series", get(api::get_series_handler))
        .route("/api/insights", get(api::insights_handler))
        .route("/api/leaders", get(api::leaders_handler))
        .route("/api/alpaca/sync", post(api::alpaca_sync_handler))
        .method_not_allowed_fallback(api::route_not_found)
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the axum server
pub async fn serve(state: AppState, public_dir: &Path, port: u16) -> Result<()> {
    tracing::info!(
        datasets = state.catalog.len(),
        sync_enabled = state.sync_config.is_some(),
        "Starting stockhawk server"
    );
    tracing::info!("Using public directory: {}", public_dir.display());

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /api/health");
    tracing::info!("  GET  /api/assets");
    tracing::info!("  GET  /api/assets/{{symbol}}?limit=240");
    tracing::info!("  GET  /api/assets/{{symbol}}/series?limit=240");
    tracing::info!("  GET  /api/insights");
    tracing::info!("  GET  /api/leaders?metric=changePct&direction=desc&limit=10");
    tracing::info!("  POST /api/alpaca/sync");
    tracing::info!("  GET  /* (static files from {})", public_dir.display());

    let app = build_router(state, public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
