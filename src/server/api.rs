use crate::constants::{DEFAULT_LEADERS_LIMIT, DEFAULT_SERIES_LIMIT, MAX_LEADERS_LIMIT};
use crate::error::{AppError, Result};
use crate::models::{AssetSummary, Insights, LeaderEntry, LeaderboardMetric, PricePoint, SortDirection, SyncSummary};
use crate::server::{AppState, SharedCatalog};
use crate::services::leaderboard::leaders;
use crate::services::AlpacaSync;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

const SYMBOL_NOT_FOUND: &str = "Symbol not found";

/// Response of `/api/health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub datasets: usize,
    pub last_updated: Option<String>,
    pub symbols: Vec<String>,
}

/// Query parameters for the detail and series endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    /// Kept as a string so a malformed value falls back to the default instead of a 400
    pub limit: Option<String>,
}

/// Query parameters for `/api/leaders`
#[derive(Debug, Default, Deserialize)]
pub struct LeadersQuery {
    pub metric: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<String>,
}

/// Trailing point count: integer > 0 keeps that many, <= 0 keeps all,
/// missing/empty/non-numeric gives the default
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(leading_integer).unwrap_or(DEFAULT_SERIES_LIMIT)
}

/// Optionally signed integer prefix, trailing text ignored: `"3.7"` is 3, `"10abc"` is 10
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let end = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign_len);
    s[..end].parse().ok()
}

/// GET /api/health
#[instrument(skip(catalog))]
pub async fn health_handler(State(catalog): State<SharedCatalog>) -> Json<HealthResponse> {
    debug!("Received request for health");

    Json(HealthResponse {
        datasets: catalog.len(),
        last_updated: catalog.last_updated(),
        symbols: catalog.symbols(),
    })
}

/// GET /api/assets - summaries sorted by symbol
#[instrument(skip(catalog))]
pub async fn list_assets_handler(State(catalog): State<SharedCatalog>) -> Json<Vec<AssetSummary>> {
    let summaries = catalog.summaries();
    debug!(count = summaries.len(), "Returning asset summaries");
    Json(summaries)
}

/// GET /api/assets/{symbol}?limit=K
#[instrument(skip(catalog))]
pub async fn get_asset_handler(
    State(catalog): State<SharedCatalog>,
    Path(symbol): Path<String>,
    Query(params): Query<SeriesQuery>,
) -> Result<Response> {
    let asset = catalog
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(SYMBOL_NOT_FOUND.to_string()))?;
    let limit = parse_limit(params.limit.as_deref());

    Ok(Json(asset.detail(limit)).into_response())
}

/// GET /api/assets/{symbol}/series?limit=K
#[instrument(skip(catalog))]
pub async fn get_series_handler(
    State(catalog): State<SharedCatalog>,
    Path(symbol): Path<String>,
    Query(params): Query<SeriesQuery>,
) -> Result<Json<Vec<PricePoint>>> {
    let asset = catalog
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(SYMBOL_NOT_FOUND.to_string()))?;
    let limit = parse_limit(params.limit.as_deref());

    Ok(Json(asset.trailing_series(limit).to_vec()))
}

/// GET /api/insights
#[instrument(skip(catalog))]
pub async fn insights_handler(State(catalog): State<SharedCatalog>) -> Json<Insights> {
    Json(catalog.insights())
}

/// GET /api/leaders?metric=changePct&direction=desc&limit=10
#[instrument(skip(catalog))]
pub async fn leaders_handler(
    State(catalog): State<SharedCatalog>,
    Query(params): Query<LeadersQuery>,
) -> Result<Json<Vec<LeaderEntry>>> {
    let metric = match non_empty(params.metric.as_deref()) {
        Some(raw) => LeaderboardMetric::from_str(raw).map_err(AppError::InvalidInput)?,
        None => LeaderboardMetric::default(),
    };
    let direction = match non_empty(params.direction.as_deref()) {
        Some(raw) => SortDirection::from_str(raw).map_err(AppError::InvalidInput)?,
        None => SortDirection::default(),
    };
    let limit = params
        .limit
        .as_deref()
        .and_then(leading_integer)
        .map(|n| n.clamp(1, MAX_LEADERS_LIMIT as i64) as usize)
        .unwrap_or(DEFAULT_LEADERS_LIMIT);

    let entries = leaders(&catalog.summaries(), metric, limit, direction);
    debug!(metric = metric.as_str(), ?direction, limit, count = entries.len(), "Returning leaders");
    Ok(Json(entries))
}

/// POST /api/alpaca/sync - run a sync to completion and report the summary
#[instrument(skip(app_state))]
pub async fn alpaca_sync_handler(State(app_state): State<AppState>) -> Result<Json<SyncSummary>> {
    let config = app_state
        .sync_config
        .as_ref()
        .ok_or_else(|| AppError::Config("Alpaca credentials are not configured".to_string()))?;

    let _guard = app_state.sync_lock.try_lock().map_err(|_| {
        warn!("Rejected sync request while another sync is running");
        AppError::Conflict("A sync is already running".to_string())
    })?;

    info!("Alpaca sync triggered over HTTP");
    let summary = AlpacaSync::new((**config).clone())?.run().await?;
    Ok(Json(summary))
}

/// Fallback for paths that match neither a route nor a static file
pub async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route not found" })))
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
