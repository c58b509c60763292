use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{IndicatorsOutcome, InstrumentKind, ProxyRating};
use crate::services::{indicators, radar_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/indicators/:symbol", get(get_indicators))
        .route("/radar", get(get_radar))
}

#[derive(Debug, Deserialize)]
pub struct IndicatorParams {
    /// Instrument class; funds and tickers come from different feeds
    #[serde(default = "default_kind")]
    pub kind: InstrumentKind,

    /// Minimum series length before indicators are attempted (default: 30)
    #[serde(default = "default_min_points")]
    pub min_points: usize,
}

fn default_kind() -> InstrumentKind {
    InstrumentKind::CnFund
}

fn default_min_points() -> usize {
    30
}

/// GET /api/market/indicators/:symbol?kind=cn_fund&min_points=30
///
/// Fetch the instrument's series and return the indicator snapshot at its
/// latest point. A series shorter than `min_points` returns a typed
/// insufficient-data payload, not an error.
pub async fn get_indicators(
    Path(symbol): Path<String>,
    Query(params): Query<IndicatorParams>,
    State(state): State<AppState>,
) -> Result<Json<IndicatorsOutcome>, AppError> {
    info!(
        "GET /api/market/indicators/{} (kind={:?}, min_points={})",
        symbol, params.kind, params.min_points
    );

    let history = params.min_points.max(radar_service::RADAR_MIN_POINTS);
    let series = state
        .series_provider
        .fetch_series(params.kind, &symbol, history)
        .await
        .map_err(|e| {
            warn!("series fetch failed for {}: {}", symbol, e);
            e
        })?;

    Ok(Json(indicators::compute_snapshot(&series, params.min_points)))
}

#[derive(Debug, Deserialize)]
pub struct RadarParams {
    /// How many proxies to return (default 3, capped at 8)
    pub top: Option<usize>,
}

/// GET /api/market/radar?top=3
///
/// Scan the proxy universe and return the strongest instruments by
/// composite momentum score.
pub async fn get_radar(
    Query(params): Query<RadarParams>,
    State(state): State<AppState>,
) -> Json<Vec<ProxyRating>> {
    info!("GET /api/market/radar (top={:?})", params.top);

    let ratings = radar_service::rank_proxies(
        &state.catalog,
        state.series_provider.clone(),
        params.top,
    )
    .await;

    Json(ratings)
}
