use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::models::{Position, RiskReport};
use crate::services::risk_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/grade", post(post_grade))
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// POST /api/risk/grade
///
/// Grade concentration/drawdown risk for a portfolio. An empty portfolio is
/// valid input and grades low.
pub async fn post_grade(
    State(state): State<AppState>,
    Json(request): Json<GradeRequest>,
) -> Json<RiskReport> {
    info!("POST /api/risk/grade ({} positions)", request.positions.len());

    Json(risk_service::grade_risk(&state.catalog, &request.positions))
}
