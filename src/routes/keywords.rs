use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{KeywordPlan, Position};
use crate::services::keyword_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/plan", post(post_plan))
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub positions: Vec<Position>,
}

/// POST /api/keywords/plan
///
/// Turn a portfolio into a prioritized, weighted search keyword list.
pub async fn post_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<KeywordPlan>, AppError> {
    if request.positions.is_empty() {
        return Err(AppError::Validation("positions must not be empty".into()));
    }

    info!("POST /api/keywords/plan ({} positions)", request.positions.len());

    let plan = keyword_service::plan_keywords(&state.catalog, &request.positions);
    Ok(Json(plan))
}
