use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{NewsDigest, Position};
use crate::services::{keyword_service, news_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/digest", post(post_digest))
}

#[derive(Debug, Deserialize)]
pub struct DigestRequest {
    pub positions: Vec<Position>,

    /// Overall item cap (and the fetch-quota pool split across keywords)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Items scoring below this are dropped
    #[serde(default = "default_min_score")]
    pub min_score: i32,
}

fn default_limit() -> usize {
    news_service::DEFAULT_LIMIT
}

fn default_min_score() -> i32 {
    news_service::DEFAULT_MIN_SCORE
}

/// POST /api/news/digest
///
/// Plan keywords for the portfolio, fetch news per keyword, and return the
/// scored, deduplicated digest. Failed feeds appear as diagnostics.
pub async fn post_digest(
    State(state): State<AppState>,
    Json(request): Json<DigestRequest>,
) -> Result<Json<NewsDigest>, AppError> {
    if request.positions.is_empty() {
        return Err(AppError::Validation("positions must not be empty".into()));
    }

    info!(
        "POST /api/news/digest ({} positions, limit={}, min_score={})",
        request.positions.len(),
        request.limit,
        request.min_score
    );

    let plan = keyword_service::plan_keywords(&state.catalog, &request.positions);
    if plan.keywords.is_empty() {
        return Err(AppError::Validation("no keywords could be planned".into()));
    }

    let digest = news_service::build_digest(
        &state.catalog,
        state.news_provider.clone(),
        &plan,
        request.limit,
        request.min_score,
    )
    .await;

    Ok(Json(digest))
}
