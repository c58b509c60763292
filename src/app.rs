use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, keywords, market, news, risk};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/market", market::router())
        .nest("/api/keywords", keywords::router())
        .nest("/api/news", news::router())
        .nest("/api/risk", risk::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
