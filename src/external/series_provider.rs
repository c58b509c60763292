use async_trait::async_trait;
use thiserror::Error;

use crate::models::{InstrumentKind, PricePoint};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of canonical price/NAV series.
///
/// Implementations are responsible for upstream plumbing (timeouts included)
/// and for running raw records through the normalizer, so consumers always
/// see ascending-date, finite-close series. `points` is how much history the
/// caller wants; providers may return fewer.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn fetch_series(
        &self,
        kind: InstrumentKind,
        symbol: &str,
        points: usize,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}
