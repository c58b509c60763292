use async_trait::async_trait;

use crate::external::series_provider::{ProviderError, SeriesProvider};
use crate::models::{InstrumentKind, PricePoint};

/// Routes series requests by instrument class: CN funds go to the NAV
/// history feed, US tickers to the daily-bar feed.
pub struct MarketDataProvider {
    fund_nav: Box<dyn SeriesProvider>,
    daily_bar: Box<dyn SeriesProvider>,
}

impl MarketDataProvider {
    pub fn new(fund_nav: Box<dyn SeriesProvider>, daily_bar: Box<dyn SeriesProvider>) -> Self {
        Self { fund_nav, daily_bar }
    }
}

#[async_trait]
impl SeriesProvider for MarketDataProvider {
    async fn fetch_series(
        &self,
        kind: InstrumentKind,
        symbol: &str,
        points: usize,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        match kind {
            InstrumentKind::CnFund => self.fund_nav.fetch_series(kind, symbol, points).await,
            InstrumentKind::UsTicker => self.daily_bar.fetch_series(kind, symbol, points).await,
        }
    }
}
