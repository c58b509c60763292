use std::sync::Arc;

use crate::catalog::Catalog;
use crate::external::news_feed::NewsProvider;
use crate::external::series_provider::SeriesProvider;

#[derive(Clone)]
pub struct AppState {
    pub series_provider: Arc<dyn SeriesProvider>,
    pub news_provider: Arc<dyn NewsProvider>,
    pub catalog: Arc<Catalog>,
}
