use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use fundlens_backend::app;
use fundlens_backend::catalog::Catalog;
use fundlens_backend::external::daily_bar::DailyBarProvider;
use fundlens_backend::external::fund_nav::FundNavProvider;
use fundlens_backend::external::market_data::MarketDataProvider;
use fundlens_backend::external::news_feed::{NewsConfig, NewsProvider, SerperNewsProvider};
use fundlens_backend::logging;
use fundlens_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let series_provider = Arc::new(MarketDataProvider::new(
        Box::new(FundNavProvider::new()),
        Box::new(DailyBarProvider::new()),
    ));

    let news_config = NewsConfig::from_env();
    let news_provider: Arc<dyn NewsProvider> = match news_config.api_key.clone() {
        Some(api_key) => {
            tracing::info!("news provider: Serper");
            Arc::new(SerperNewsProvider::new(api_key, news_config.page_size))
        }
        None => {
            tracing::warn!("NEWS_API_KEY not set; news digests will report feed failures");
            Arc::new(SerperNewsProvider::new(String::new(), news_config.page_size))
        }
    };

    let state = AppState {
        series_provider,
        news_provider,
        catalog: Arc::new(Catalog::builtin()),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("fundlens backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
