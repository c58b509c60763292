use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::external::series_provider::ProviderError;
use crate::models::RawNewsItem;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Configuration for the news feed collaborator.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub page_size: usize,
}

impl NewsConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("NEWS_API_KEY").ok(),
            page_size: std::env::var("NEWS_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
        }
    }
}

/// Per-keyword text item source. One fetch per keyword; failures are
/// isolated by the caller and never abort a batch.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_items(&self, keyword: &str) -> Result<Vec<RawNewsItem>, ProviderError>;
}

/// Serper news search (Google news results as JSON).
pub struct SerperNewsProvider {
    api_key: String,
    page_size: usize,
    client: reqwest::Client,
}

impl SerperNewsProvider {
    pub fn new(api_key: String, page_size: usize) -> Self {
        Self {
            api_key,
            page_size,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    news: Option<Vec<SerperNewsItem>>,
}

#[derive(Debug, Deserialize)]
struct SerperNewsItem {
    title: String,
    link: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl NewsProvider for SerperNewsProvider {
    async fn fetch_items(&self, keyword: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
        info!("fetching news for keyword: {}", keyword);

        let request_body = serde_json::json!({
            "q": keyword,
            "type": "news",
            "num": self.page_size.min(100),
        });

        let response = self
            .client
            .post("https://google.serper.dev/news")
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("news API request failed: {}", e);
                ProviderError::Network(e.to_string())
            })?;

        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::BadResponse(format!("{status}: {body}")));
        }

        let parsed: SerperResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let items = parsed
            .news
            .unwrap_or_default()
            .into_iter()
            .map(|item| RawNewsItem {
                title: item.title,
                link: item.link,
                pub_date: item.date,
                description: item.snippet,
            })
            .collect();

        Ok(items)
    }
}
