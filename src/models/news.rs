use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Raw text item as returned by the news collaborator before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub description: String,
}

/// A scored, tagged news item. `link` is the dedup key across keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    /// The keyword whose fetch produced this item
    pub keyword: String,
    pub score: i32,
    pub themes: Vec<String>,
    pub sentiment: Sentiment,
}

/// Aggregated digest: ranked items plus per-keyword diagnostics for feeds
/// that failed upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDigest {
    pub items: Vec<NewsItem>,
    pub diagnostics: Vec<FeedDiagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDiagnostic {
    pub keyword: String,
    pub error: String,
}
