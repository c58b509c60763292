use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::external::news_feed::NewsProvider;
use crate::models::{FeedDiagnostic, KeywordPlan, NewsDigest, NewsItem, RawNewsItem, Sentiment};
use crate::services::keyword_service::allocate_quota;
use crate::services::themes::detect_themes;

/// Items scoring below this are dropped unless the caller overrides.
pub const DEFAULT_MIN_SCORE: i32 = 2;
/// Cap on the merged digest.
pub const DEFAULT_LIMIT: usize = 30;

/// Relevance score of one item against the keyword whose fetch produced it:
/// +2 keyword hit, +min(2, distinct themes), +1 finance signal, -1 tabloid.
pub fn score_text(catalog: &Catalog, text: &str, keyword: &str) -> (i32, Vec<String>) {
    let folded = text.to_lowercase();
    let mut score = 0;

    if folded.contains(&keyword.to_lowercase()) {
        score += 2;
    }

    let themes: Vec<String> = detect_themes(catalog, text)
        .into_iter()
        .map(|t| t.to_string())
        .collect();
    score += themes.len().min(2) as i32;

    if catalog.finance_signal.is_match(text) {
        score += 1;
    }
    if catalog.tabloid_signal.is_match(text) {
        score -= 1;
    }

    (score, themes)
}

/// Coarse sentiment from fixed substring word lists. Bullish needs a strict
/// majority of one; ties and silence are neutral.
pub fn classify_sentiment(catalog: &Catalog, text: &str) -> Sentiment {
    let folded = text.to_lowercase();
    let bullish = catalog
        .bullish_words
        .iter()
        .filter(|w| folded.contains(*w))
        .count();
    let bearish = catalog
        .bearish_words
        .iter()
        .filter(|w| folded.contains(*w))
        .count();

    if bullish >= bearish + 1 {
        Sentiment::Bullish
    } else if bearish >= bullish + 1 {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Score raw items against their fetch keyword, drop low scorers, and rank
/// descending (stable on ties, so upstream order survives).
pub fn score_and_filter(
    catalog: &Catalog,
    items: Vec<RawNewsItem>,
    keyword: &str,
    min_score: i32,
) -> Vec<NewsItem> {
    let mut scored: Vec<NewsItem> = items
        .into_iter()
        .filter_map(|raw| {
            let text = format!("{} {}", raw.title, raw.description);
            let (score, themes) = score_text(catalog, &text, keyword);
            if score < min_score {
                return None;
            }
            let sentiment = classify_sentiment(catalog, &text);
            Some(NewsItem {
                title: raw.title,
                link: raw.link,
                pub_date: raw.pub_date,
                description: raw.description,
                keyword: keyword.to_string(),
                score,
                themes,
                sentiment,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Merge per-keyword result lists into one ranked digest: sort by score
/// descending, keep the first occurrence of each link, cap at `limit`.
pub fn merge_ranked(mut all: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    all.sort_by(|a, b| b.score.cmp(&a.score));

    let mut seen: HashSet<String> = HashSet::with_capacity(all.len());
    let mut merged: Vec<NewsItem> = Vec::new();
    for item in all {
        if merged.len() >= limit {
            break;
        }
        if seen.insert(item.link.clone()) {
            merged.push(item);
        }
    }
    merged
}

/// Fetch and score news for every planned keyword.
///
/// Each keyword's fetch runs as its own task; a failed feed contributes zero
/// items and a diagnostic entry, never aborting the batch. Quotas come from
/// the plan's keyword weights.
pub async fn build_digest(
    catalog: &Catalog,
    provider: Arc<dyn NewsProvider>,
    plan: &KeywordPlan,
    limit: usize,
    min_score: i32,
) -> NewsDigest {
    let quotas = allocate_quota(&plan.keywords, Some(&plan.weights), limit);

    let fetches = plan.keywords.iter().zip(&quotas).map(|(keyword, &quota)| {
        let provider = Arc::clone(&provider);
        async move {
            if quota == 0 {
                return (keyword.clone(), quota, Ok(Vec::new()));
            }
            let result = provider.fetch_items(keyword).await;
            (keyword.clone(), quota, result)
        }
    });

    let mut items: Vec<NewsItem> = Vec::new();
    let mut diagnostics: Vec<FeedDiagnostic> = Vec::new();

    for (keyword, quota, result) in join_all(fetches).await {
        match result {
            Ok(raw) => {
                let mut kept = score_and_filter(catalog, raw, &keyword, min_score);
                kept.truncate(quota);
                items.extend(kept);
            }
            Err(e) => {
                warn!("news feed for '{}' failed: {}", keyword, e);
                diagnostics.push(FeedDiagnostic {
                    keyword,
                    error: e.to_string(),
                });
            }
        }
    }

    let merged = merge_ranked(items, limit);
    info!(
        "news digest: {} items kept, {} feeds failed",
        merged.len(),
        diagnostics.len()
    );

    NewsDigest {
        items: merged,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, link: &str, description: &str) -> RawNewsItem {
        RawNewsItem {
            title: title.into(),
            link: link.into(),
            pub_date: "2026-08-25".into(),
            description: description.into(),
        }
    }

    #[test]
    fn test_score_keyword_and_theme_hits() {
        let catalog = Catalog::builtin();
        let (score, themes) = score_text(
            &catalog,
            "半导体行业景气度回升，芯片厂商业绩超预期",
            "半导体 行业",
        );
        // keyword "半导体 行业" is not a literal substring (space), so no +2;
        // theme hit +1, finance signal (业绩) +1
        assert_eq!(themes, vec!["半导体".to_string()]);
        assert_eq!(score, 2);
    }

    #[test]
    fn test_score_literal_keyword_hit() {
        let catalog = Catalog::builtin();
        let (score, _) = score_text(&catalog, "纳斯达克科技股大涨", "纳斯达克");
        // +2 keyword, +1 theme (美股核心), no finance pattern
        assert_eq!(score, 3);
    }

    #[test]
    fn test_tabloid_penalty() {
        let catalog = Catalog::builtin();
        let (score, _) = score_text(&catalog, "明星绯闻登上热搜", "半导体");
        assert_eq!(score, -1);
    }

    #[test]
    fn test_theme_bonus_capped_at_two() {
        let catalog = Catalog::builtin();
        let (score, themes) = score_text(
            &catalog,
            "半导体新能源医药军工多主题轮动",
            "zzz",
        );
        assert!(themes.len() > 2);
        assert_eq!(score, 2);
    }

    #[test]
    fn test_sentiment_majority_rules() {
        let catalog = Catalog::builtin();
        assert_eq!(classify_sentiment(&catalog, "芯片股大涨"), Sentiment::Bullish);
        assert_eq!(classify_sentiment(&catalog, "地产板块暴跌"), Sentiment::Bearish);
        // one bullish + one bearish word tie out to neutral
        assert_eq!(
            classify_sentiment(&catalog, "早盘大涨午后暴跌"),
            Sentiment::Neutral
        );
        assert_eq!(classify_sentiment(&catalog, "市场平开"), Sentiment::Neutral);
    }

    #[test]
    fn test_filter_drops_low_scores() {
        let catalog = Catalog::builtin();
        let items = vec![
            raw("毫无关联的内容", "l1", ""),
            raw("半导体芯片业绩增长", "l2", ""),
        ];
        let kept = score_and_filter(&catalog, items, "半导体", DEFAULT_MIN_SCORE);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].link, "l2");
        assert!(kept[0].score >= DEFAULT_MIN_SCORE);
    }

    #[test]
    fn test_merge_dedups_links_first_kept() {
        let catalog = Catalog::builtin();
        let a = score_and_filter(
            &catalog,
            vec![raw("半导体芯片业绩超预期大涨", "same-link", "")],
            "半导体",
            1,
        );
        let b = score_and_filter(
            &catalog,
            vec![raw("芯片业绩", "same-link", "")],
            "芯片",
            1,
        );
        let mut all = a;
        let lower_score = b[0].score;
        all.extend(b);
        let merged = merge_ranked(all, 10);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].score >= lower_score);
        assert_eq!(merged[0].keyword, "半导体");
    }

    #[test]
    fn test_merge_caps_at_limit() {
        let catalog = Catalog::builtin();
        let items: Vec<RawNewsItem> = (0..10)
            .map(|i| raw("半导体芯片业绩增长", &format!("link-{i}"), ""))
            .collect();
        let scored = score_and_filter(&catalog, items, "半导体", 1);
        let merged = merge_ranked(scored, 4);
        assert_eq!(merged.len(), 4);
    }
}
