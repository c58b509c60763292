use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::models::{KeywordBuckets, KeywordPlan, Position};
use crate::services::themes::detect_themes;

/// Cap on distinct keywords kept after deduplication.
pub const MAX_KEYWORDS: usize = 28;
/// Keywords longer than this are truncated (in chars, the text is CJK-heavy).
pub const MAX_KEYWORD_CHARS: usize = 20;

const MACRO_WEIGHT: f64 = 0.35;
const INSTRUMENT_WEIGHT: f64 = 0.75;
const BROAD_DISCOUNT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Macro,
    Theme,
    Instrument,
}

/// Accumulates weighted keyword contributions, deduplicating
/// case-insensitively while preserving first-seen spelling and order.
struct KeywordAccumulator<'a> {
    catalog: &'a Catalog,
    entries: Vec<(String, f64, Bucket)>,
    index: HashMap<String, usize>,
}

impl<'a> KeywordAccumulator<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, keyword: &str, weight: f64, bucket: Bucket) {
        let display: String = keyword.chars().take(MAX_KEYWORD_CHARS).collect();
        let folded = display.to_lowercase();

        // Broad terms carry little signal; discount at the point of
        // contribution so every source pays the same penalty.
        let contribution = if self.catalog.is_broad_term(&display) {
            weight * BROAD_DISCOUNT
        } else {
            weight
        };

        match self.index.get(&folded) {
            Some(&i) => self.entries[i].1 += contribution,
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push((display, contribution, bucket));
            }
        }
    }
}

/// Derive normalized position weights. Prefers market value over invested
/// amount; a portfolio with no usable weights degrades to an even split.
pub fn position_weights(positions: &[Position]) -> Vec<f64> {
    let raw: Vec<f64> = positions.iter().map(|p| p.raw_weight()).collect();
    let total: f64 = raw.iter().sum();

    if total > 0.0 {
        raw.into_iter().map(|w| w / total).collect()
    } else if positions.is_empty() {
        Vec::new()
    } else {
        vec![1.0 / positions.len() as f64; positions.len()]
    }
}

/// Aggregate per-theme weight across the portfolio. A position contributes
/// its full weight to every theme it matches. Returns `(ranked, weights)`
/// where ranked is descending by weight (dictionary order on ties) and
/// weights are normalized to sum to 1. No theme anywhere → `fallback`
/// alone at weight 1.
pub fn portfolio_themes(
    catalog: &Catalog,
    positions: &[Position],
    weights: &[f64],
    fallback: &str,
) -> (Vec<String>, HashMap<String, f64>) {
    let mut aggregate: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, &weight) in positions.iter().zip(weights) {
        for theme in detect_themes(catalog, &position.theme_text()) {
            match index.get(theme) {
                Some(&i) => aggregate[i].1 += weight,
                None => {
                    index.insert(theme.to_string(), aggregate.len());
                    aggregate.push((theme.to_string(), weight));
                }
            }
        }
    }

    let total: f64 = aggregate.iter().map(|(_, w)| w).sum();
    if aggregate.is_empty() || total <= 0.0 {
        let fallback = fallback.to_string();
        let mut weights = HashMap::new();
        weights.insert(fallback.clone(), 1.0);
        return (vec![fallback], weights);
    }

    for entry in &mut aggregate {
        entry.1 /= total;
    }
    // Stable sort keeps detection (dictionary-ish) order on equal weights
    aggregate.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let ranked: Vec<String> = aggregate.iter().map(|(name, _)| name.clone()).collect();
    let weight_map: HashMap<String, f64> = aggregate.into_iter().collect();
    (ranked, weight_map)
}

/// Build the prioritized, deduplicated keyword list for a portfolio.
///
/// Contribution model:
/// - macro terms: constant 0.35 each
/// - theme terms: `0.6 * theme_weight + 0.15` each
/// - instrument terms (regex hits on position names): 0.75 each
/// Contributions accumulate additively; the kept set is capped at 28 by
/// descending weight and renormalized. Weight mass of trimmed keywords is
/// discarded, not redistributed.
pub fn plan_keywords(catalog: &Catalog, positions: &[Position]) -> KeywordPlan {
    let weights = position_weights(positions);
    let (themes, theme_weights) =
        portfolio_themes(catalog, positions, &weights, catalog.fallback_theme);

    let mut acc = KeywordAccumulator::new(catalog);

    for keyword in catalog.macro_keywords {
        acc.add(keyword, MACRO_WEIGHT, Bucket::Macro);
    }

    for theme in &themes {
        let theme_weight = theme_weights.get(theme).copied().unwrap_or(0.0);
        let contribution = 0.6 * theme_weight + 0.15;
        for keyword in catalog.theme_keywords(theme) {
            acc.add(keyword, contribution, Bucket::Theme);
        }
    }

    for position in positions {
        for matcher in &catalog.instrument_matchers {
            if matcher.pattern.is_match(&position.name) {
                acc.add(matcher.keyword, INSTRUMENT_WEIGHT, Bucket::Instrument);
            }
        }
    }

    let mut entries = acc.entries;
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(MAX_KEYWORDS);

    let kept_total: f64 = entries.iter().map(|(_, w, _)| w).sum();
    let mut keywords = Vec::with_capacity(entries.len());
    let mut weight_map = HashMap::with_capacity(entries.len());
    let mut buckets = KeywordBuckets {
        r#macro: Vec::new(),
        theme: Vec::new(),
        instrument: Vec::new(),
    };

    for (keyword, weight, bucket) in entries {
        let normalized = if kept_total > 0.0 { weight / kept_total } else { 0.0 };
        match bucket {
            Bucket::Macro => buckets.r#macro.push(keyword.clone()),
            Bucket::Theme => buckets.theme.push(keyword.clone()),
            Bucket::Instrument => buckets.instrument.push(keyword.clone()),
        }
        weight_map.insert(keyword.clone(), normalized);
        keywords.push(keyword);
    }

    KeywordPlan {
        themes,
        theme_weights,
        keywords,
        weights: weight_map,
        buckets,
    }
}

/// Split `limit` fetch slots across keywords proportionally to weight.
///
/// Floors first, then the remainder one slot at a time in descending-weight
/// order, wrapping past the end if needed. The top three weighted keywords
/// are guaranteed at least one slot; the excess that guarantee creates is
/// taken back from the lowest-weighted keywords so the total stays `limit`.
/// Without weights the split is even, remainder to the first keywords in
/// input order.
pub fn allocate_quota(
    keywords: &[String],
    weights: Option<&HashMap<String, f64>>,
    limit: usize,
) -> Vec<usize> {
    let n = keywords.len();
    if n == 0 || limit == 0 {
        return vec![0; n];
    }

    let weight_of = |k: &str| -> f64 {
        weights
            .and_then(|map| map.get(k).copied())
            .unwrap_or(0.0)
    };
    let sum_w: f64 = keywords.iter().map(|k| weight_of(k)).sum();

    if weights.is_none() || sum_w <= 0.0 {
        let base = limit / n;
        let remainder = limit % n;
        return (0..n).map(|i| base + usize::from(i < remainder)).collect();
    }

    // Indices in descending-weight order; stable, so input order breaks ties
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        weight_of(&keywords[b])
            .partial_cmp(&weight_of(&keywords[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut quotas = vec![0usize; n];
    for (i, keyword) in keywords.iter().enumerate() {
        quotas[i] = ((limit as f64) * weight_of(keyword) / sum_w).floor() as usize;
    }

    let mut remainder = limit.saturating_sub(quotas.iter().sum());
    let mut cursor = 0;
    while remainder > 0 {
        quotas[order[cursor % n]] += 1;
        remainder -= 1;
        cursor += 1;
    }

    // Guarantee the head of the ranking is represented at all. Each forced
    // slot is funded by the lowest-weighted keyword that can spare one, so
    // the total never drifts from `limit`; with a tiny limit there may be no
    // donor and the guarantee is skipped.
    let in_top3 = |idx: usize| order.iter().take(3).any(|&top| top == idx);
    for slot in 0..order.len().min(3) {
        let idx = order[slot];
        if quotas[idx] > 0 {
            continue;
        }
        let donor = order
            .iter()
            .rev()
            .copied()
            .find(|&d| d != idx && quotas[d] > usize::from(in_top3(d)));
        if let Some(d) = donor {
            quotas[d] -= 1;
            quotas[idx] = 1;
        }
    }

    quotas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstrumentKind;

    fn fund(name: &str, mv: f64) -> Position {
        Position {
            kind: InstrumentKind::CnFund,
            code: "000001".into(),
            name: name.into(),
            amount: None,
            mv: Some(mv),
            pnl_pct: None,
            theme: None,
        }
    }

    #[test]
    fn test_position_weights_prefers_mv() {
        let mut p = fund("x", 900.0);
        p.amount = Some(1.0);
        let q = fund("y", 100.0);
        let weights = position_weights(&[p, q]);
        assert!((weights[0] - 0.9).abs() < 1e-12);
        assert!((weights[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_position_weights_even_split_without_values() {
        let mut p = fund("x", 0.0);
        p.mv = None;
        let mut q = fund("y", 0.0);
        q.mv = None;
        let weights = position_weights(&[p, q]);
        assert_eq!(weights, vec![0.5, 0.5]);
    }

    #[test]
    fn test_fallback_theme_when_nothing_matches() {
        let catalog = Catalog::builtin();
        let positions = vec![fund("货币基金B", 1000.0)];
        let weights = position_weights(&positions);
        let (themes, theme_weights) =
            portfolio_themes(&catalog, &positions, &weights, catalog.fallback_theme);
        assert_eq!(themes, vec!["大盘综合"]);
        assert_eq!(theme_weights["大盘综合"], 1.0);
    }

    #[test]
    fn test_spy_position_detects_us_theme() {
        let catalog = Catalog::builtin();
        let positions = vec![Position {
            kind: InstrumentKind::UsTicker,
            code: "SPY".into(),
            name: "S&P 500".into(),
            amount: None,
            mv: Some(1000.0),
            pnl_pct: None,
            theme: None,
        }];
        let plan = plan_keywords(&catalog, &positions);

        assert_eq!(plan.themes, vec!["美股核心"]);
        assert_eq!(plan.theme_weights["美股核心"], 1.0);
        assert!(plan.keywords.iter().any(|k| k == "标普500"));
        assert!(plan.keywords.iter().any(|k| k == "CPI 通胀"));
        let total: f64 = plan.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_weights_normalized_and_capped() {
        let catalog = Catalog::builtin();
        let positions = vec![
            fund("易方达半导体产业", 500.0),
            fund("汇添富新能源光伏", 300.0),
            fund("招商白酒消费", 200.0),
            fund("华夏医药创新药", 100.0),
            fund("易方达恒生科技互联网", 50.0),
            fund("博时黄金资源", 50.0),
        ];
        let plan = plan_keywords(&catalog, &positions);

        assert!(plan.keywords.len() <= MAX_KEYWORDS);
        let total: f64 = plan.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);

        // No case-insensitive duplicates
        let mut folded: Vec<String> = plan.keywords.iter().map(|k| k.to_lowercase()).collect();
        folded.sort();
        folded.dedup();
        assert_eq!(folded.len(), plan.keywords.len());

        // Every keyword fits the length cap
        assert!(plan.keywords.iter().all(|k| k.chars().count() <= MAX_KEYWORD_CHARS));
    }

    #[test]
    fn test_instrument_matcher_injects_keyword() {
        let catalog = Catalog::builtin();
        let positions = vec![fund("天弘沪深300指数A", 1000.0)];
        let plan = plan_keywords(&catalog, &positions);
        assert!(plan.buckets.instrument.iter().any(|k| k == "沪深300 指数"));
    }

    #[test]
    fn test_broad_term_discounted() {
        let catalog = Catalog::builtin();
        // "A股 市场" is macro-seeded and in the broad set; its weight must be
        // well below an undiscounted macro term's
        let positions = vec![fund("易方达半导体产业", 1000.0)];
        let plan = plan_keywords(&catalog, &positions);
        let broad = plan.weights["A股 市场"];
        let narrow = plan.weights["美联储 利率"];
        assert!(broad < narrow);
        assert!((narrow / broad - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_allocate_quota_sums_to_limit() {
        let keywords: Vec<String> = (0..7).map(|i| format!("kw{i}")).collect();
        let mut weights = HashMap::new();
        for (i, k) in keywords.iter().enumerate() {
            weights.insert(k.clone(), 1.0 / (i + 1) as f64);
        }
        for limit in [1usize, 2, 3, 5, 12, 30] {
            let quotas = allocate_quota(&keywords, Some(&weights), limit);
            assert_eq!(quotas.iter().sum::<usize>(), limit, "limit {limit}");
        }
    }

    #[test]
    fn test_allocate_quota_top_three_minimum() {
        let keywords: Vec<String> = (0..6).map(|i| format!("kw{i}")).collect();
        let mut weights = HashMap::new();
        weights.insert("kw0".into(), 100.0);
        weights.insert("kw1".into(), 0.001);
        weights.insert("kw2".into(), 0.0005);
        for k in keywords.iter().skip(3) {
            weights.insert(k.clone(), 0.0001);
        }
        let quotas = allocate_quota(&keywords, Some(&weights), 10);
        assert!(quotas[1] >= 1);
        assert!(quotas[2] >= 1);
        assert_eq!(quotas.iter().sum::<usize>(), 10);
    }

    #[test]
    fn test_allocate_quota_even_split_without_weights() {
        let keywords: Vec<String> = (0..4).map(|i| format!("kw{i}")).collect();
        let quotas = allocate_quota(&keywords, None, 10);
        assert_eq!(quotas, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_allocate_quota_empty_or_zero() {
        assert!(allocate_quota(&[], None, 10).is_empty());
        let keywords = vec!["a".to_string()];
        assert_eq!(allocate_quota(&keywords, None, 0), vec![0]);
    }
}
