use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::external::series_provider::SeriesProvider;
use crate::models::{IndicatorSnapshot, IndicatorsOutcome, ProxyRating, Trend};
use crate::services::indicators::compute_snapshot;

/// History needed for a full snapshot (sma60 + ret60 need 61, with slack).
pub const RADAR_MIN_POINTS: usize = 65;
pub const DEFAULT_TOP_N: usize = 3;
pub const MAX_TOP_N: usize = 8;

/// Composite momentum score for one indicator snapshot, integral in [0, 10].
///
/// Component scale: trend up/range/down -> 4/2/0; ret20 >=6/>=2/>=0 ->
/// 4/3/2; |rsi14 - 60| <=5/<=10 -> 3/2 else 1; positive MACD histogram -> 2.
pub fn score_snapshot(snapshot: &IndicatorSnapshot) -> u8 {
    let trend_component = match snapshot.trend {
        Trend::Up => 4,
        Trend::Range => 2,
        Trend::Down | Trend::Unknown => 0,
    };

    let momentum_component = match snapshot.ret20 {
        Some(r) if r >= 6.0 => 4,
        Some(r) if r >= 2.0 => 3,
        Some(r) if r >= 0.0 => 2,
        _ => 0,
    };

    let rsi_component = match snapshot.rsi14 {
        Some(rsi) => {
            let d = (rsi - 60.0).abs();
            if d <= 5.0 {
                3
            } else if d <= 10.0 {
                2
            } else {
                1
            }
        }
        None => 1,
    };

    let macd_component = match snapshot.macd_hist {
        Some(h) if h > 0.0 => 2,
        _ => 0,
    };

    let total: i32 = trend_component + momentum_component + rsi_component + macd_component;
    total.clamp(0, 10) as u8
}

/// Scan the configured proxy universe, score every instrument with enough
/// history, and return the top `top_n` (default 3, capped at 8).
///
/// Every fetch runs as its own task; a failed or too-short series excludes
/// only that proxy. Ranking is a stable descending sort, so universe order
/// breaks score ties.
pub async fn rank_proxies(
    catalog: &Catalog,
    provider: Arc<dyn SeriesProvider>,
    top_n: Option<usize>,
) -> Vec<ProxyRating> {
    let top_n = top_n.unwrap_or(DEFAULT_TOP_N).min(MAX_TOP_N);

    let scans = catalog.proxy_universe.iter().map(|proxy| {
        let provider = Arc::clone(&provider);
        async move {
            let series = provider
                .fetch_series(proxy.kind, &proxy.symbol, RADAR_MIN_POINTS)
                .await;
            (proxy, series)
        }
    });

    let mut ratings: Vec<ProxyRating> = Vec::new();
    for (proxy, result) in join_all(scans).await {
        let series = match result {
            Ok(series) => series,
            Err(e) => {
                warn!("radar: series fetch failed for {} ({}): {}", proxy.label, proxy.symbol, e);
                continue;
            }
        };

        match compute_snapshot(&series, RADAR_MIN_POINTS) {
            IndicatorsOutcome::Ready(snapshot) => {
                ratings.push(ProxyRating {
                    label: proxy.label.clone(),
                    symbol: proxy.symbol.clone(),
                    score: score_snapshot(&snapshot),
                    trend: snapshot.trend,
                    ret20: snapshot.ret20,
                    rsi14: snapshot.rsi14,
                });
            }
            IndicatorsOutcome::InsufficientData { required, actual } => {
                debug!(
                    "radar: {} excluded, {} of {} required points",
                    proxy.label, actual, required
                );
            }
        }
    }

    ratings.sort_by(|a, b| b.score.cmp(&a.score));
    ratings.truncate(top_n);
    ratings
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::external::series_provider::ProviderError;
    use crate::models::{InstrumentKind, PricePoint};

    fn snapshot(trend: Trend, ret20: Option<f64>, rsi14: Option<f64>, hist: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            last: 100.0,
            sma20: Some(99.0),
            sma60: Some(98.0),
            macd: Some(0.5),
            macd_hist: hist,
            rsi14,
            ret20,
            ret60: None,
            trend,
        }
    }

    #[test]
    fn test_score_bounds() {
        // Best case: 4 + 4 + 3 + 2 = 13 clamps to 10
        let best = snapshot(Trend::Up, Some(8.0), Some(58.0), Some(0.3));
        assert_eq!(score_snapshot(&best), 10);

        // Worst case bottoms out above zero only via the rsi floor
        let worst = snapshot(Trend::Down, Some(-4.0), Some(20.0), Some(-0.3));
        assert_eq!(score_snapshot(&worst), 1);
    }

    #[test]
    fn test_score_monotonic_in_ret20() {
        let base = snapshot(Trend::Range, Some(1.0), Some(50.0), Some(0.1));
        let better = snapshot(Trend::Range, Some(7.0), Some(50.0), Some(0.1));
        assert!(score_snapshot(&better) >= score_snapshot(&base));
    }

    #[test]
    fn test_score_rsi_sweet_spot() {
        let near = snapshot(Trend::Range, Some(0.5), Some(62.0), None);
        let mid = snapshot(Trend::Range, Some(0.5), Some(52.0), None);
        let far = snapshot(Trend::Range, Some(0.5), Some(30.0), None);
        assert!(score_snapshot(&near) > score_snapshot(&mid));
        assert!(score_snapshot(&mid) > score_snapshot(&far));
    }

    /// Serves a linear ramp with per-symbol slope; unknown symbols fail,
    /// "SHORT" yields too little history.
    struct FixtureProvider;

    #[async_trait]
    impl SeriesProvider for FixtureProvider {
        async fn fetch_series(
            &self,
            _kind: InstrumentKind,
            symbol: &str,
            points: usize,
        ) -> Result<Vec<PricePoint>, ProviderError> {
            if symbol == "FAIL" {
                return Err(ProviderError::Network("connection reset".into()));
            }
            let len = if symbol == "SHORT" { 10 } else { points };
            let slope = match symbol {
                "UP" => 0.5,
                "FLAT" => 0.0,
                _ => -0.5,
            };
            let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
            Ok((0..len)
                .map(|i| {
                    PricePoint::new(
                        start + chrono::Days::new(i as u64),
                        100.0 + slope * i as f64,
                    )
                })
                .collect())
        }
    }

    fn fixture_catalog() -> Catalog {
        let mut catalog = Catalog::builtin();
        catalog.proxy_universe = vec![
            crate::models::ProxySpec::new("下行", "DOWN", InstrumentKind::UsTicker),
            crate::models::ProxySpec::new("上行", "UP", InstrumentKind::UsTicker),
            crate::models::ProxySpec::new("故障", "FAIL", InstrumentKind::UsTicker),
            crate::models::ProxySpec::new("短史", "SHORT", InstrumentKind::CnFund),
            crate::models::ProxySpec::new("横盘", "FLAT", InstrumentKind::CnFund),
        ];
        catalog
    }

    #[tokio::test]
    async fn test_rank_excludes_failures_and_short_series() {
        let catalog = fixture_catalog();
        let ratings = rank_proxies(&catalog, Arc::new(FixtureProvider), Some(8)).await;

        let symbols: Vec<&str> = ratings.iter().map(|r| r.symbol.as_str()).collect();
        assert!(!symbols.contains(&"FAIL"));
        assert!(!symbols.contains(&"SHORT"));
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[0].symbol, "UP");
    }

    #[tokio::test]
    async fn test_rank_respects_top_n_cap() {
        let catalog = fixture_catalog();
        let ratings = rank_proxies(&catalog, Arc::new(FixtureProvider), Some(100)).await;
        assert!(ratings.len() <= MAX_TOP_N);

        let default_ratings = rank_proxies(&catalog, Arc::new(FixtureProvider), None).await;
        assert!(default_ratings.len() <= DEFAULT_TOP_N);
    }
}
