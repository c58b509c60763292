use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::series_provider::{ProviderError, SeriesProvider};
use crate::models::{InstrumentKind, PricePoint};
use crate::services::normalizer::{normalize, RawClose, RecordOrder};

const KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Daily bars for US tickers from the Eastmoney kline API.
/// The feed delivers bars oldest first, one comma-joined string per day.
pub struct DailyBarProvider {
    client: reqwest::Client,
}

impl DailyBarProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for DailyBarProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    klines: Vec<String>,
}

/// "date,open,close,high,low,volume,..." -> (date, close)
fn parse_kline(line: &str) -> Option<RawClose> {
    let mut fields = line.split(',');
    let date = NaiveDate::parse_from_str(fields.next()?, "%Y-%m-%d").ok()?;
    let _open = fields.next()?;
    let close = fields.next()?.parse::<f64>().ok()?;
    Some(RawClose { date, close })
}

#[async_trait]
impl SeriesProvider for DailyBarProvider {
    async fn fetch_series(
        &self,
        _kind: InstrumentKind,
        symbol: &str,
        points: usize,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        // Market 105/106/107 covers NASDAQ/NYSE/AMEX; 105 works for the
        // index ETFs in the proxy universe
        let secid = format!("105.{}", symbol.to_uppercase());
        let limit = points.to_string();

        let resp = self
            .client
            .get(KLINE_URL)
            .query(&[
                ("secid", secid.as_str()),
                ("klt", "101"),
                ("fqt", "1"),
                ("lmt", limit.as_str()),
                ("end", "20500101"),
                ("fields1", "f1,f2,f3"),
                ("fields2", "f51,f52,f53,f54,f55,f56"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: KlineResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let data = body
            .data
            .ok_or_else(|| ProviderError::BadResponse("missing kline data".into()))?;

        let records: Vec<RawClose> = data
            .klines
            .iter()
            .filter_map(|line| parse_kline(line))
            .collect();

        Ok(normalize(records, RecordOrder::OldestFirst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kline_line() {
        let record = parse_kline("2026-08-21,531.2,534.8,536.0,530.1,41230000").unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 8, 21).unwrap());
        assert_eq!(record.close, 534.8);
    }

    #[test]
    fn test_parse_kline_rejects_garbage() {
        assert!(parse_kline("not-a-date,1,2").is_none());
        assert!(parse_kline("2026-08-21,1").is_none());
    }
}
