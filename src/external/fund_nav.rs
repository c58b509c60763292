use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::series_provider::{ProviderError, SeriesProvider};
use crate::models::{InstrumentKind, PricePoint};
use crate::services::normalizer::{normalize, RawClose, RecordOrder};

const NAV_HISTORY_URL: &str = "https://api.fund.eastmoney.com/f10/lsjz";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// CN open-end fund NAV history from the Eastmoney fund API.
/// The feed delivers the latest NAV first.
pub struct FundNavProvider {
    client: reqwest::Client,
}

impl FundNavProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for FundNavProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct NavHistoryResponse {
    #[serde(rename = "Data")]
    data: Option<NavHistoryData>,
    #[serde(rename = "ErrCode")]
    err_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct NavHistoryData {
    #[serde(rename = "LSJZList")]
    nav_list: Vec<NavRecord>,
}

#[derive(Debug, Deserialize)]
struct NavRecord {
    /// NAV date, "YYYY-MM-DD"
    #[serde(rename = "FSRQ")]
    date: String,
    /// Unit NAV; empty on suspended days
    #[serde(rename = "DWJZ", default)]
    unit_nav: String,
}

#[async_trait]
impl SeriesProvider for FundNavProvider {
    async fn fetch_series(
        &self,
        _kind: InstrumentKind,
        symbol: &str,
        points: usize,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let page_size = points.to_string();
        let resp = self
            .client
            .get(NAV_HISTORY_URL)
            // The endpoint rejects requests without a fund-site referer
            .header("Referer", "https://fundf10.eastmoney.com/")
            .query(&[
                ("fundCode", symbol),
                ("pageIndex", "1"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: NavHistoryResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(code) = body.err_code {
            if code != 0 {
                return Err(ProviderError::BadResponse(format!(
                    "fund API error code {code}"
                )));
            }
        }

        let records = body
            .data
            .ok_or_else(|| ProviderError::BadResponse("missing NAV data".into()))?
            .nav_list
            .into_iter()
            .filter_map(|record| {
                let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").ok()?;
                // Suspended days carry an empty NAV; let the normalizer drop
                // anything that fails to parse as a finite number
                let close = record.unit_nav.parse::<f64>().unwrap_or(f64::NAN);
                Some(RawClose { date, close })
            })
            .collect();

        Ok(normalize(records, RecordOrder::NewestFirst))
    }
}
