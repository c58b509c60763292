use chrono::NaiveDate;
use tracing::warn;

use crate::models::PricePoint;

/// Ordering of raw records as delivered by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    /// Fund NAV feeds deliver the latest value first
    NewestFirst,
    /// Daily bar feeds deliver oldest first
    OldestFirst,
}

/// One raw (date, close) record before normalization.
#[derive(Debug, Clone, Copy)]
pub struct RawClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Convert provider records into a canonical ascending-date series.
///
/// Non-finite closes are dropped here so they never reach the indicator
/// engine. Gaps are left as-is; no interpolation.
pub fn normalize(mut records: Vec<RawClose>, order: RecordOrder) -> Vec<PricePoint> {
    if order == RecordOrder::NewestFirst {
        records.reverse();
    }

    let total = records.len();
    let series: Vec<PricePoint> = records
        .into_iter()
        .filter(|r| r.close.is_finite())
        .map(|r| PricePoint::new(r.date, r.close))
        .collect();

    if series.len() < total {
        warn!("dropped {} non-finite closes during normalization", total - series.len());
    }

    series
}
