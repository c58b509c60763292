use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One canonical daily close. A series is a Vec<PricePoint> ordered oldest
// first with strictly increasing dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}
