use serde::{Deserialize, Serialize};

/// Trend state derived from the 20/60-day moving averages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Range,
    Unknown,
}

/// Snapshot of indicator values at the latest point of a series.
///
/// All percentage values are expressed in percent (e.g., 12.3 for 12.3%).
/// Fields are `None` when the series is too short for that indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Latest close (or NAV)
    pub last: f64,

    /// 20-day simple moving average
    pub sma20: Option<f64>,

    /// 60-day simple moving average
    pub sma60: Option<f64>,

    /// MACD line (EMA12 - EMA26)
    pub macd: Option<f64>,

    /// MACD histogram (MACD - signal)
    pub macd_hist: Option<f64>,

    /// 14-day Wilder RSI
    pub rsi14: Option<f64>,

    /// 20-day percent change
    pub ret20: Option<f64>,

    /// 60-day percent change
    pub ret60: Option<f64>,

    pub trend: Trend,
}

/// Outcome of an indicator computation. A short series is an expected,
/// typed result rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndicatorsOutcome {
    Ready(IndicatorSnapshot),
    InsufficientData { required: usize, actual: usize },
}

impl IndicatorsOutcome {
    pub fn snapshot(&self) -> Option<&IndicatorSnapshot> {
        match self {
            IndicatorsOutcome::Ready(snapshot) => Some(snapshot),
            IndicatorsOutcome::InsufficientData { .. } => None,
        }
    }
}
