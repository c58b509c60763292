use serde::{Deserialize, Serialize};

/// Overall portfolio risk classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Suggested equity exposure for this level, in percent.
    pub fn suggested_exposure(self) -> u8 {
        match self {
            RiskLevel::High => 60,
            RiskLevel::Medium => 70,
            RiskLevel::Low => 80,
        }
    }
}

/// One triggered risk flag with a human-readable explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskItem {
    pub level: RiskLevel,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTheme {
    pub name: String,
    /// Share of portfolio weight attributed to this theme, in [0, 1]
    pub pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_level: RiskLevel,
    /// Suggested exposure in percent, 0-100
    pub suggested_exposure: u8,
    pub top_theme: TopTheme,
    pub items: Vec<RiskItem>,
}
