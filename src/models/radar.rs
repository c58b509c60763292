use serde::{Deserialize, Serialize};

use crate::models::indicators::Trend;
use crate::models::position::InstrumentKind;

/// One instrument in the configured proxy universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySpec {
    pub label: String,
    pub symbol: String,
    pub kind: InstrumentKind,
}

impl ProxySpec {
    pub fn new(label: &str, symbol: &str, kind: InstrumentKind) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            kind,
        }
    }
}

/// A scored proxy, as returned by the radar ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRating {
    pub label: String,
    pub symbol: String,
    /// Composite momentum score, integral 0-10
    pub score: u8,
    pub trend: Trend,
    pub ret20: Option<f64>,
    pub rsi14: Option<f64>,
}
