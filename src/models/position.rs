use serde::{Deserialize, Serialize};

/// Instrument class a position refers to. Determines which series provider
/// serves it and how its raw records are ordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    CnFund,
    UsTicker,
}

// Represents one holding as submitted by the client. Either market value or
// invested amount may be present; weight derivation prefers market value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub mv: Option<f64>,
    #[serde(default)]
    pub pnl_pct: Option<f64>,
    /// Optional explicit theme hint; folded into theme detection input.
    #[serde(default)]
    pub theme: Option<String>,
}

impl Position {
    /// Raw (unnormalized) weight: market value if positive, else invested
    /// amount if positive, else zero.
    pub fn raw_weight(&self) -> f64 {
        match self.mv {
            Some(mv) if mv > 0.0 => mv,
            _ => match self.amount {
                Some(amount) if amount > 0.0 => amount,
                _ => 0.0,
            },
        }
    }

    /// Text the theme classifier sees for this position.
    pub fn theme_text(&self) -> String {
        match &self.theme {
            Some(hint) => format!("{} {}", self.name, hint),
            None => self.name.clone(),
        }
    }
}
