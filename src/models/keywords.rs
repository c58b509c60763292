use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bucket a keyword was sourced from. Macro terms are always seeded,
/// theme terms come from ranked portfolio themes, instrument terms from
/// position-name matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordBuckets {
    pub r#macro: Vec<String>,
    pub theme: Vec<String>,
    pub instrument: Vec<String>,
}

/// Output of keyword planning: a deduplicated, capped keyword list with
/// normalized weights and the detected theme ranking behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPlan {
    /// Detected themes, descending by aggregate portfolio weight
    pub themes: Vec<String>,
    /// theme -> aggregate weight in [0, 1], sums to 1
    pub theme_weights: HashMap<String, f64>,
    /// Kept keywords, descending by weight
    pub keywords: Vec<String>,
    /// keyword -> weight, renormalized to sum to 1 over kept keywords
    pub weights: HashMap<String, f64>,
    pub buckets: KeywordBuckets,
}
