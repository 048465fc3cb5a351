//! Search hits and the trending list.

use serde::{Deserialize, Serialize};

use crate::models::info::InstrumentInfo;

/// One instrument matched by a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl SearchResult {
    /// Builds a hit from a candidate ticker and its normalized metadata.
    ///
    /// Falls back to `candidate` when the metadata carries no symbol.
    pub fn from_info(candidate: &str, info: &InstrumentInfo) -> Self {
        let text = |key: &str| {
            info.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let symbol = match text("symbol") {
            s if s.is_empty() => candidate.to_string(),
            s => s,
        };

        Self {
            symbol,
            name: text("shortName"),
            exchange: text("exchange"),
            kind: "stock".to_string(),
        }
    }
}

/// A fixed entry in the trending list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub symbol: String,
    pub name: String,
    /// Daily change in percent.
    pub change: f64,
}

const TRENDING: [(&str, &str, f64); 5] = [
    ("AAPL", "Apple Inc.", 1.2),
    ("MSFT", "Microsoft Corporation", 0.8),
    ("GOOGL", "Alphabet Inc.", -0.5),
    ("AMZN", "Amazon.com, Inc.", 2.1),
    ("TSLA", "Tesla, Inc.", -1.3),
];

/// The hardcoded trending list.
// TODO: source this from a movers feed once one is wired in; the values are placeholders.
pub fn trending() -> Vec<TrendingEntry> {
    TRENDING
        .iter()
        .map(|&(symbol, name, change)| TrendingEntry {
            symbol: symbol.to_string(),
            name: name.to_string(),
            change,
        })
        .collect()
}
