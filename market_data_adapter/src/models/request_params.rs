use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD: &str = "1d";
pub const DEFAULT_INTERVAL: &str = "1m";

/// Parameters of a single quote lookup.
///
/// `period` and `interval` are kept as the caller wrote them; each provider
/// parses and validates them according to its own API rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Ticker in provider syntax (e.g. `"AAPL"`, `"BRK-B"`, `"005930.KS"`).
    pub symbol: String,

    /// Lookback window, e.g. `"1d"`, `"6mo"`, `"max"`.
    #[serde(default = "default_period")]
    pub period: String,

    /// Width of each bar, e.g. `"1m"`, `"1h"`, `"1wk"`.
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

impl QuoteRequest {
    /// A request for `symbol` with the default period and interval.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            period: default_period(),
            interval: default_interval(),
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }
}
