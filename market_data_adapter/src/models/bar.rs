//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! Providers hand back [`RawBar`]s whose fields may be missing; [`normalize_bars`]
//! turns them into the strict [`Bar`] shape served to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::{MalformedBarSnafu, ProviderError};

/// A single time-series bar (OHLCV) as served to clients.
///
/// Every numeric field is populated; a provider row that cannot fill all of
/// them never becomes a `Bar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the bar interval, milliseconds since the Unix epoch (UTC).
    pub timestamp: i64,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: u64,
}

/// A bar exactly as a provider reported it.
///
/// Providers are free to leave any of the OHLCV columns empty for a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// No prices, and either no volume or a zero volume.
    fn is_empty(&self) -> bool {
        let no_prices = [self.open, self.high, self.low, self.close]
            .into_iter()
            .all(|p| p.is_none_or(f64::is_nan));
        no_prices && self.volume.is_none_or(|v| v == 0.0 || v.is_nan())
    }
}

/// Converts provider rows into client bars, preserving provider order.
///
/// Rows without prices and without traded volume are non-trading slots and are
/// skipped. A row that is only partly filled, or holds a non-finite price or a negative
/// volume, fails the whole conversion.
pub fn normalize_bars(symbol: &str, raw: Vec<RawBar>) -> Result<Vec<Bar>, ProviderError> {
    let mut bars = Vec::with_capacity(raw.len());

    for (index, row) in raw.into_iter().enumerate() {
        if row.is_empty() {
            continue;
        }

        let price = |value: Option<f64>, field: &'static str| {
            value
                .filter(|v| v.is_finite())
                .ok_or_else(|| MalformedBarSnafu { symbol, index, field }.build())
        };

        let volume = row
            .volume
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| {
                MalformedBarSnafu {
                    symbol,
                    index,
                    field: "volume",
                }
                .build()
            })?;

        bars.push(Bar {
            timestamp: row.timestamp.timestamp_millis(),
            open: price(row.open, "open")?,
            high: price(row.high, "high")?,
            low: price(row.low, "low")?,
            close: price(row.close, "close")?,
            volume: volume.trunc() as u64,
        });
    }

    Ok(bars)
}
