use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    models::bar::RawBar,
    providers::{ApiSnafu, ProviderError, ResponseFormatSnafu, SymbolNotFoundSnafu},
};

#[derive(Deserialize, Debug)]
pub struct YahooError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartData {
    /// Bar start times in epoch seconds. Absent when the range holds no trades.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: SummaryEnvelope,
}

#[derive(Deserialize, Debug)]
pub struct SummaryEnvelope {
    pub result: Option<Vec<Map<String, Value>>>,
    pub error: Option<YahooError>,
}

fn envelope_error(symbol: &str, error: Option<YahooError>) -> ProviderError {
    match error {
        Some(err) if err.code == "Not Found" => SymbolNotFoundSnafu { symbol }.build(),
        Some(err) => ApiSnafu {
            message: format!("{}: {}", err.code, err.description),
        }
        .build(),
        None => ResponseFormatSnafu {
            message: "empty result with no error",
        }
        .build(),
    }
}

/// Unpacks the column-oriented chart payload into one [`RawBar`] per timestamp.
pub fn into_raw_bars(symbol: &str, response: ChartResponse) -> Result<Vec<RawBar>, ProviderError> {
    let ChartEnvelope { result, error } = response.chart;
    let data = result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| envelope_error(symbol, error))?;

    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data.indicators.quote.into_iter().next().ok_or_else(|| {
        ResponseFormatSnafu {
            message: format!("{symbol}: timestamps without quote data"),
        }
        .build()
    })?;

    let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
            ResponseFormatSnafu {
                message: format!("invalid timestamp: {ts}"),
            }
            .build()
        })?;

        bars.push(RawBar {
            timestamp,
            open: cell(&quote.open, i),
            high: cell(&quote.high, i),
            low: cell(&quote.low, i),
            close: cell(&quote.close, i),
            volume: cell(&quote.volume, i),
        });
    }

    Ok(bars)
}

/// Merges the per-module objects of a quoteSummary result into one flat map.
///
/// Keys keep the first value seen, following module order in the payload.
pub fn flatten_summary(
    symbol: &str,
    response: QuoteSummaryResponse,
) -> Result<Map<String, Value>, ProviderError> {
    let SummaryEnvelope { result, error } = response.quote_summary;
    let modules = result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| envelope_error(symbol, error))?;

    let mut flat = Map::new();
    for (module, value) in modules {
        match value {
            Value::Object(fields) => {
                for (key, field) in fields {
                    if !flat.contains_key(&key) {
                        flat.insert(key, field);
                    }
                }
            }
            other => {
                if !flat.contains_key(&module) {
                    flat.insert(module, other);
                }
            }
        }
    }

    Ok(flat)
}
