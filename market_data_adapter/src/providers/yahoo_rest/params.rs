use crate::{
    models::{
        period::Period,
        request_params::QuoteRequest,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Metadata modules merged into one attribute map, in precedence order.
pub const SUMMARY_MODULES: &[&str] = &[
    "quoteType",
    "price",
    "summaryDetail",
    "assetProfile",
    "financialData",
    "defaultKeyStatistics",
];

/// Checks an interval against what the chart endpoint serves.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let allowed: &[u32] = match timeframe.unit {
        TimeFrameUnit::Minute => &[1, 2, 5, 15, 30, 60, 90],
        TimeFrameUnit::Hour => &[1],
        TimeFrameUnit::Day => &[1, 5],
        TimeFrameUnit::Week => &[1],
        TimeFrameUnit::Month => &[1, 3],
    };

    if allowed.contains(&timeframe.amount) {
        Ok(())
    } else {
        ValidationSnafu {
            message: format!("unsupported interval {timeframe}"),
        }
        .fail()
    }
}

/// Builds the chart query string for a request.
pub fn construct_chart_params(request: &QuoteRequest) -> Result<Vec<(String, String)>, ProviderError> {
    let period: Period = request.period.parse().map_err(|e| {
        ValidationSnafu {
            message: format!("{e}"),
        }
        .build()
    })?;
    let timeframe: TimeFrame = request.interval.parse().map_err(|e| {
        ValidationSnafu {
            message: format!("{e}"),
        }
        .build()
    })?;
    validate_timeframe(&timeframe)?;

    Ok(vec![
        ("range".to_string(), period.to_string()),
        ("interval".to_string(), timeframe.to_string()),
        ("includePrePost".to_string(), "false".to_string()),
        ("events".to_string(), "div,splits".to_string()),
    ])
}

/// Builds the quoteSummary query string.
pub fn construct_summary_params(crumb: &str) -> Vec<(String, String)> {
    vec![
        ("modules".to_string(), SUMMARY_MODULES.join(",")),
        ("corsDomain".to_string(), "finance.yahoo.com".to_string()),
        ("formatted".to_string(), "false".to_string()),
        ("crumb".to_string(), crumb.to_string()),
    ]
}
