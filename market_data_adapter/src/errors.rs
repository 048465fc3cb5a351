use std::time::Duration;

use thiserror::Error;

use crate::providers::ProviderError;

/// The unified error type for the `market_data_adapter` crate.
///
/// Anything that went wrong on the provider side of a request ends up here;
/// local normalization failures are reported as provider errors too, since
/// they stem from a payload the provider sent.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider call failed or returned data we could not use.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider did not answer within the configured budget.
    #[error("Provider did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl UpstreamError {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "upstream_timeout",
            UpstreamError::Provider(err) => match err {
                ProviderError::SymbolNotFound { .. } => "symbol_not_found",
                ProviderError::Validation { .. } => "invalid_parameters",
                ProviderError::ResponseFormat { .. } | ProviderError::MalformedBar { .. } => {
                    "upstream_bad_response"
                }
                ProviderError::Timeout { .. } => "upstream_timeout",
                ProviderError::Reqwest { .. } | ProviderError::Api { .. } => "upstream_unavailable",
            },
        }
    }

    /// Client-facing message that never carries provider internals.
    pub fn public_message(&self) -> &'static str {
        match self.code() {
            "symbol_not_found" => "No market data found for the requested symbol",
            "invalid_parameters" => "Unsupported period or interval",
            "upstream_timeout" => "Market data provider timed out",
            "upstream_bad_response" => "Market data provider returned unusable data",
            _ => "Market data provider is unavailable",
        }
    }
}
