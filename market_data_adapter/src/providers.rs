//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the seam between the
//! [`MarketDataService`](crate::service::MarketDataService) and any concrete market
//! data vendor (Yahoo Finance today). A provider only moves data across the wire and
//! decodes the vendor's envelope; normalization into client shapes happens in
//! [`models`](crate::models).
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`Arc<dyn DataProvider>`) so the server can pick a provider at runtime and tests
//! can substitute an in-memory one.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_adapter::models::{bar::RawBar, request_params::QuoteRequest};
//! use market_data_adapter::providers::{DataProvider, ProviderError};
//! use serde_json::{Map, Value};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     fn name(&self) -> &str {
//!         "mine"
//!     }
//!
//!     async fn fetch_bars(&self, _request: &QuoteRequest) -> Result<Vec<RawBar>, ProviderError> {
//!         Ok(vec![])
//!     }
//!
//!     async fn fetch_info(&self, _symbol: &str) -> Result<Map<String, Value>, ProviderError> {
//!         Ok(Map::new())
//!     }
//! }
//! ```

pub mod yahoo_rest;

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use snafu::{Backtrace, Snafu};

use crate::models::{bar::RawBar, request_params::QuoteRequest};

/// Trait for fetching bars and descriptive metadata from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetches historical bars for the request's symbol, period and interval,
    /// in the order the provider reports them.
    async fn fetch_bars(&self, request: &QuoteRequest) -> Result<Vec<RawBar>, ProviderError>;

    /// Fetches the open-ended attribute map describing `symbol`.
    async fn fetch_info(&self, symbol: &str) -> Result<Map<String, Value>, ProviderError>;

    /// Fetches metadata for several symbols, one result per input, in input order.
    ///
    /// Each symbol gets its own `per_symbol` budget; a symbol that exceeds it
    /// yields [`ProviderError::Timeout`] without affecting the others. The default
    /// runs [`fetch_info`](Self::fetch_info) for every symbol concurrently.
    async fn fetch_info_batch(
        &self,
        symbols: &[String],
        per_symbol: Duration,
    ) -> Vec<Result<Map<String, Value>, ProviderError>> {
        join_all(symbols.iter().map(|symbol| async move {
            match tokio::time::timeout(per_symbol, self.fetch_info(symbol)).await {
                Ok(result) => result,
                Err(_) => TimeoutSnafu {
                    symbol: symbol.as_str(),
                    after: per_symbol,
                }
                .fail(),
            }
        }))
        .await
    }

    /// Turns a free-text query into candidate tickers.
    async fn resolve_symbols(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        Ok(split_tickers(query))
    }
}

/// Splits a query such as `"aapl, msft tsla"` into upper-cased tickers.
pub fn split_tickers(query: &str) -> Vec<String> {
    query
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A configured endpoint is not a usable base URL.
    #[snafu(display("Invalid base URL {url:?}: {message}"))]
    InvalidBaseUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider does not know the requested symbol.
    #[snafu(display("No data found for symbol {symbol}"))]
    SymbolNotFound {
        symbol: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider answered with a payload we could not decode.
    #[snafu(display("Unexpected provider response: {message}"))]
    ResponseFormat {
        message: String,
        backtrace: Backtrace,
    },

    /// A bar row was only partly populated.
    #[snafu(display("Bar {index} for {symbol} has a missing or invalid {field}"))]
    MalformedBar {
        symbol: String,
        index: usize,
        field: &'static str,
        backtrace: Backtrace,
    },

    /// A single symbol's request exceeded its budget.
    #[snafu(display("No response for {symbol} within {after:?}"))]
    Timeout {
        symbol: String,
        after: Duration,
        backtrace: Backtrace,
    },
}
