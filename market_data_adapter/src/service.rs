//! Request-level operations built on top of a [`DataProvider`].
//!
//! [`MarketDataService`] owns the only policy in the pipeline: every provider
//! call is bounded by a timeout, quote lookups fail as a whole, and search
//! drops candidates whose metadata cannot be fetched.

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    errors::UpstreamError,
    models::{
        bar::normalize_bars,
        info::normalize_info,
        quote::QuoteResponse,
        request_params::QuoteRequest,
        search::{SearchResult, TrendingEntry, trending},
    },
    providers::{DataProvider, ProviderError},
};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn DataProvider>,
    timeout: Duration,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self::with_timeout(provider, DEFAULT_PROVIDER_TIMEOUT)
    }

    pub fn with_timeout(provider: Arc<dyn DataProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, UpstreamError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(UpstreamError::from),
            Err(_) => Err(UpstreamError::Timeout(self.timeout)),
        }
    }

    /// Fetches bars and metadata for one symbol.
    ///
    /// Both provider calls run concurrently; if either fails the whole lookup fails.
    pub async fn fetch_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, UpstreamError> {
        let (raw_bars, raw_info) = tokio::try_join!(
            self.bounded(self.provider.fetch_bars(request)),
            self.bounded(self.provider.fetch_info(&request.symbol)),
        )?;

        let data = normalize_bars(&request.symbol, raw_bars)?;
        let info = normalize_info(raw_info);

        tracing::debug!(symbol = %request.symbol, bars = data.len(), fields = info.len(), "quote assembled");

        Ok(QuoteResponse {
            symbol: request.symbol.clone(),
            data,
            info,
        })
    }

    /// Best-effort lookup of instruments matching `query`.
    ///
    /// Only a failure to resolve the query is an error. Candidates whose metadata
    /// cannot be fetched within the provider timeout are left out of the result,
    /// one at a time.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, UpstreamError> {
        let candidates = self.bounded(self.provider.resolve_symbols(query)).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let infos = self
            .provider
            .fetch_info_batch(&candidates, self.timeout)
            .await;

        let results = candidates
            .iter()
            .zip(infos)
            .filter_map(|(candidate, info)| match info {
                Ok(raw) => Some(SearchResult::from_info(candidate, &normalize_info(raw))),
                Err(err) => {
                    tracing::debug!(candidate = %candidate, error = %err, "dropping search candidate");
                    None
                }
            })
            .collect();

        Ok(results)
    }

    /// The static trending list.
    pub fn trending(&self) -> Vec<TrendingEntry> {
        trending()
    }
}
