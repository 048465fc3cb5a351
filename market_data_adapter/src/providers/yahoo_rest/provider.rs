use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use snafu::ResultExt;
use tokio::sync::OnceCell;

use crate::{
    models::{bar::RawBar, request_params::QuoteRequest},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidBaseUrlSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu, ResponseFormatSnafu,
        yahoo_rest::{
            params::{construct_chart_params, construct_summary_params},
            response::{ChartResponse, QuoteSummaryResponse, flatten_summary, into_raw_bars},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// How much of an unparseable error body ends up in the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Connection settings for [`YahooProvider`].
#[derive(Clone, Debug)]
pub struct YahooConfig {
    /// Root of the query API, e.g. `https://query2.finance.yahoo.com`.
    pub base_url: String,
    /// Page that hands out the session cookie the crumb is bound to.
    pub cookie_url: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_url: DEFAULT_COOKIE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct YahooProvider {
    client: Client,
    base_url: Url,
    cookie_url: Url,
    crumb: OnceCell<String>,
}

impl YahooProvider {
    /// Creates a provider talking to the public Yahoo endpoints.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> Result<Self, ProviderInitError> {
        let base_url = parse_base(&config.base_url)?;
        let cookie_url = parse_base(&config.cookie_url)?;

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url,
            cookie_url,
            crumb: OnceCell::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base already rejected cannot-be-a-base URLs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Returns the session crumb, fetching it on first use.
    async fn crumb(&self) -> Result<&str, ProviderError> {
        self.crumb
            .get_or_try_init(|| self.fetch_crumb())
            .await
            .map(String::as_str)
    }

    async fn fetch_crumb(&self) -> Result<String, ProviderError> {
        // The cookie page usually answers 404; only the Set-Cookie header matters.
        self.client
            .get(self.cookie_url.clone())
            .send()
            .await
            .context(ReqwestSnafu)?;

        let response = self
            .client
            .get(self.endpoint(&["v1", "test", "getcrumb"]))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;
        let crumb = body.trim();

        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return ApiSnafu {
                message: format!("could not obtain crumb (HTTP {status})"),
            }
            .fail();
        }

        tracing::debug!("obtained Yahoo session crumb");
        Ok(crumb.to_string())
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = request.send().await.context(ReqwestSnafu)?;
        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        match serde_json::from_str::<T>(&body) {
            // Unknown symbols come back as 404 with a regular JSON envelope.
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => ApiSnafu {
                message: format!("HTTP {status}: {}", truncate(&body, ERROR_BODY_LIMIT)),
            }
            .fail(),
            Err(e) => ResponseFormatSnafu {
                message: format!("failed to decode response: {e}"),
            }
            .fail(),
        }
    }
}

fn parse_base(raw: &str) -> Result<Url, ProviderInitError> {
    let url = Url::parse(raw).map_err(|e| {
        InvalidBaseUrlSnafu {
            url: raw,
            message: e.to_string(),
        }
        .build()
    })?;
    if url.cannot_be_a_base() {
        return InvalidBaseUrlSnafu {
            url: raw,
            message: "URL cannot be used as a base",
        }
        .fail();
    }
    Ok(url)
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn fetch_bars(&self, request: &QuoteRequest) -> Result<Vec<RawBar>, ProviderError> {
        let query = construct_chart_params(request)?;
        let url = self.endpoint(&["v8", "finance", "chart", request.symbol.as_str()]);

        tracing::debug!(symbol = %request.symbol, period = %request.period, interval = %request.interval, "fetching chart");
        let chart: ChartResponse = self.get_json(self.client.get(url).query(&query)).await?;

        into_raw_bars(&request.symbol, chart)
    }

    async fn fetch_info(&self, symbol: &str) -> Result<Map<String, Value>, ProviderError> {
        let crumb = self.crumb().await?;
        let url = self.endpoint(&["v10", "finance", "quoteSummary", symbol]);

        tracing::debug!(symbol, "fetching quote summary");
        let summary: QuoteSummaryResponse = self
            .get_json(self.client.get(url).query(&construct_summary_params(crumb)))
            .await?;

        flatten_summary(symbol, summary)
    }
}
