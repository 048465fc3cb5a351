use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use market_data_adapter::{
    MarketDataService, UpstreamError,
    models::{bar::RawBar, info::InfoValue, request_params::QuoteRequest},
    providers::{ApiSnafu, DataProvider, ProviderError, SymbolNotFoundSnafu},
};
use serde_json::{Map, Value, json};
use tokio::sync::Notify;

/// In-memory provider keyed by symbol. Symbols listed in `stuck` never answer.
#[derive(Default)]
struct FakeProvider {
    bars: HashMap<String, Vec<RawBar>>,
    info: HashMap<String, Value>,
    stuck: Vec<String>,
    fail_resolution: bool,
    never: Notify,
}

impl FakeProvider {
    fn with_symbol(mut self, symbol: &str, bars: Vec<RawBar>, info: Value) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self.info.insert(symbol.to_string(), info);
        self
    }

    fn with_stuck(mut self, symbol: &str) -> Self {
        self.stuck.push(symbol.to_string());
        self
    }

    async fn hang_if_stuck(&self, symbol: &str) {
        if self.stuck.iter().any(|s| s == symbol) {
            self.never.notified().await;
        }
    }
}

#[async_trait]
impl DataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_bars(&self, request: &QuoteRequest) -> Result<Vec<RawBar>, ProviderError> {
        self.hang_if_stuck(&request.symbol).await;
        match self.bars.get(&request.symbol) {
            Some(bars) => Ok(bars.clone()),
            None => SymbolNotFoundSnafu {
                symbol: request.symbol.clone(),
            }
            .fail(),
        }
    }

    async fn fetch_info(&self, symbol: &str) -> Result<Map<String, Value>, ProviderError> {
        self.hang_if_stuck(symbol).await;
        match self.info.get(symbol) {
            Some(Value::Object(map)) => Ok(map.clone()),
            _ => SymbolNotFoundSnafu { symbol }.fail(),
        }
    }

    async fn resolve_symbols(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        if self.fail_resolution {
            return ApiSnafu {
                message: "lookup service down",
            }
            .fail();
        }
        Ok(market_data_adapter::providers::split_tickers(query))
    }
}

fn bar(minute: i64, close: f64) -> RawBar {
    RawBar {
        timestamp: Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).unwrap(),
        open: Some(close - 0.5),
        high: Some(close + 1.0),
        low: Some(close - 1.0),
        close: Some(close),
        volume: Some(1_000.0),
    }
}

fn service(provider: FakeProvider) -> MarketDataService {
    MarketDataService::with_timeout(Arc::new(provider), Duration::from_millis(500))
}

fn aapl_provider() -> FakeProvider {
    FakeProvider::default().with_symbol(
        "AAPL",
        vec![bar(0, 190.0), bar(1, 191.0), bar(2, 189.5)],
        json!({
            "symbol": "AAPL",
            "shortName": "Apple Inc.",
            "exchange": "NMS",
            "marketCap": 3_000_000_000_000_u64,
            "companyOfficers": [{"name": "Tim"}],
            "isEsgPopulated": false,
            "fax": null
        }),
    )
}

#[tokio::test]
async fn quote_has_sorted_complete_bars_and_scalar_info() {
    let quote = service(aapl_provider())
        .fetch_quote(&QuoteRequest::new("AAPL"))
        .await
        .unwrap();

    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.data.len(), 3);
    assert!(quote.data.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(quote.data[0].timestamp, 1_700_000_000_000);

    assert_eq!(quote.info["shortName"], InfoValue::String("Apple Inc.".into()));
    assert!(matches!(quote.info["companyOfficers"], InfoValue::String(_)));
    assert_eq!(quote.info["fax"], InfoValue::Null);
}

#[tokio::test]
async fn quote_info_survives_json_round_trip() {
    let quote = service(aapl_provider())
        .fetch_quote(&QuoteRequest::new("AAPL"))
        .await
        .unwrap();

    let text = serde_json::to_string(&quote).unwrap();
    let back: market_data_adapter::models::quote::QuoteResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(back, quote);
}

#[tokio::test]
async fn unknown_symbol_is_an_upstream_error() {
    let err = service(aapl_provider())
        .fetch_quote(&QuoteRequest::new("ZZZZZZINVALID"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "symbol_not_found");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn partial_bar_fails_whole_quote() {
    let mut broken = bar(1, 10.0);
    broken.low = None;
    let provider = FakeProvider::default().with_symbol(
        "MSFT",
        vec![bar(0, 10.0), broken],
        json!({"symbol": "MSFT"}),
    );

    let err = service(provider)
        .fetch_quote(&QuoteRequest::new("MSFT"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UpstreamError::Provider(ProviderError::MalformedBar { index: 1, .. })
    ));
}

#[tokio::test]
async fn stuck_provider_times_out() {
    let provider = aapl_provider().with_stuck("AAPL");
    let err = service(provider)
        .fetch_quote(&QuoteRequest::new("AAPL"))
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Timeout(_)));
}

#[tokio::test]
async fn stuck_symbol_does_not_block_another() {
    let provider = aapl_provider()
        .with_symbol("SLOW", vec![bar(0, 1.0)], json!({"symbol": "SLOW"}))
        .with_stuck("SLOW");
    let svc = MarketDataService::with_timeout(Arc::new(provider), Duration::from_secs(60));

    let slow = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.fetch_quote(&QuoteRequest::new("SLOW")).await })
    };

    let fast = tokio::time::timeout(
        Duration::from_secs(5),
        svc.fetch_quote(&QuoteRequest::new("AAPL")),
    )
    .await
    .expect("AAPL lookup must not wait for SLOW");

    assert!(fast.is_ok());
    assert!(!slow.is_finished());
    slow.abort();
}

#[tokio::test]
async fn search_drops_candidates_without_metadata() {
    let provider = aapl_provider().with_symbol("MSFT", vec![], json!({"shortName": "Microsoft"}));
    let results = service(provider).search("aapl nope msft").await.unwrap();

    let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    assert!(results.iter().all(|r| !r.symbol.is_empty()));
    assert_eq!(results[0].name, "Apple Inc.");
    assert_eq!(results[1].exchange, "");
}

#[tokio::test]
async fn search_keeps_answers_when_one_candidate_hangs() {
    let provider = aapl_provider()
        .with_symbol("MSFT", vec![], json!({"symbol": "MSFT", "shortName": "Microsoft"}))
        .with_symbol("SLOW", vec![], json!({"symbol": "SLOW"}))
        .with_stuck("SLOW");
    let svc = MarketDataService::with_timeout(Arc::new(provider), Duration::from_millis(200));

    let results = svc.search("AAPL SLOW MSFT").await.unwrap();

    let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT"]);
}

#[tokio::test]
async fn search_with_no_candidates_is_empty() {
    let results = service(aapl_provider()).search(" , ").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_with_every_candidate_failing_is_empty() {
    let results = service(aapl_provider()).search("XXX YYY").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_fails_only_when_resolution_fails() {
    let provider = FakeProvider {
        fail_resolution: true,
        ..aapl_provider()
    };
    let err = service(provider).search("AAPL").await.unwrap_err();
    assert_eq!(err.code(), "upstream_unavailable");
}

#[tokio::test]
async fn trending_is_independent_of_provider() {
    let svc = service(FakeProvider::default());
    let list = svc.trending();
    assert_eq!(list.len(), 5);
    assert_eq!(list, svc.trending());
    let symbols: Vec<&str> = list.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]);
}
