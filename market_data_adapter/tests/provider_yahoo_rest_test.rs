#![cfg(test)]
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use market_data_adapter::{
    models::request_params::QuoteRequest,
    providers::{
        DataProvider, ProviderError,
        yahoo_rest::{YahooConfig, YahooProvider},
    },
};
use serde_json::json;

#[derive(Clone, Default)]
struct StubState {
    crumb_requests: Arc<AtomicUsize>,
}

async fn cookie() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::SET_COOKIE, "A3=session; Path=/")],
        "",
    )
}

async fn crumb(State(state): State<StubState>) -> impl IntoResponse {
    state.crumb_requests.fetch_add(1, Ordering::SeqCst);
    "stub-crumb"
}

async fn chart(
    Path(symbol): Path<String>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    if symbol != "AAPL" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}})),
        );
    }
    assert_eq!(query.get("range").map(String::as_str), Some("5d"));
    assert_eq!(query.get("interval").map(String::as_str), Some("15m"));

    (
        StatusCode::OK,
        Json(json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1700000000, 1700000900, 1700001800],
                    "indicators": {"quote": [{
                        "open": [190.0, null, 191.0],
                        "high": [191.0, null, 192.0],
                        "low": [189.0, null, 190.5],
                        "close": [190.5, null, 191.5],
                        "volume": [12000, null, 9000]
                    }]}
                }],
                "error": null
            }
        })),
    )
}

async fn summary(
    Path(symbol): Path<String>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    if query.get("crumb").map(String::as_str) != Some("stub-crumb") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"finance": {"error": {"code": "Unauthorized"}}})));
    }
    match symbol.as_str() {
        "AAPL" | "MSFT" => (
            StatusCode::OK,
            Json(json!({
                "quoteSummary": {
                    "result": [{
                        "price": {"symbol": symbol.clone(), "shortName": format!("{symbol} Corp"), "exchange": "NMS"},
                        "summaryDetail": {"beta": 1.2, "marketCap": 3000000000000_u64}
                    }],
                    "error": null
                }
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found"}}})),
        ),
    }
}

async fn spawn_stub() -> (SocketAddr, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/cookie", get(cookie))
        .route("/v1/test/getcrumb", get(crumb))
        .route("/v8/finance/chart/{symbol}", get(chart))
        .route("/v10/finance/quoteSummary/{symbol}", get(summary))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn provider_for(addr: SocketAddr) -> YahooProvider {
    YahooProvider::with_config(YahooConfig {
        base_url: format!("http://{addr}"),
        cookie_url: format!("http://{addr}/cookie"),
        timeout: Duration::from_secs(5),
    })
    .expect("provider")
}

#[tokio::test]
async fn fetches_and_decodes_chart() {
    let (addr, _) = spawn_stub().await;
    let provider = provider_for(addr);

    let request = QuoteRequest::new("AAPL").with_period("5d").with_interval("15m");
    let bars = provider.fetch_bars(&request).await.unwrap();

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].close, Some(190.5));
    assert_eq!(bars[1].close, None);
    assert_eq!(bars[2].timestamp.timestamp(), 1_700_001_800);
}

#[tokio::test]
async fn unknown_symbol_chart_is_not_found() {
    let (addr, _) = spawn_stub().await;
    let provider = provider_for(addr);

    let err = provider
        .fetch_bars(&QuoteRequest::new("ZZZZZZINVALID").with_period("5d").with_interval("15m"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::SymbolNotFound { .. }));
}

#[tokio::test]
async fn bad_interval_is_rejected_before_any_request() {
    let provider = YahooProvider::with_config(YahooConfig {
        // Nothing listens here; a request would fail with a connection error.
        base_url: "http://127.0.0.1:9".into(),
        cookie_url: "http://127.0.0.1:9".into(),
        timeout: Duration::from_secs(1),
    })
    .unwrap();

    let err = provider
        .fetch_bars(&QuoteRequest::new("AAPL").with_interval("7m"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
}

#[tokio::test]
async fn info_is_flattened_and_crumb_is_reused() {
    let (addr, state) = spawn_stub().await;
    let provider = provider_for(addr);

    let first = provider.fetch_info("AAPL").await.unwrap();
    assert_eq!(first["symbol"], "AAPL");
    assert_eq!(first["shortName"], "AAPL Corp");
    assert_eq!(first["beta"], 1.2);

    provider.fetch_info("MSFT").await.unwrap();
    assert_eq!(state.crumb_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn batch_info_reports_each_symbol() {
    let (addr, _) = spawn_stub().await;
    let provider = provider_for(addr);

    let symbols = vec!["AAPL".to_string(), "NOPE".to_string(), "MSFT".to_string()];
    let infos = provider
        .fetch_info_batch(&symbols, Duration::from_secs(5))
        .await;

    assert!(infos[0].is_ok());
    assert!(matches!(infos[1], Err(ProviderError::SymbolNotFound { .. })));
    assert!(infos[2].is_ok());
}

#[tokio::test]
async fn unreachable_provider_is_a_request_error() {
    let provider = YahooProvider::with_config(YahooConfig {
        base_url: "http://127.0.0.1:9".into(),
        cookie_url: "http://127.0.0.1:9".into(),
        timeout: Duration::from_secs(1),
    })
    .unwrap();

    let err = provider.fetch_bars(&QuoteRequest::new("AAPL")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Reqwest { .. }));
}

#[tokio::test]
#[ignore]
async fn test_yahoo_provider_live() {
    // Hits the real Yahoo endpoints; run manually with --ignored.
    let provider = YahooProvider::new().expect("Failed to create YahooProvider");

    let request = QuoteRequest::new("AAPL").with_period("5d").with_interval("1d");
    let bars = provider.fetch_bars(&request).await;
    assert!(bars.is_ok(), "fetch_bars returned an error: {:?}", bars.err());
    assert!(!bars.unwrap().is_empty(), "Expected at least one daily bar for AAPL");

    let info = provider.fetch_info("AAPL").await;
    assert!(info.is_ok(), "fetch_info returned an error: {:?}", info.err());
    assert_eq!(info.unwrap()["symbol"], "AAPL");
}
