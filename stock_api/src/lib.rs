//! HTTP front end for the market data adapter.
//!
//! Routes:
//! - `GET /api/stock/{symbol}?period=1d&interval=1m` - bars and instrument info
//! - `GET /api/search/{query}` - best-effort instrument search
//! - `GET /api/market/trending` - static trending list
//! - `GET /health` - liveness probe

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::Context;
use market_data_adapter::{MarketDataService, providers::yahoo_rest::YahooProvider};
use tracing::info;

use crate::{config::ServerConfig, rest::AppState};

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,stock_api=debug,market_data_adapter=debug";

/// Wire the Yahoo provider and service into handler state.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::with_config(config.yahoo()).context("creating Yahoo provider")?;
    let market = MarketDataService::with_timeout(Arc::new(provider), config.provider_timeout);
    info!(provider = market.provider_name(), timeout = ?config.provider_timeout, "market data service ready");

    Ok(Arc::new(
        AppState::new(market).with_error_detail(config.expose_error_detail),
    ))
}

/// Run the server until Ctrl-C or SIGTERM.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let app = rest::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
