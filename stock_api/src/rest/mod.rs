//! REST API routes (Axum)

use std::sync::Arc;

use axum::{Router, routing::get};
use market_data_adapter::{MarketDataService, UpstreamError};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
mod handlers;

use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub market: MarketDataService,
    /// Whether 500 bodies carry the raw provider error text
    pub expose_error_detail: bool,
}

impl AppState {
    pub fn new(market: MarketDataService) -> Self {
        Self {
            market,
            expose_error_detail: false,
        }
    }

    pub fn with_error_detail(mut self, expose: bool) -> Self {
        self.expose_error_detail = expose;
        self
    }

    fn api_error(&self, source: UpstreamError) -> ApiError {
        ApiError::new(source, self.expose_error_detail)
    }
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stock/{symbol}", get(handlers::get_stock_data))
        .route("/search/{query}", get(handlers::search_stocks))
        .route("/market/trending", get(handlers::get_trending_stocks))
}

/// Browser dashboards call the API from another origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
