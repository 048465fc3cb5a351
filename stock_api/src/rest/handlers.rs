use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use market_data_adapter::models::{
    quote::QuoteResponse,
    request_params::QuoteRequest,
    search::{SearchResult, TrendingEntry},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{AppState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    pub period: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<TrendingEntry>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/stock/{symbol}?period=&interval=`
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let mut request = QuoteRequest::new(symbol);
    if let Some(period) = params.period {
        request = request.with_period(period);
    }
    if let Some(interval) = params.interval {
        request = request.with_interval(interval);
    }

    state
        .market
        .fetch_quote(&request)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

/// `GET /api/search/{query}`
pub async fn search_stocks(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .market
        .search(&query)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(SearchResponse { results }))
}

/// `GET /api/market/trending`
pub async fn get_trending_stocks(State(state): State<Arc<AppState>>) -> Json<TrendingResponse> {
    Json(TrendingResponse {
        trending: state.market.trending(),
    })
}
