//! Maps adapter failures onto HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use market_data_adapter::UpstreamError;
use serde_json::json;
use thiserror::Error;

/// A failed API call. Always rendered as a 500 with a `detail` message.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct ApiError {
    source: UpstreamError,
    expose_detail: bool,
}

impl ApiError {
    pub fn new(source: UpstreamError, expose_detail: bool) -> Self {
        Self {
            source,
            expose_detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.source.code();
        tracing::error!(code, error = %self.source, "market data request failed");

        let detail = if self.expose_detail {
            self.source.to_string()
        } else {
            self.source.public_message().to_string()
        };

        let body = Json(json!({
            "detail": detail,
            "code": code,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
