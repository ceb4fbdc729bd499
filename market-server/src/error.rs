use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use market::MarketError;
use serde_json::json;

/// Wraps core errors into JSON API responses.
pub struct ApiError(pub MarketError);

impl From<MarketError> for ApiError {
    fn from(e: MarketError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::NotFound(_) => StatusCode::NOT_FOUND,
            // Business-rule rejections, not faults: the request was well
            // formed, the account just cannot cover it.
            MarketError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            MarketError::InsufficientHoldings { .. } => StatusCode::BAD_REQUEST,
            MarketError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            MarketError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
