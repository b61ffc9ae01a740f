use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doh_gateway_domain::DomainError;
use serde_json::json;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::DecodeError(_) | DomainError::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }

            DomainError::TransportTimeout { .. }
            | DomainError::TransportError(_)
            | DomainError::UnsupportedTransport(_)
            | DomainError::EncodeError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
