//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! a JSON response body `{"error": "message"}`, except gateway failures which
//! keep the `{"title": "Error", "operation": ...}` shape the payment pages use.

use crate::auth::AuthError;
use crate::paypal::PaymentError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
///
/// Each variant maps to an HTTP status code:
/// - `BadRequest` → 400
/// - `Unauthorized` → 401
/// - `NotFound` → 404
/// - `BadGateway` → 502
/// - `Gateway` → 502 with the failed payment operation
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid request parameters (400).
    BadRequest(String),
    /// OAuth exchange rejected (401).
    Unauthorized(String),
    /// Unknown or expired session (404).
    NotFound(String),
    /// Upstream service unreachable or misbehaving (502).
    BadGateway(String),
    /// A payment gateway call failed (502).
    Gateway {
        operation: &'static str,
        source: PaymentError,
    },
    /// Unexpected server error (500).
    Internal(String),
}

impl ApiError {
    /// Wrap a failed payment call, remembering which NVP operation failed.
    pub fn gateway(operation: &'static str) -> impl FnOnce(PaymentError) -> ApiError {
        move |source| ApiError::Gateway { operation, source }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(msg) | AuthError::UserLookup(msg) => ApiError::Unauthorized(msg),
            AuthError::Config(msg) => ApiError::Internal(msg),
            AuthError::Http(e) => ApiError::BadGateway(format!("OAuth provider: {e}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Gateway { operation, source } => {
                tracing::error!(operation, "Failure for {}: {}", operation, source);
                let body = axum::Json(json!({ "title": "Error", "operation": operation }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            other => {
                let (status, message) = match other {
                    ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
                    ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
                    ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                    ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
                    ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
                    ApiError::Gateway { .. } => unreachable!(),
                };
                if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), "{}", message);
                }
                let body = axum::Json(json!({ "error": message }));
                (status, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::Gateway {
                    operation: "SetExpressCheckout",
                    source: PaymentError::MissingRequired("AMT"),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        let err: ApiError = AuthError::Rejected("bad code".into()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        let err: ApiError = AuthError::Config("bad url".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
