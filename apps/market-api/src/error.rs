//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Market API                         │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  GET /browse/products                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<Json<...>, ApiError>                            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  DbError::NotFound ───────────────┐                              │  │
//! │  │  CoreError::Validation(..) ───────┼──► ApiError ──► Response ───►│  │
//! │  │  DbError::Unavailable ────────────┘                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──────  { "success": false, "message": "User not found: u1" }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler converts faults at its own boundary; nothing propagates
//! unhandled. Internal errors surface the fault reason in the response
//! body, which is debug-oriented but part of the observed contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use market_core::CoreError;
use market_db::DbError;

/// API error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// x-api-key mismatch. Always rendered before handler logic runs.
    #[error("Unauthorized access")]
    Forbidden,

    /// Missing user/product/cart-entry/order, and empty cart/order
    /// listings (the deliberate "empty as error" convention).
    #[error("{0}")]
    NotFound(String),

    /// Duplicate user/product/cart-entry.
    #[error("{0}")]
    Conflict(String),

    /// Malformed input, partial availability at order confirmation,
    /// empty update payloads.
    #[error("{0}")]
    Validation(String),

    /// Store access fault or unexpected failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref reason) = self {
            tracing::error!(%reason, "Internal error surfaced to client");
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::Unavailable { .. } => ApiError::Validation(err.to_string()),
            DbError::ForeignKeyViolation { .. } => ApiError::Validation(err.to_string()),
            // Fault reason surfaced in the body (observed contract)
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserNotFound(_) | CoreError::ProductNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::EmptyUpdate => ApiError::Validation(err.to_string()),
            CoreError::Validation(e) => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<market_core::ValidationError> for ApiError {
    fn from(err: market_core::ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::NotFound("User not found: u1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User not found: u1");
    }

    #[test]
    fn test_db_error_conversion() {
        let err: ApiError = DbError::not_found("User", "u1").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = DbError::duplicate("product id", "p1").into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DbError::Unavailable {
            requested: 2,
            available: 1,
        }
        .into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
