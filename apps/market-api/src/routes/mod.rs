//! Route assembly and the x-api-key gate.
//!
//! ## Gate Design
//! The gate is a pluggable middleware layer, not a per-handler check, so a
//! later move to per-user authorization swaps one layer instead of
//! touching every endpoint. Each endpoint group is gated with its
//! configured key: `/browse` has its own secret, everything else shares
//! the general one.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

pub mod auth;
pub mod browse;
pub mod cart;
pub mod images;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;

/// Which configured secret an endpoint group is gated with.
#[derive(Debug, Clone, Copy)]
pub enum KeyScope {
    /// The general API key.
    General,
    /// The browse-specific key.
    Browse,
}

/// Rejects requests whose `x-api-key` header does not match the scope's
/// configured secret. Runs before any handler logic.
async fn require_api_key(
    State((state, scope)): State<(Arc<AppState>, KeyScope)>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = match scope {
        KeyScope::General => &state.config.api_key,
        KeyScope::Browse => &state.config.browse_api_key,
    };

    let received = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    match received {
        Some(key) if key == expected => Ok(next.run(request).await),
        _ => Err(ApiError::Forbidden),
    }
}

/// Liveness probe.
async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": "hello world" }))
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let general_gate =
        middleware::from_fn_with_state((state.clone(), KeyScope::General), require_api_key);
    let browse_gate =
        middleware::from_fn_with_state((state.clone(), KeyScope::Browse), require_api_key);

    Router::new()
        .route("/hello", get(hello))
        .nest("/user", users::routes().layer(general_gate.clone()))
        .nest("/auth", auth::routes().layer(general_gate.clone()))
        .nest("/product", products::routes().layer(general_gate.clone()))
        .nest("/cart", cart::routes().layer(general_gate.clone()))
        .nest("/orders", orders::routes().layer(general_gate.clone()))
        .nest("/payment", payments::routes().layer(general_gate.clone()))
        .nest(
            "/image",
            images::routes()
                .layer(general_gate)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .nest("/browse", browse::routes().layer(browse_gate))
        .with_state(state)
}
