//! Order confirmation and per-user order history.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use market_core::validation::validate_id;
use market_core::{CoreError, MAX_ORDER_HISTORY};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/confirm", post(confirm_order))
        .route("/user/{user_id}", get(get_user_orders))
}

#[derive(Debug, Deserialize)]
struct OrderRequest {
    user_id: String,
    product_ids: Vec<String>,
    location: String,
}

/// `POST /orders/confirm`
///
/// Availability is re-checked inside the confirmation transaction, so a
/// partially-unavailable request fails with a validation error and leaves
/// every product and cart row untouched.
async fn confirm_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("user_id", &req.user_id)?;

    state
        .db
        .users()
        .get_by_id(&req.user_id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(req.user_id.clone()))?;

    let order = state
        .db
        .orders()
        .confirm(&req.user_id, &req.product_ids, &req.location)
        .await?;

    info!(
        order_id = %order.order_id,
        user_id = %order.user_id,
        total = %order.total_amount,
        "Order confirmed"
    );

    Ok(Json(json!({
        "success": true,
        "order": order,
    })))
}

/// `GET /orders/user/{user_id}` - most recent first.
///
/// A user with no orders is reported as NotFound, not as an empty
/// success. Kept for client compatibility.
async fn get_user_orders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let orders = state
        .db
        .orders()
        .list_for_user(&user_id, MAX_ORDER_HISTORY)
        .await?;

    if orders.is_empty() {
        return Err(ApiError::NotFound(
            "No orders found for this user".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "count": orders.len(),
        "orders": orders,
    })))
}
