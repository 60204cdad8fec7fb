//! Cart endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use market_core::validation::validate_id;
use market_core::{CartEntry, CartStatus};
use market_db::DbError;

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add", post(add_item))
        .route("/update/{user_id}/{product_id}", patch(update_item))
        .route("/delete/{user_id}/{product_id}", delete(delete_item))
        .route("/getcart/{user_id}", get(get_items))
}

#[derive(Debug, Deserialize)]
struct CartAddRequest {
    user_id: String,
    product_id: String,
    #[serde(default)]
    status: CartStatus,
}

/// `POST /cart/add`
async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CartAddRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("user_id", &req.user_id)?;
    validate_id("product_id", &req.product_id)?;

    let entry = CartEntry {
        user_id: req.user_id,
        product_id: req.product_id,
        status: req.status,
    };

    state.db.cart().add(&entry).await.map_err(|e| match e {
        DbError::UniqueViolation { .. } => {
            ApiError::Conflict("Product already in cart".to_string())
        }
        other => other.into(),
    })?;

    Ok(Json(json!({
        "message": "Product added to cart successfully",
        "cart_item": entry,
    })))
}

#[derive(Debug, Deserialize)]
struct CartUpdateRequest {
    status: CartStatus,
}

/// `PATCH /cart/update/{user_id}/{product_id}`
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(String, String)>,
    Json(req): Json<CartUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .cart()
        .update_status(&user_id, &product_id, req.status)
        .await
        .map_err(not_found_as_cart_item)?;

    Ok(Json(json!({
        "message": "Cart item status updated successfully",
    })))
}

/// `DELETE /cart/delete/{user_id}/{product_id}`
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .cart()
        .remove(&user_id, &product_id)
        .await
        .map_err(not_found_as_cart_item)?;

    Ok(Json(json!({
        "message": "Cart item deleted successfully",
        "user_id": user_id,
        "product_id": product_id,
    })))
}

/// `GET /cart/getcart/{user_id}`
///
/// An empty cart is reported as NotFound, not as an empty success. Kept
/// for client compatibility.
async fn get_items(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.db.cart().list_for_user(&user_id).await?;

    if items.is_empty() {
        return Err(ApiError::NotFound("No items found in cart".to_string()));
    }

    Ok(Json(json!({
        "user_id": user_id,
        "cart_items": items,
    })))
}

fn not_found_as_cart_item(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::NotFound("Cart item not found".to_string()),
        other => other.into(),
    }
}
