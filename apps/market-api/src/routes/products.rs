//! Product CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use market_core::validation::{validate_amount, validate_id, validate_required};
use market_core::{CoreError, Product, ProductStatus};
use market_db::{DbError, ProductPatch};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/createproduct", put(create_product))
        .route("/updateproduct/{id}", patch(update_product))
        .route("/deleteproduct/{id}", delete(delete_product))
        .route("/getproduct/{id}", get(get_product))
        .route("/getproducts/{seller_id}", get(get_seller_products))
}

#[derive(Debug, Deserialize)]
struct CreateProductRequest {
    /// Optional caller-supplied id; generated when absent.
    id: Option<String>,
    name: String,
    seller_id: String,
    category: String,
    price: f64,
    #[serde(default)]
    status: ProductStatus,
    #[serde(default)]
    description: String,
    #[serde(default)]
    images: Vec<String>,
}

/// `PUT /product/createproduct`
async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_required("name", &req.name)?;
    validate_id("seller_id", &req.seller_id)?;
    validate_amount("price", req.price)?;

    let now = Utc::now();
    let product = Product {
        id: req.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: req.name,
        seller_id: req.seller_id,
        category: req.category,
        price: req.price,
        status: req.status,
        description: req.description,
        created_at: now,
        updated_at: now,
        images: req.images,
    };

    state
        .db
        .products()
        .insert(&product)
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::Conflict("Product already exists".to_string())
            }
            other => other.into(),
        })?;

    info!(id = %product.id, seller_id = %product.seller_id, "Product created");
    Ok(Json(json!({
        "message": "Product created successfully",
        "product": product,
    })))
}

/// `PATCH /product/updateproduct/{id}` - partial update; only supplied
/// fields change.
async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if patch.is_empty() {
        return Err(CoreError::EmptyUpdate.into());
    }
    if let Some(price) = patch.price {
        validate_amount("price", price)?;
    }

    let product = state.db.products().update(&id, &patch).await?;

    Ok(Json(json!({
        "message": "Product updated successfully",
        "product": product,
    })))
}

/// `DELETE /product/deleteproduct/{id}`
async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().delete(&id).await?;

    info!(id = %id, "Product deleted");
    Ok(Json(json!({
        "message": "Product deleted successfully",
        "product_id": id,
    })))
}

/// `GET /product/getproduct/{id}`
async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;

    Ok(Json(json!({ "product": product })))
}

/// `GET /product/getproducts/{seller_id}` - a seller's listings, newest
/// first.
async fn get_seller_products(
    State(state): State<Arc<AppState>>,
    Path(seller_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let products = state.db.products().list_by_seller(&seller_id).await?;

    Ok(Json(json!({
        "seller_id": seller_id,
        "count": products.len(),
        "products": products,
    })))
}
