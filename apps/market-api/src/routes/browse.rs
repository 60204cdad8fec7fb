//! Geographic product browsing.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use market_core::validation::{validate_id, validate_price_range};
use market_core::{rank_products, CoreError, SortKey, DEFAULT_BROWSE_LIMIT};
use market_db::ProductFilter;

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/products", get(browse_products))
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    /// Requesting user; distances are measured from their stored location.
    user_id: String,
    /// Case-insensitive name substring.
    name: Option<String>,
    /// Category filter; "all" disables it.
    #[serde(default = "default_category")]
    category: String,
    /// Result count cap.
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    sort_by: SortKey,
    /// Inclusive price band, unbounded above when max_price is absent.
    #[serde(default)]
    min_price: f64,
    max_price: Option<f64>,
}

fn default_category() -> String {
    "all".to_string()
}

fn default_limit() -> usize {
    DEFAULT_BROWSE_LIMIT
}

/// `GET /browse/products`
///
/// Pre-filters candidates in SQL, resolves each candidate's seller
/// (dropping candidates whose seller is missing or has unusable
/// coordinates), then ranks in market-core.
///
/// The per-candidate seller lookups run sequentially. Fine at the default
/// result sizes; revisit with a batched seller fetch if browse traffic
/// ever carries thousand-candidate result sets.
async fn browse_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("user_id", &params.user_id)?;
    validate_price_range(params.min_price, params.max_price)?;

    let user = state
        .db
        .users()
        .get_by_id(&params.user_id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(params.user_id.clone()))?;

    let origin = user
        .geo_point()
        .map_err(|_| ApiError::NotFound("User has no valid coordinates".to_string()))?;

    let filter = ProductFilter {
        name: params.name,
        category: (!params.category.eq_ignore_ascii_case("all")).then_some(params.category),
        min_price: params.min_price,
        max_price: params.max_price,
    };

    let candidates = state.db.products().browse_candidates(&filter).await?;
    debug!(count = candidates.len(), "Browse candidates fetched");

    let users = state.db.users();
    let mut located = Vec::with_capacity(candidates.len());
    for product in candidates {
        let seller = users.get_by_id(&product.seller_id).await?;
        // Unknown seller or unusable coordinates: drop the candidate
        let point = seller.and_then(|s| s.geo_point().ok());
        located.push((product, point));
    }

    let products = rank_products(origin, located, params.sort_by, params.limit);

    Ok(Json(json!({
        "success": true,
        "count": products.len(),
        "products": products,
    })))
}
