//! Payment ledger endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use market_core::validation::{validate_amount, validate_id};
use market_core::{Payment, PaymentStatus};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/add", post(add_payment))
}

#[derive(Debug, Deserialize)]
struct PaymentRequest {
    order_id: String,
    amount: f64,
    status: PaymentStatus,
}

/// `POST /payment/add`
///
/// A passive ledger write: the order id is recorded as given, without
/// checking that such an order exists.
async fn add_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("order_id", &req.order_id)?;
    validate_amount("amount", req.amount)?;

    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        order_id: req.order_id,
        amount: req.amount,
        status: req.status,
    };

    state.db.payments().insert(&payment).await?;

    Ok(Json(json!({
        "message": "Payment added successfully",
        "payment_id": payment.id,
        "payment": payment,
    })))
}
