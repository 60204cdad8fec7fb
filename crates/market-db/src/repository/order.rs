//! # Order Repository
//!
//! Order confirmation and the per-user order listing.
//!
//! ## Confirmation Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Order Confirmation Lifecycle                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   1. SELECT requested products WHERE status = 'available' FOR UPDATE   │
//! │   2. count short?  →  error, nothing written                           │
//! │   3. INSERT order (uuid id, total as text, status 'confirmed')         │
//! │   4. UPDATE products  → status 'unavailable'                           │
//! │   5. UPDATE cart rows → status 'sold'                                  │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  FOR UPDATE serializes two confirmations fighting over the same        │
//! │  product: the loser re-reads after the winner's commit, sees the       │
//! │  status flipped, and fails the count check. The order row and its      │
//! │  cascade commit or roll back as a unit.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use market_core::{Order, Product, ORDER_STATUS_CONFIRMED};

/// Columns selected for order queries, in `Order` field order.
const ORDER_COLUMNS: &str =
    "order_id, user_id, product_ids, total_amount, status, location, timestamp";

/// Columns selected when locking products inside the transaction.
const PRODUCT_COLUMNS: &str =
    "id, name, seller_id, category, price, status, description, created_at, updated_at, images";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: PgPool) -> Self {
        OrderRepository { pool }
    }

    /// Confirms an order: creates the order row and cascades status
    /// changes to the bought products and the buyer's cart, all in one
    /// transaction.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The persisted order
    /// * `Err(DbError::Unavailable)` - At least one requested product did
    ///   not resolve to an available row; nothing was written
    pub async fn confirm(
        &self,
        user_id: &str,
        product_ids: &[String],
        location: &str,
    ) -> DbResult<Order> {
        debug!(user_id = %user_id, count = product_ids.len(), "Confirming order");

        let mut tx = self.pool.begin().await?;

        // Lock the available subset of the requested products. The lock
        // holds until commit, so a concurrent confirmation of any shared
        // product waits here and then fails the count check.
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1) AND status = 'available' FOR UPDATE",
            PRODUCT_COLUMNS
        ))
        .bind(product_ids)
        .fetch_all(&mut *tx)
        .await?;

        if products.len() < product_ids.len() {
            // Nothing has been written; dropping the transaction rolls it
            // back. This is the pre-commit validation failure path.
            return Err(DbError::Unavailable {
                requested: product_ids.len(),
                available: products.len(),
            });
        }

        let total = market_core::order::total_amount(&products);
        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            product_ids: product_ids.to_vec(),
            total_amount: market_core::order::render_amount(total),
            status: ORDER_STATUS_CONFIRMED.to_string(),
            location: location.to_string(),
            timestamp: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, user_id, product_ids, total_amount, status, location, timestamp
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&order.order_id)
        .bind(&order.user_id)
        .bind(&order.product_ids)
        .bind(&order.total_amount)
        .bind(&order.status)
        .bind(&order.location)
        .bind(order.timestamp)
        .execute(&mut *tx)
        .await?;

        if let Err(err) = Self::apply_cascade(&mut tx, user_id, product_ids).await {
            // Distinct from the pre-commit validation failure above: the
            // order row was already staged when the cascade broke. The
            // whole transaction rolls back, so no half-confirmed state is
            // ever persisted.
            error!(
                order_id = %order.order_id,
                %err,
                "Order cascade failed after order insert; rolling back"
            );
            return Err(err);
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Steps 4-5 of the confirmation: flip product and cart statuses.
    async fn apply_cascade(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: &str,
        product_ids: &[String],
    ) -> DbResult<()> {
        sqlx::query(
            "UPDATE products SET status = 'unavailable', updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(product_ids)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "UPDATE cart_items SET status = 'sold' WHERE user_id = $1 AND product_id = ANY($2)",
        )
        .bind(user_id)
        .bind(product_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Lists a user's orders, most recent first, capped at `limit`.
    ///
    /// Returns the raw set; the "no orders is an error" rule is the HTTP
    /// layer's to enforce.
    pub async fn list_for_user(&self, user_id: &str, limit: usize) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY timestamp DESC LIMIT $2",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
