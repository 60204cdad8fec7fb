//! # Cart Repository
//!
//! Database operations for cart entries.
//!
//! ## Conditional Insert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Duplicate Prevention Strategy                           │
//! │                                                                         │
//! │  ❌ WRONG: check-then-act (racy under concurrent requests)             │
//! │     SELECT ... ; if absent { INSERT ... }                               │
//! │                                                                         │
//! │  ✅ CORRECT: single conditional write                                   │
//! │     INSERT ... ON CONFLICT (user_id, product_id) DO NOTHING             │
//! │     rows_affected == 0  →  the pair already existed                     │
//! │                                                                         │
//! │  Two concurrent adds for the same pair race inside PostgreSQL, which   │
//! │  serializes them; exactly one reports success.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use market_core::{CartEntry, CartStatus};

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: PgPool) -> Self {
        CartRepository { pool }
    }

    /// Adds a product to a user's cart.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the pair is already in the cart
    pub async fn add(&self, entry: &CartEntry) -> DbResult<()> {
        debug!(user_id = %entry.user_id, product_id = %entry.product_id, "Adding cart entry");

        let result = sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.product_id)
        .bind(entry.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::duplicate(
                "cart entry",
                format!("{}/{}", entry.user_id, entry.product_id),
            ));
        }

        Ok(())
    }

    /// Updates the status of a cart entry.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no entry for that pair
    pub async fn update_status(
        &self,
        user_id: &str,
        product_id: &str,
        status: CartStatus,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE cart_items SET status = $3 WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Cart item",
                format!("{}/{}", user_id, product_id),
            ));
        }

        Ok(())
    }

    /// Removes a cart entry.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no entry for that pair
    pub async fn remove(&self, user_id: &str, product_id: &str) -> DbResult<()> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Cart item",
                format!("{}/{}", user_id, product_id),
            ));
        }

        Ok(())
    }

    /// Lists every cart entry for a user.
    ///
    /// Returns the raw set; the "empty cart is an error" rule is the HTTP
    /// layer's to enforce.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<CartEntry>> {
        let entries = sqlx::query_as::<_, CartEntry>(
            "SELECT user_id, product_id, status FROM cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
