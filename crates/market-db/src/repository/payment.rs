//! # Payment Repository
//!
//! Append-only payment ledger. Entries are never updated or deleted, and
//! the referenced order id is deliberately not validated.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use market_core::Payment;

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: PgPool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a payment.
    pub async fn insert(&self, payment: &Payment) -> DbResult<()> {
        debug!(order_id = %payment.order_id, amount = %payment.amount, "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, amount, status)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.order_id)
        .bind(payment.amount)
        .bind(payment.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
