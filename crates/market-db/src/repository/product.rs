//! # Product Repository
//!
//! Database operations for product listings, including the browse
//! pre-filter.
//!
//! ## Browse Pre-Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 What SQL Does vs. What market-core Does                 │
//! │                                                                         │
//! │  SQL (this module)                 market-core::browse                  │
//! │  ─────────────────                 ────────────────────                 │
//! │  status = 'available'              seller resolution drop               │
//! │  name ILIKE '%...%'                distance annotation                  │
//! │  category equality                 multi-key stable sort                │
//! │  price band                        limit truncation                     │
//! │                                                                         │
//! │  The split keeps the ranking rules pure and unit-testable while the    │
//! │  cheap predicate filtering stays in the store.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use market_core::Product;

/// Columns selected for every product query, in `Product` field order.
const PRODUCT_COLUMNS: &str =
    "id, name, seller_id, category, price, status, description, created_at, updated_at, images";

/// Upper bound on browse candidates fetched before ranking. Ranking is
/// in-memory, so an unbounded candidate set would be a memory hazard.
const CANDIDATE_CAP: i64 = 1000;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, seller_id = %product.seller_id, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                id, name, seller_id, category, price, status, description,
                created_at, updated_at, images
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.seller_id)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.status)
        .bind(&product.description)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(&product.images)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::duplicate("product id", &product.id));
        }

        Ok(())
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists a seller's products, newest first.
    pub async fn list_by_seller(&self, seller_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetches browse candidates: available products matching the name,
    /// category and price predicates. Ordering and truncation happen in
    /// market-core after seller resolution.
    pub async fn browse_candidates(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Fetching browse candidates");

        let name_pattern = filter.name.as_ref().map(|n| format!("%{}%", n));

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {}
            FROM products
            WHERE status = 'available'
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
              AND price >= $3
              AND ($4::float8 IS NULL OR price <= $4)
            LIMIT $5
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(name_pattern)
        .bind(&filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(CANDIDATE_CAP)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Applies a partial update: only fields present in the patch change.
    /// Always refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated row
    /// * `Err(DbError::NotFound)` - No product with that id
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name        = COALESCE($2, name),
                seller_id   = COALESCE($3, seller_id),
                category    = COALESCE($4, category),
                price       = COALESCE($5, price),
                status      = COALESCE($6, status),
                description = COALESCE($7, description),
                images      = COALESCE($8, images),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.seller_id)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(patch.status)
        .bind(&patch.description)
        .bind(&patch.images)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Predicates applied by [`ProductRepository::browse_candidates`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Exact category. `None` means every category ("all").
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: f64,
    /// Inclusive upper price bound. `None` means unbounded.
    pub max_price: Option<f64>,
}

/// Fields a partial product update may change. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub seller_id: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub status: Option<market_core::ProductStatus>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.seller_id.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.images.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_emptiness() {
        assert!(ProductPatch::default().is_empty());

        let patch = ProductPatch {
            price: Some(49.99),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
