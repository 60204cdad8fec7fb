//! # Media Repository
//!
//! BYTEA-backed blob storage for images. The HTTP layer treats this as an
//! opaque passthrough: upload returns an id, download streams bytes back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A stored binary object.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaRecord {
    /// Generated identifier (UUID v4).
    pub id: String,

    /// Stored filename: `{uuid}_{original_name}`.
    pub filename: String,

    /// MIME type as submitted at upload (always `image/*`).
    pub content_type: String,

    /// The raw bytes.
    pub data: Vec<u8>,

    /// When the object was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// Repository for media database operations.
#[derive(Debug, Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Creates a new MediaRepository.
    pub fn new(pool: PgPool) -> Self {
        MediaRepository { pool }
    }

    /// Stores an uploaded object.
    pub async fn insert(&self, record: &MediaRecord) -> DbResult<()> {
        debug!(id = %record.id, size = record.data.len(), "Storing media object");

        sqlx::query(
            r#"
            INSERT INTO media (id, filename, content_type, data, uploaded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(&record.content_type)
        .bind(&record.data)
        .bind(record.uploaded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches an object by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<MediaRecord>> {
        let record = sqlx::query_as::<_, MediaRecord>(
            "SELECT id, filename, content_type, data, uploaded_at FROM media WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes an object.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no object with that id
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("File", id));
        }

        Ok(())
    }
}
