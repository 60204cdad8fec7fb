//! # OTP Repository
//!
//! One-time password records for email signup. One row per email;
//! re-issuing a code replaces the previous one.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use market_core::OtpRecord;

/// Repository for OTP database operations.
#[derive(Debug, Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Creates a new OtpRepository.
    pub fn new(pool: PgPool) -> Self {
        OtpRepository { pool }
    }

    /// Stores a freshly issued code, replacing any previous one for the
    /// same email.
    pub async fn upsert(&self, record: &OtpRecord) -> DbResult<()> {
        debug!(email = %record.email, "Storing OTP");

        sqlx::query(
            r#"
            INSERT INTO otp_codes (email, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches the current code for an email, if one exists.
    pub async fn get(&self, email: &str) -> DbResult<Option<OtpRecord>> {
        let record = sqlx::query_as::<_, OtpRecord>(
            "SELECT email, code, expires_at FROM otp_codes WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes the code for an email. Used both on successful verification
    /// (consume) and on expiry detection.
    pub async fn delete(&self, email: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM otp_codes WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
