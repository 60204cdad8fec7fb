//! # User Repository
//!
//! Database operations for user accounts.

use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use market_core::User;

/// Columns selected for every user query, in `User` field order.
const USER_COLUMNS: &str = "id, name, password_hash, email, location, latitude, longitude, \
     created_at, phone, profile_pic, last_accessed";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: PgPool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// The insert is conditional on the id being free, so two concurrent
    /// creates for the same id cannot both succeed.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id (or email) already taken
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, name, password_hash, email, location, latitude, longitude,
                created_at, phone, profile_pic, last_accessed
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.location)
        .bind(&user.latitude)
        .bind(&user.longitude)
        .bind(user.created_at)
        .bind(&user.phone)
        .bind(&user.profile_pic)
        .bind(user.last_accessed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::duplicate("user id", &user.id));
        }

        Ok(())
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email (login path).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether a user id is already taken (signup id generation).
    pub async fn id_exists(&self, id: &str) -> DbResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Applies a partial update: only fields present in the patch change.
    ///
    /// ## Returns
    /// * `Ok(User)` - The updated row
    /// * `Err(DbError::NotFound)` - No user with that id
    pub async fn update(&self, id: &str, patch: &UserPatch) -> DbResult<User> {
        debug!(id = %id, "Updating user");

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name        = COALESCE($2, name),
                email       = COALESCE($3, email),
                location    = COALESCE($4, location),
                latitude    = COALESCE($5, latitude),
                longitude   = COALESCE($6, longitude),
                phone       = COALESCE($7, phone),
                profile_pic = COALESCE($8, profile_pic)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.location)
        .bind(&patch.latitude)
        .bind(&patch.longitude)
        .bind(&patch.phone)
        .bind(&patch.profile_pic)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Stamps a successful login.
    pub async fn touch_last_accessed(&self, id: &str) -> DbResult<()> {
        sqlx::query("UPDATE users SET last_accessed = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Fields a partial user update may change. `None` leaves the stored value
/// untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub phone: Option<String>,
    pub profile_pic: Option<String>,
}

impl UserPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.location.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.phone.is_none()
            && self.profile_pic.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_emptiness() {
        assert!(UserPatch::default().is_empty());

        let patch = UserPatch {
            location: Some("Lahore".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
