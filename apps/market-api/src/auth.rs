//! Credential handling: password hashing, session token issuance, and
//! one-time-password generation.
//!
//! Session tokens are issued at login/signup but deliberately not enforced
//! on the other endpoints; the access-control boundary there is the
//! x-api-key gate (see `routes`).

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Session Tokens
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a session token for a user.
    pub fn generate_token(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Validation(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

// =============================================================================
// Generated Identifiers
// =============================================================================

/// Generates a six-digit OTP code.
pub fn generate_otp_code() -> String {
    (OsRng.next_u32() % 900_000 + 100_000).to_string()
}

/// Proposes a user id for a signup: the lowercased username (spaces
/// replaced with underscores) plus a random five-digit suffix. The caller
/// retries against the store until a free id comes up.
pub fn user_id_candidate(username: &str) -> String {
    let base = username.trim().to_lowercase().replace(' ', "_");
    let suffix = OsRng.next_u32() % 90_000 + 10_000;
    format!("{}{}", base, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager
            .generate_token("amir81234", "Amir", "amir@example.com")
            .unwrap();

        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "amir81234");
        assert_eq!(claims.name, "Amir");
        assert_eq!(claims.email, "amir@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = manager
            .generate_token("amir81234", "Amir", "amir@example.com")
            .unwrap();

        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_jwt_rejects_expired() {
        // Already expired at issue time
        let manager = JwtManager::new("test-secret".to_string(), -120);

        let token = manager
            .generate_token("amir81234", "Amir", "amir@example.com")
            .unwrap();

        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong-password", &hash));
        assert!(!verify_password("hunter2-but-longer", "not-a-hash"));
    }

    #[test]
    fn test_otp_code_shape() {
        for _ in 0..32 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..1_000_000).contains(&n));
        }
    }

    #[test]
    fn test_user_id_candidate_shape() {
        let id = user_id_candidate("Amir Khan");
        assert!(id.starts_with("amir_khan"));

        let suffix = &id["amir_khan".len()..];
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
