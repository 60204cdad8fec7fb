//! # Validation Module
//!
//! Input validation rules applied at the HTTP boundary before any storage
//! operation runs. Type-level validation (wrong JSON shapes) is handled by
//! serde; these rules cover what deserialization alone cannot express.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound on identifier length. Generous, but stops abuse.
const MAX_ID_LEN: usize = 64;

/// Validates a caller-supplied identifier (user id, product id).
pub fn validate_id(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates that a free-text field is present and non-blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price or payment amount. Must be finite and non-negative.
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a browse price band. Both bounds must be valid amounts and
/// the band must not be inverted.
pub fn validate_price_range(min_price: f64, max_price: Option<f64>) -> ValidationResult<()> {
    validate_amount("min_price", min_price)?;
    if let Some(max) = max_price {
        validate_amount("max_price", max)?;
        if max < min_price {
            return Err(ValidationError::InvalidFormat {
                field: "max_price".to_string(),
                reason: "must not be below min_price".to_string(),
            });
        }
    }
    Ok(())
}

/// Shallow email shape check. Real deliverability is the mailer's problem;
/// this only rejects values that cannot possibly be addresses.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "not an email address".to_string(),
        });
    }
    Ok(())
}

/// Validates an OTP code: exactly six decimal digits.
pub fn validate_otp_code(code: &str) -> ValidationResult<()> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: "must be six digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("user_id", "amir81234").is_ok());
        assert!(validate_id("user_id", "").is_err());
        assert!(validate_id("user_id", "  ").is_err());
        assert!(validate_id("user_id", &"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Road bike").is_ok());
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("price", 0.0).is_ok());
        assert!(validate_amount("price", 199.99).is_ok());
        assert!(validate_amount("price", -0.01).is_err());
        assert!(validate_amount("price", f64::NAN).is_err());
        assert!(validate_amount("price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_price_range() {
        assert!(validate_price_range(0.0, None).is_ok());
        assert!(validate_price_range(10.0, Some(20.0)).is_ok());
        assert!(validate_price_range(10.0, Some(10.0)).is_ok());
        assert!(validate_price_range(20.0, Some(10.0)).is_err());
        assert!(validate_price_range(-1.0, None).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("amir@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("amir@nodot").is_err());
        assert!(validate_email("amir@trailing.").is_err());
    }

    #[test]
    fn test_validate_otp_code() {
        assert!(validate_otp_code("123456").is_ok());
        assert!(validate_otp_code("12345").is_err());
        assert!(validate_otp_code("1234567").is_err());
        assert!(validate_otp_code("12345a").is_err());
    }
}
