//! # Domain Types
//!
//! Core domain types used throughout the marketplace backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (caller)    │   │  id (UUID)      │   │  order_id (UUID)│       │
//! │  │  latitude (str) │   │  seller_id (FK) │   │  product_ids    │       │
//! │  │  longitude (str)│   │  price (f64)    │   │  total_amount   │       │
//! │  │  password_hash  │   │  status         │   │  (text)         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CartEntry     │   │    Payment      │   │   OtpRecord     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  (user,product) │   │  order_id       │   │  email (key)    │       │
//! │  │  CartStatus     │   │  PaymentStatus  │   │  code + expiry  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## String-Typed Coordinates
//! User latitude/longitude are stored as text and parsed on use through
//! [`GeoPoint::parse`]; see the [`crate::geo`] module for the rationale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geo::GeoPoint;

// =============================================================================
// User
// =============================================================================

/// A marketplace user (both buyers and sellers).
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier. Caller-supplied on explicit create, generated
    /// from the username at signup.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Argon2 hash of the password. Never serialized back to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Contact email, unique per account.
    pub email: String,

    /// Free-text home location.
    pub location: String,

    /// Latitude in decimal degrees, stored as text.
    pub latitude: String,

    /// Longitude in decimal degrees, stored as text.
    pub longitude: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// Contact phone number.
    pub phone: String,

    /// Media id of the profile picture (opaque blob-store reference).
    pub profile_pic: String,

    /// Last successful login, if any.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl User {
    /// Parses the stored coordinate pair.
    pub fn geo_point(&self) -> Result<GeoPoint, ValidationError> {
        GeoPoint::parse(&self.latitude, &self.longitude)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Availability of a product listing.
///
/// Flipped to `Unavailable` by order confirmation; there is no restocking
/// transition (second-hand listings are sold once).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Available,
    Unavailable,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Available
    }
}

/// A product listed for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4, generated when the seller omits one).
    pub id: String,

    /// Display name shown in browse results.
    pub name: String,

    /// Id of the user selling this product.
    pub seller_id: String,

    /// Free-text category. Conventional values: fashion, electronic,
    /// furniture, home_and_garden, books, sports.
    pub category: String,

    /// Asking price. Non-negative.
    pub price: f64,

    /// Availability status.
    pub status: ProductStatus,

    /// Free-text description.
    pub description: String,

    /// When the listing was created.
    pub created_at: DateTime<Utc>,

    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,

    /// Media ids of the listing photos.
    pub images: Vec<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// Status of a cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    /// In the cart and ticked for checkout.
    Selected,
    /// In the cart but not ticked.
    Unselected,
    /// Bought through order confirmation. Kept for history.
    Sold,
}

impl Default for CartStatus {
    fn default() -> Self {
        CartStatus::Selected
    }
}

/// One product in one user's cart.
///
/// The `(user_id, product_id)` pair is the identity; there is at most one
/// entry per pair, enforced by the storage layer's conditional insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartEntry {
    pub user_id: String,
    pub product_id: String,
    pub status: CartStatus,
}

// =============================================================================
// Order
// =============================================================================

/// A confirmed order. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Generated identifier (UUID v4).
    pub order_id: String,

    /// The buyer.
    pub user_id: String,

    /// Every product bought in this order.
    pub product_ids: Vec<String>,

    /// Sum of product prices at confirmation time, rendered as text.
    pub total_amount: String,

    /// Always [`crate::ORDER_STATUS_CONFIRMED`]; no further lifecycle.
    pub status: String,

    /// Free-text delivery location.
    pub location: String,

    /// When the order was confirmed.
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Payment
// =============================================================================

/// Status of a payment ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// A payment ledger entry.
///
/// Append-only and deliberately unlinked: the referenced order is not
/// validated to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    /// Generated identifier (UUID v4).
    pub id: String,

    /// The order this payment is recorded against.
    pub order_id: String,

    /// Amount paid. Non-negative.
    pub amount: f64,

    /// Ledger status.
    pub status: PaymentStatus,
}

// =============================================================================
// OTP
// =============================================================================

/// A one-time password issued for email signup.
///
/// One record per email; re-sending replaces the previous code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OtpRecord {
    /// The email the code was sent to (record key).
    pub email: String,

    /// Six decimal digits.
    pub code: String,

    /// Issue time plus the configured validity window.
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Whether the code has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// Browse Sort Key
// =============================================================================

/// Ordering applied to browse results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending distance from the requesting user (default).
    Nearest,
    /// Descending creation timestamp. Accepts the legacy spelling "latest".
    #[serde(alias = "latest")]
    Newest,
    /// Ascending creation timestamp.
    Oldest,
    /// Ascending price.
    PriceLow,
    /// Descending price.
    PriceHigh,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Nearest
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_serde_shapes() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(
            serde_json::to_string(&CartStatus::Unselected).unwrap(),
            "\"unselected\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Refunded).unwrap(),
            "\"refunded\""
        );
    }

    #[test]
    fn test_sort_key_parsing() {
        let k: SortKey = serde_json::from_str("\"price_low\"").unwrap();
        assert_eq!(k, SortKey::PriceLow);

        // Legacy alias
        let k: SortKey = serde_json::from_str("\"latest\"").unwrap();
        assert_eq!(k, SortKey::Newest);

        assert_eq!(SortKey::default(), SortKey::Nearest);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: "amir81234".to_string(),
            name: "Amir".to_string(),
            password_hash: "$argon2id$...".to_string(),
            email: "amir@example.com".to_string(),
            location: "Lahore".to_string(),
            latitude: "31.5204".to_string(),
            longitude: "74.3587".to_string(),
            created_at: Utc::now(),
            phone: "+920000000000".to_string(),
            profile_pic: String::new(),
            last_accessed: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["id"], "amir81234");
    }

    #[test]
    fn test_otp_expiry() {
        let now = Utc::now();
        let record = OtpRecord {
            email: "amir@example.com".to_string(),
            code: "123456".to_string(),
            expires_at: now + Duration::minutes(10),
        };

        assert!(!record.is_expired_at(now));
        assert!(!record.is_expired_at(now + Duration::minutes(10)));
        assert!(record.is_expired_at(now + Duration::minutes(10) + Duration::seconds(1)));
    }
}
