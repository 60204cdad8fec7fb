//! # market-db: Database Layer for the Marketplace Backend
//!
//! This crate provides database access for the marketplace. It uses
//! PostgreSQL with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Marketplace Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (browse_products, confirm_order, ...)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     market-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (user, cart,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  product,     │    │              │  │   │
//! │  │   │ PgPool        │◄───│  order, ...)  │    │ 0001_init.sql│  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                         PostgreSQL                                      │
//! │   users · products · cart_items · orders · payments · otp_codes ·     │
//! │   media                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and embedded migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per collection

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::media::{MediaRecord, MediaRepository};
pub use repository::order::OrderRepository;
pub use repository::otp::OtpRepository;
pub use repository::payment::PaymentRepository;
pub use repository::product::{ProductFilter, ProductPatch, ProductRepository};
pub use repository::user::{UserPatch, UserRepository};
