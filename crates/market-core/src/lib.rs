//! # market-core: Pure Business Logic for the Marketplace Backend
//!
//! This crate is the **heart** of the marketplace. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Marketplace Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Surface (axum)                          │   │
//! │  │    /browse/products ──► /orders/confirm ──► /cart/... ──► ...  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ market-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    geo    │  │  browse   │  │ validation│  │   │
//! │  │   │  Product  │  │ haversine │  │  ranking  │  │   rules   │  │   │
//! │  │   │   Order   │  │ GeoPoint  │  │  sorting  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  market-db (Database Layer)                     │   │
//! │  │            PostgreSQL queries, migrations, repositories         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Order, CartEntry, Payment)
//! - [`geo`] - Great-circle distance and coordinate parsing
//! - [`browse`] - Distance annotation, multi-key sorting, truncation
//! - [`order`] - Order total computation
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod browse;
pub mod error;
pub mod geo;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use market_core::Product` instead of
// `use market_core::types::Product`

pub use browse::{rank_products, RankedProduct};
pub use error::{CoreError, ValidationError};
pub use geo::{haversine_km, GeoPoint};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default number of products returned by a browse query when the caller
/// does not specify a limit.
pub const DEFAULT_BROWSE_LIMIT: usize = 10;

/// Maximum number of orders returned by the per-user order listing.
///
/// The listing is timestamp-descending, so the cap drops the oldest
/// entries first.
pub const MAX_ORDER_HISTORY: usize = 100;

/// The only status an order is ever created with. Orders have no further
/// lifecycle once persisted.
pub const ORDER_STATUS_CONFIRMED: &str = "confirmed";
