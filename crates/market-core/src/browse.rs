//! # Browse Ranking
//!
//! The pure half of the product browsing engine: distance annotation,
//! multi-key sorting, and truncation.
//!
//! ## Pipeline Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Browse Request Pipeline                             │
//! │                                                                         │
//! │  GET /browse/products?user_id=...&sort_by=price_low                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve requester coordinates (users table)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQL pre-filter: status=available, name ILIKE, category, price band    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve each candidate's seller ──► (Product, Option<GeoPoint>)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rank_products()  ← THIS MODULE (pure, unit-tested)                    │
//! │   ├── drop candidates with unresolved sellers                          │
//! │   ├── annotate distance_km (rounded to 2 decimals)                     │
//! │   ├── stable sort by the selected key                                  │
//! │   └── truncate to the requested limit                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping this stage free of I/O is what makes the ordering and exclusion
//! rules testable without a database.

use serde::Serialize;

use crate::geo::{haversine_km, GeoPoint};
use crate::types::{Product, SortKey};

/// A product annotated with its distance from the requesting user.
///
/// Serializes as the product's own fields plus `distance_km`.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct {
    #[serde(flatten)]
    pub product: Product,

    /// Great-circle distance from the requester to the seller, in
    /// kilometers, rounded to 2 decimal places.
    pub distance_km: f64,
}

/// Ranks browse candidates relative to the requesting user's location.
///
/// Each candidate is paired with its seller's resolved coordinates;
/// `None` means the seller record was missing or carried coordinates that
/// do not parse. Such candidates are dropped silently, never surfaced as
/// an error.
///
/// The sort is stable: candidates that compare equal keep the order the
/// store returned them in.
pub fn rank_products(
    origin: GeoPoint,
    candidates: Vec<(Product, Option<GeoPoint>)>,
    sort_by: SortKey,
    limit: usize,
) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = candidates
        .into_iter()
        .filter_map(|(product, seller)| {
            let seller = seller?;
            Some(RankedProduct {
                distance_km: round_km(haversine_km(origin, seller)),
                product,
            })
        })
        .collect();

    match sort_by {
        SortKey::Nearest => ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km)),
        SortKey::Newest => {
            ranked.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at))
        }
        SortKey::Oldest => {
            ranked.sort_by(|a, b| a.product.created_at.cmp(&b.product.created_at))
        }
        SortKey::PriceLow => ranked.sort_by(|a, b| a.product.price.total_cmp(&b.product.price)),
        SortKey::PriceHigh => ranked.sort_by(|a, b| b.product.price.total_cmp(&a.product.price)),
    }

    ranked.truncate(limit);
    ranked
}

/// Rounds a distance to 2 decimal places for presentation.
fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn test_product(id: &str, price: f64, age_days: i64) -> Product {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() - Duration::days(age_days);
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            seller_id: "seller-1".to_string(),
            category: "electronic".to_string(),
            price,
            status: ProductStatus::Available,
            description: String::new(),
            created_at: created,
            updated_at: created,
            images: Vec::new(),
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(0.0, 0.0)
    }

    #[test]
    fn test_unresolved_sellers_are_dropped() {
        let candidates = vec![
            (test_product("a", 10.0, 0), Some(GeoPoint::new(0.0, 1.0))),
            (test_product("b", 20.0, 0), None),
            (test_product("c", 30.0, 0), Some(GeoPoint::new(0.0, 2.0))),
        ];

        let ranked = rank_products(origin(), candidates, SortKey::Nearest, 10);
        let ids: Vec<&str> = ranked.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_price_low_ordering() {
        let near = Some(GeoPoint::new(0.0, 1.0));
        let candidates = vec![
            (test_product("a", 30.0, 0), near),
            (test_product("b", 10.0, 0), near),
            (test_product("c", 20.0, 0), near),
        ];

        let ranked = rank_products(origin(), candidates, SortKey::PriceLow, 10);
        let prices: Vec<f64> = ranked.iter().map(|r| r.product.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_price_high_ordering() {
        let near = Some(GeoPoint::new(0.0, 1.0));
        let candidates = vec![
            (test_product("a", 30.0, 0), near),
            (test_product("b", 10.0, 0), near),
            (test_product("c", 20.0, 0), near),
        ];

        let ranked = rank_products(origin(), candidates, SortKey::PriceHigh, 10);
        let prices: Vec<f64> = ranked.iter().map(|r| r.product.price).collect();
        assert_eq!(prices, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_nearest_ordering() {
        let candidates = vec![
            (test_product("far", 10.0, 0), Some(GeoPoint::new(0.0, 5.0))),
            (test_product("near", 10.0, 0), Some(GeoPoint::new(0.0, 1.0))),
            (test_product("mid", 10.0, 0), Some(GeoPoint::new(0.0, 3.0))),
        ];

        let ranked = rank_products(origin(), candidates, SortKey::Nearest, 10);
        let ids: Vec<&str> = ranked.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);

        // Distances ascend
        assert!(ranked[0].distance_km < ranked[1].distance_km);
        assert!(ranked[1].distance_km < ranked[2].distance_km);
    }

    #[test]
    fn test_newest_and_oldest_ordering() {
        let near = Some(GeoPoint::new(0.0, 1.0));
        let candidates = vec![
            (test_product("mid", 10.0, 5), near),
            (test_product("old", 10.0, 9), near),
            (test_product("new", 10.0, 1), near),
        ];

        let newest = rank_products(origin(), candidates.clone(), SortKey::Newest, 10);
        let ids: Vec<&str> = newest.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        let oldest = rank_products(origin(), candidates, SortKey::Oldest, 10);
        let ids: Vec<&str> = oldest.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_limit_truncation() {
        let near = Some(GeoPoint::new(0.0, 1.0));
        let candidates = (0..25)
            .map(|i| (test_product(&format!("p{}", i), i as f64, 0), near))
            .collect();

        let ranked = rank_products(origin(), candidates, SortKey::PriceLow, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[9].product.price, 9.0);
    }

    #[test]
    fn test_distance_rounded_to_two_decimals() {
        let candidates = vec![(
            test_product("a", 10.0, 0),
            Some(GeoPoint::new(0.37, 0.91)),
        )];

        let ranked = rank_products(origin(), candidates, SortKey::Nearest, 10);
        let d = ranked[0].distance_km;
        assert_eq!((d * 100.0).round() / 100.0, d);
    }

    #[test]
    fn test_serialized_shape_includes_distance() {
        let candidates = vec![(test_product("a", 10.0, 0), Some(GeoPoint::new(0.0, 1.0)))];
        let ranked = rank_products(origin(), candidates, SortKey::Nearest, 10);

        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["status"], "available");
        assert!(json["distance_km"].is_number());
    }
}
