//! # Geographic Utilities
//!
//! Great-circle distance between two coordinates, and parsing of the
//! string-typed latitude/longitude pairs stored on user records.
//!
//! ## Why Strings In, Floats Out?
//! User documents store coordinates as text (the mobile clients submit them
//! that way). Every consumer of a coordinate therefore goes through
//! [`GeoPoint::parse`], which is the single place where non-numeric or
//! out-of-range values are rejected.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Mean Earth radius in kilometers (spherical approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from already-validated decimal degrees.
    pub const fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Parses the string-typed coordinate pair stored on a user record.
    ///
    /// ## Errors
    /// - `InvalidFormat` when either value is not a decimal number
    /// - `OutOfRange` when latitude is outside [-90, 90] or longitude is
    ///   outside [-180, 180]
    pub fn parse(lat: &str, lon: &str) -> Result<Self, ValidationError> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "latitude".to_string(),
                reason: "not a decimal number".to_string(),
            })?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "longitude".to_string(),
                reason: "not a decimal number".to_string(),
            })?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::OutOfRange {
                field: "latitude".to_string(),
                min: -90.0,
                max: 90.0,
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::OutOfRange {
                field: "longitude".to_string(),
                min: -180.0,
                max: 180.0,
            });
        }

        Ok(GeoPoint { lat, lon })
    }
}

/// Great-circle distance between two points in kilometers.
///
/// Haversine formula on a spherical Earth. Symmetric, and zero when the
/// points coincide.
///
/// ## Example
/// ```rust
/// use market_core::geo::{haversine_km, GeoPoint};
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 90.0);
///
/// // Quarter of a great circle
/// assert!((haversine_km(a, b) - 10_007.5).abs() < 1.0);
/// ```
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_coincident_points() {
        let p = GeoPoint::new(51.5007, -0.1246);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = GeoPoint::new(40.7128, -74.0060); // New York
        let b = GeoPoint::new(48.8566, 2.3522); // Paris
        let d1 = haversine_km(a, b);
        let d2 = haversine_km(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_great_circle() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 90.0);
        // 2πR / 4 ≈ 10007.54 km
        let d = haversine_km(a, b);
        assert!((d - 10_007.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_along_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        // One degree of longitude at the equator ≈ 111.19 km
        let d = haversine_km(a, b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_parse_valid_coordinates() {
        let p = GeoPoint::parse("31.5204", "74.3587").unwrap();
        assert!((p.lat - 31.5204).abs() < 1e-9);
        assert!((p.lon - 74.3587).abs() < 1e-9);

        // Whitespace is tolerated
        let p = GeoPoint::parse(" -0.5 ", " 12 ").unwrap();
        assert!((p.lat + 0.5).abs() < 1e-9);
        assert!((p.lon - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(GeoPoint::parse("abc", "10").is_err());
        assert!(GeoPoint::parse("10", "").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(GeoPoint::parse("91", "0").is_err());
        assert!(GeoPoint::parse("-90.5", "0").is_err());
        assert!(GeoPoint::parse("0", "180.1").is_err());
        // Boundary values are accepted
        assert!(GeoPoint::parse("90", "-180").is_ok());
    }
}
