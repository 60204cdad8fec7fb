//! # Order Math
//!
//! Total computation for order confirmation. The transactional part of
//! confirmation lives in market-db; the arithmetic and the availability
//! count rule live here where they can be tested directly.

use crate::types::Product;

/// Sum of the given products' prices.
pub fn total_amount(products: &[Product]) -> f64 {
    products.iter().map(|p| p.price).sum()
}

/// Renders a total for persistence. Order totals are stored as text.
pub fn render_amount(total: f64) -> String {
    format!("{}", total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use chrono::Utc;

    fn priced(price: f64) -> Product {
        let now = Utc::now();
        Product {
            id: "p".to_string(),
            name: "p".to_string(),
            seller_id: "s".to_string(),
            category: "books".to_string(),
            price,
            status: ProductStatus::Available,
            description: String::new(),
            created_at: now,
            updated_at: now,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_total_amount() {
        let products = vec![priced(10.0), priced(20.0)];
        assert_eq!(total_amount(&products), 30.0);
        assert_eq!(render_amount(total_amount(&products)), "30");
    }

    #[test]
    fn test_total_amount_fractional() {
        let products = vec![priced(10.5), priced(20.25)];
        assert_eq!(render_amount(total_amount(&products)), "30.75");
    }

    #[test]
    fn test_total_amount_empty() {
        assert_eq!(total_amount(&[]), 0.0);
        assert_eq!(render_amount(0.0), "0");
    }
}
