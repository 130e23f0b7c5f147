//! The canonical product shape every source is normalized into.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product in canonical form.
///
/// `id` and `name` are never empty; `price`, `stock_quantity` and
/// `review_count` are never negative; `rating` lies in `[0, 5]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    /// Identifier, unique within one result set.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Primary image.
    pub image_url: String,
    /// Category display name.
    pub category_name: String,
    /// Units in stock.
    pub stock_quantity: u64,
    /// Average rating.
    pub rating: f64,
    /// Number of reviews behind `rating`.
    pub review_count: u64,
    /// Seller, for marketplace listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
}

impl NormalizedProduct {
    /// Check if the product can be bought right now.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check if this is a marketplace listing.
    pub fn is_marketplace(&self) -> bool {
        self.seller_name.is_some()
    }

    /// Whether `needle` (already lowercased) occurs in the name,
    /// description or category.
    pub fn mentions(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.category_name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Check the category, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.category_name.to_lowercase() == category.to_lowercase()
    }

    /// Check the price against optional inclusive bounds.
    pub fn priced_within(&self, min: Option<f64>, max: Option<f64>) -> bool {
        min.map_or(true, |min| self.price >= min) && max.map_or(true, |max| self.price <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> NormalizedProduct {
        NormalizedProduct {
            id: ProductId::try_new("1").unwrap(),
            name: "Red Mug".to_string(),
            description: "Stoneware, dishwasher safe".to_string(),
            price: 10.0,
            image_url: "https://img.example/mug.png".to_string(),
            category_name: "Kitchen".to_string(),
            stock_quantity: 3,
            rating: 4.5,
            review_count: 12,
            seller_name: None,
        }
    }

    #[test]
    fn test_mentions_checks_all_text_fields() {
        let p = mug();
        assert!(p.mentions("red"));
        assert!(p.mentions("dishwasher"));
        assert!(p.mentions("kitchen"));
        assert!(!p.mentions("shirt"));
    }

    #[test]
    fn test_category_match_ignores_case() {
        assert!(mug().in_category("KITCHEN"));
        assert!(!mug().in_category("Kitchenware"));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let p = mug();
        assert!(p.priced_within(Some(10.0), Some(10.0)));
        assert!(p.priced_within(None, None));
        assert!(!p.priced_within(Some(10.01), None));
        assert!(!p.priced_within(None, Some(9.99)));
    }

    #[test]
    fn test_serializes_camel_case_without_seller() {
        let json = serde_json::to_value(mug()).unwrap();
        assert_eq!(json["imageUrl"], "https://img.example/mug.png");
        assert_eq!(json["categoryName"], "Kitchen");
        assert_eq!(json["stockQuantity"], 3);
        assert!(json.get("sellerName").is_none());
    }

    #[test]
    fn test_stock_and_marketplace_flags() {
        let mut p = mug();
        assert!(p.is_in_stock());
        assert!(!p.is_marketplace());
        p.stock_quantity = 0;
        p.seller_name = Some("Atelier Lune".to_string());
        assert!(!p.is_in_stock());
        assert!(p.is_marketplace());
    }
}
