//! Type-ahead suggestions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::NormalizedProduct;

/// Most product-name suggestions returned.
pub const MAX_PRODUCT_SUGGESTIONS: usize = 5;
/// Most category suggestions returned.
pub const MAX_CATEGORY_SUGGESTIONS: usize = 3;
/// Hard cap on the combined list.
pub const MAX_SUGGESTIONS: usize = 8;

/// What a suggestion points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Product,
    Category,
}

/// One type-ahead entry.
///
/// For products `id` is the product id; for categories it repeats the
/// category name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionEntry {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub text: String,
    pub id: String,
}

impl SuggestionEntry {
    pub fn product(product: &NormalizedProduct) -> Self {
        Self {
            kind: SuggestionKind::Product,
            text: product.name.clone(),
            id: product.id.to_string(),
        }
    }

    pub fn category(name: &str) -> Self {
        Self {
            kind: SuggestionKind::Category,
            text: name.to_string(),
            id: name.to_string(),
        }
    }
}

/// Suggest product names, then categories, containing `partial`.
///
/// Matching ignores case. Categories are de-duplicated by exact name and
/// keep the order in which they first appear. A blank query suggests
/// nothing.
pub fn suggest(products: &[NormalizedProduct], partial: &str) -> Vec<SuggestionEntry> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut entries: Vec<SuggestionEntry> = products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .take(MAX_PRODUCT_SUGGESTIONS)
        .map(SuggestionEntry::product)
        .collect();

    let mut seen = HashSet::new();
    entries.extend(
        products
            .iter()
            .map(|p| p.category_name.as_str())
            .filter(|c| c.to_lowercase().contains(&needle))
            .filter(|c| seen.insert(*c))
            .take(MAX_CATEGORY_SUGGESTIONS)
            .map(SuggestionEntry::category),
    );

    entries.truncate(MAX_SUGGESTIONS);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn product(id: &str, name: &str, category: &str) -> NormalizedProduct {
        NormalizedProduct {
            id: ProductId::try_new(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            price: 1.0,
            image_url: String::new(),
            category_name: category.to_string(),
            stock_quantity: 0,
            rating: 0.0,
            review_count: 0,
            seller_name: None,
        }
    }

    #[test]
    fn test_products_before_categories() {
        let products = vec![
            product("1", "Mug Rack", "Mugs"),
            product("2", "Red Mug", "Kitchen"),
        ];
        let out = suggest(&products, "MUG");
        let kinds: Vec<_> = out.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![SuggestionKind::Product, SuggestionKind::Product, SuggestionKind::Category]
        );
        assert_eq!(out[2].text, "Mugs");
        assert_eq!(out[2].id, "Mugs");
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn test_caps() {
        let products: Vec<_> = (0..20)
            .map(|i| product(&i.to_string(), &format!("Tea {}", i), &format!("Tea shelf {}", i % 6)))
            .collect();
        let out = suggest(&products, "tea");
        assert_eq!(out.len(), MAX_SUGGESTIONS);
        assert_eq!(
            out.iter().filter(|e| e.kind == SuggestionKind::Product).count(),
            MAX_PRODUCT_SUGGESTIONS
        );
        assert_eq!(
            out.iter().filter(|e| e.kind == SuggestionKind::Category).count(),
            MAX_CATEGORY_SUGGESTIONS
        );
    }

    #[test]
    fn test_categories_deduplicated_in_first_seen_order() {
        let products = vec![
            product("1", "A", "Garden"),
            product("2", "B", "Garage"),
            product("3", "C", "Garden"),
        ];
        let texts: Vec<_> = suggest(&products, "gar").into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["Garden", "Garage"]);
    }

    #[test]
    fn test_blank_query_suggests_nothing() {
        let products = vec![product("1", "Mug", "Kitchen")];
        assert!(suggest(&products, "   ").is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let entry = SuggestionEntry::category("Kitchen");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"type": "category", "text": "Kitchen", "id": "Kitchen"})
        );
    }
}
