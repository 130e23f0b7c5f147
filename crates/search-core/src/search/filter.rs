//! Search filter types.

use crate::catalog::NormalizedProduct;
use crate::search::QuerySpec;
use serde::{Deserialize, Serialize};

/// A search filter.
///
/// Filters compose with logical AND, so their order never changes which
/// products pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Substring of name, description or category. Stored lowercased.
    Text(String),
    /// Exact category, ignoring case.
    Category(String),
    /// Inclusive price range.
    PriceRange { min: Option<f64>, max: Option<f64> },
}

impl Filter {
    /// Create a text search filter.
    pub fn text(query: impl AsRef<str>) -> Self {
        Filter::Text(query.as_ref().trim().to_lowercase())
    }

    /// Create a category filter.
    pub fn category(name: impl Into<String>) -> Self {
        Filter::Category(name.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<f64>, max: Option<f64>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Check a product against this filter.
    pub fn matches(&self, product: &NormalizedProduct) -> bool {
        match self {
            Filter::Text(needle) => needle.is_empty() || product.mentions(needle),
            Filter::Category(name) => product.in_category(name),
            Filter::PriceRange { min, max } => product.priced_within(*min, *max),
        }
    }

    /// Filters a query asks for. Absent parameters add no filter.
    pub fn for_query(query: &QuerySpec) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let Some(text) = query.text.as_deref().filter(|t| !t.trim().is_empty()) {
            filters.push(Filter::text(text));
        }
        if let Some(category) = &query.category {
            filters.push(Filter::category(category.clone()));
        }
        if query.min_price.is_some() || query.max_price.is_some() {
            filters.push(Filter::price_range(query.min_price, query.max_price));
        }
        filters
    }
}

/// Keep the products that pass every filter, in input order.
pub fn apply_filters<'a>(
    products: &'a [NormalizedProduct],
    filters: &[Filter],
) -> Vec<&'a NormalizedProduct> {
    products
        .iter()
        .filter(|p| filters.iter().all(|f| f.matches(p)))
        .collect()
}
