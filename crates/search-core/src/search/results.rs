//! Search results and pagination.

use serde::{Deserialize, Serialize};

use crate::catalog::NormalizedProduct;
use crate::search::total_pages;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages; zero when nothing matched.
    pub total_pages: usize,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, limit: u32, total: usize) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        (self.page as usize) < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Get start item number (1-indexed), or 0 for an empty page.
    pub fn start_item(&self) -> usize {
        let start = (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize) + 1;
        if start > self.total {
            0
        } else {
            start
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        if self.start_item() == 0 {
            return 0;
        }
        (self.page as usize)
            .saturating_mul(self.limit as usize)
            .min(self.total)
    }
}

/// A category and how many filtered products fall into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    pub value: String,
    pub count: usize,
    pub selected: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The products on this page.
    pub products: Vec<NormalizedProduct>,
    /// Pagination info.
    pub pagination: Pagination,
    /// Total number of matches across all pages.
    pub total: usize,
    /// Category facets, when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

impl SearchResult {
    /// Create a result page.
    pub fn new(products: Vec<NormalizedProduct>, pagination: Pagination) -> Self {
        Self {
            products,
            total: pagination.total,
            pagination,
            facets: Vec::new(),
        }
    }

    /// A well-formed result with no matches.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), Pagination::new(page, limit, 0))
    }

    /// Set facets.
    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = facets;
        self
    }

    pub fn page(&self) -> u32 {
        self.pagination.page
    }

    pub fn page_size(&self) -> u32 {
        self.pagination.limit
    }

    pub fn total_matches(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    /// Check if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.products.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_pagination_no_matches() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next());
        assert!(!p.has_prev());
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
    }

    #[test]
    fn test_pagination_item_range() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.start_item(), 11);
        assert_eq!(p.end_item(), 20);

        let last = Pagination::new(5, 10, 45);
        assert_eq!(last.start_item(), 41);
        assert_eq!(last.end_item(), 45);
        assert!(!last.has_next());
    }

    #[test]
    fn test_wire_shape() {
        let result = SearchResult::empty(1, 20);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "products": [],
                "pagination": {"page": 1, "limit": 20, "total": 0, "totalPages": 0},
                "total": 0
            })
        );
    }
}
