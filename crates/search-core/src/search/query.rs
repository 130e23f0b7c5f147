//! Search query specification.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keep filter-stage order.
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by highest rated.
    #[serde(rename = "rating", alias = "rating_desc")]
    RatingDesc,
    /// Sort by name A-Z.
    #[serde(rename = "name", alias = "name_asc")]
    NameAsc,
}

impl SortKey {
    /// Parse a `sortBy` token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "" | "relevance" | "none" => Some(SortKey::Relevance),
            "price_asc" | "price-asc" | "price-ascending" => Some(SortKey::PriceAsc),
            "price_desc" | "price-desc" | "price-descending" => Some(SortKey::PriceDesc),
            "rating" | "rating_desc" | "rating-desc" | "rating-descending" => {
                Some(SortKey::RatingDesc)
            }
            "name" | "name_asc" | "name-asc" | "name-alphabetical" => Some(SortKey::NameAsc),
            _ => None,
        }
    }

    /// Parse a token, falling back to relevance for unknown values.
    pub fn parse_or_relevance(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|| {
            tracing::debug!(token, "unknown sort token, keeping relevance order");
            SortKey::Relevance
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::RatingDesc => "rating",
            SortKey::NameAsc => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::RatingDesc => "Highest Rated",
            SortKey::NameAsc => "Name: A-Z",
        }
    }
}

/// Caller-supplied filter, sort and pagination parameters for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Case-insensitive substring query.
    pub text: Option<String>,
    /// Exact (case-insensitive) category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Sort order.
    pub sort: SortKey,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Whether to compute category facets.
    pub include_facets: bool,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySpec {
    /// Create a query matching everything, first page.
    pub fn new() -> Self {
        Self {
            text: None,
            category: None,
            min_price: None,
            max_price: None,
            sort: SortKey::Relevance,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            include_facets: false,
        }
    }

    /// Set the text query. Blank text clears it.
    pub fn with_text(mut self, q: impl Into<String>) -> Self {
        self.text = non_blank(q.into());
        self
    }

    /// Set the category filter. Blank input clears it.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    /// Set inclusive price bounds.
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination. Values are taken as-is; see [`QuerySpec::validate`].
    pub fn with_pagination(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Enable facets.
    pub fn with_facets(mut self) -> Self {
        self.include_facets = true;
        self
    }

    /// Index of the first item on the requested page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }

    /// Reject queries the pipeline refuses to run.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.page < 1 {
            return Err(SearchError::invalid_query("page must be at least 1"));
        }
        if self.page_size < 1 {
            return Err(SearchError::invalid_query("page size must be at least 1"));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(SearchError::invalid_query(format!(
                "page size must be at most {}",
                MAX_PAGE_SIZE
            )));
        }
        for (name, bound) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(SearchError::invalid_query(format!("{} must be finite", name)));
            }
        }
        Ok(())
    }

    /// Build a query from `q`, `category`, `minPrice`, `maxPrice`, `sortBy`,
    /// `page` and `limit` parameters. Empty values count as absent.
    pub fn from_params(params: &QueryParams) -> Result<Self, SearchError> {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let query = QuerySpec {
            text: get("q").map(str::to_string),
            category: get("category").map(str::to_string),
            min_price: get("minPrice").map(|v| parse_bound("minPrice", v)).transpose()?,
            max_price: get("maxPrice").map(|v| parse_bound("maxPrice", v)).transpose()?,
            sort: get("sortBy").map(SortKey::parse_or_relevance).unwrap_or_default(),
            page: get("page").map(|v| parse_positive("page", v)).transpose()?.unwrap_or(1),
            page_size: get("limit")
                .map(|v| parse_positive("limit", v))
                .transpose()?
                .unwrap_or(DEFAULT_PAGE_SIZE),
            include_facets: get("facets").is_some_and(|v| matches!(v, "1" | "true")),
        };

        query.validate()?;
        Ok(query)
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_bound(name: &str, raw: &str) -> Result<f64, SearchError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SearchError::invalid_query(format!("{} is not a number: '{}'", name, raw)))
}

fn parse_positive(name: &str, raw: &str) -> Result<u32, SearchError> {
    match raw.parse::<u32>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(SearchError::invalid_query(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}
