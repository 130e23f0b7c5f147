//! Search module.
//!
//! Filter, sort, paginate and suggest over normalized products.

mod filter;
mod paginate;
mod query;
mod results;
mod sort;
mod suggest;

pub use filter::{apply_filters, Filter};
pub use paginate::{page_bounds, paginate, total_pages};
pub use query::{QueryParams, QuerySpec, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use results::{Facet, Pagination, SearchResult};
pub use sort::{collate, sort_products};
pub use suggest::{
    suggest, SuggestionEntry, SuggestionKind, MAX_CATEGORY_SUGGESTIONS, MAX_PRODUCT_SUGGESTIONS,
    MAX_SUGGESTIONS,
};
